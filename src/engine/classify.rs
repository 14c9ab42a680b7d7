use chrono::NaiveDateTime;

use crate::model::{ReservationStatus, Slot};

/// Completed strictly after the slot's end instant in local time; at the
/// exact end instant the reservation is still Active.
pub fn classify(slot: &Slot, now: NaiveDateTime) -> ReservationStatus {
    if now > slot.end_instant() {
        ReservationStatus::Completed
    } else {
        ReservationStatus::Active
    }
}

pub(crate) fn now_local() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
