use crate::model::{ResourceKind, Slot};
use crate::store::Row;

use super::repository::parse_slot;
use super::{Engine, EngineError};

/// True if any stored row's `[from_time, to_time)` window overlaps the
/// candidate. Rows whose time columns fail to parse never block a booking.
pub(super) fn slot_taken(rows: &[Row], candidate: &Slot) -> bool {
    rows.iter()
        .any(|row| parse_slot(row).is_some_and(|s| s.overlaps(candidate)))
}

impl Engine {
    /// Availability check against the authoritative store at booking time.
    /// Read-then-write: a concurrent booking can still land between this
    /// check and the insert. The backing store needs a uniqueness
    /// constraint on `(resource, date, from_time)` to close that window.
    pub async fn check_available(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        slot: &Slot,
    ) -> Result<(), EngineError> {
        let existing = self
            .repo
            .list_by_resource_and_date(kind, resource_id, slot.date)
            .await?;
        if slot_taken(&existing, slot) {
            return Err(EngineError::Conflict { kind, slot: *slot });
        }
        Ok(())
    }
}
