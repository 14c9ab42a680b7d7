use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Stored text formats for the date/time columns.
pub const DATE_FMT: &str = "%Y-%m-%d";
pub const TIME_FMT: &str = "%H:%M";

/// Which of the two parallel resource families a reservation targets.
/// Selects the backing table pair; must never leak table names itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Parking,
    Charging,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Parking => "parking",
            ResourceKind::Charging => "charging",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open time window `[from, to)` on a single calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub from: NaiveTime,
    pub to: NaiveTime,
}

impl Slot {
    pub fn new(date: NaiveDate, from: NaiveTime, to: NaiveTime) -> Self {
        debug_assert!(from < to, "Slot from must be before to");
        Self { date, from, to }
    }

    /// Two slots conflict only on the same date, half-open on both ends.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.date == other.date && self.from < other.to && other.from < self.to
    }

    /// The instant the reservation ends, in the renter's local calendar.
    pub fn end_instant(&self) -> NaiveDateTime {
        self.date.and_time(self.to)
    }

    /// Duration in whole hours between the start and end hour marks.
    /// Minutes are ignored — starts are quantized to the hour upstream.
    pub fn whole_hours(&self) -> i64 {
        (self.to.hour() as i64 - self.from.hour() as i64).abs() % 24
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}, {})",
            self.date.format(DATE_FMT),
            self.from.format(TIME_FMT),
            self.to.format(TIME_FMT)
        )
    }
}

/// Two-decimal dollar amounts; `total_fee = usage_fee + service_fee`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub usage_fee: f64,
    pub service_fee: f64,
    pub total_fee: f64,
}

/// Payment-address pair for renter and provider. Opaque to the engine:
/// copied from the backing tables at booking time, settled elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSettlement {
    pub renter_account: String,
    pub renter_evm: String,
    pub provider_account: String,
    pub provider_evm: String,
}

/// Derived on every read from the slot's end versus the wall clock.
/// Never persisted — a stored status would go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    Active,
    Completed,
}

/// A booking intent as submitted by the caller. Times are quantized and
/// validated by the orchestrator before anything touches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub kind: ResourceKind,
    pub resource_id: String,
    pub renter_email: String,
    pub date: NaiveDate,
    pub from: NaiveTime,
    pub to: NaiveTime,
}

/// A confirmed reservation as returned from a successful booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub canonical_id: String,
    pub kind: ResourceKind,
    pub resource_id: String,
    pub renter_email: String,
    pub provider_email: String,
    pub slot: Slot,
    pub fee: FeeBreakdown,
    pub settlement: WalletSettlement,
    pub status: ReservationStatus,
}

// ── Query result types ───────────────────────────────────────────

/// One row of the renter's trip list, reconciled and classified.
/// `resource_id` and `provider_email` are `None` on legacy rows where the
/// reconciler could not recover them; the address falls back to an
/// unknown-location label in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripInfo {
    pub canonical_id: String,
    pub kind: ResourceKind,
    pub address: String,
    pub slot: Slot,
    pub fee: FeeBreakdown,
    pub status: ReservationStatus,
    pub resource_id: Option<String>,
    pub provider_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FMT).unwrap()
    }

    #[test]
    fn slot_overlap_half_open() {
        let a = Slot::new(d("2025-06-01"), t(10, 0), t(12, 0));
        let b = Slot::new(d("2025-06-01"), t(11, 0), t(13, 0));
        let c = Slot::new(d("2025-06-01"), t(12, 0), t(14, 0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // adjacent, not overlapping
    }

    #[test]
    fn slot_overlap_requires_same_date() {
        let a = Slot::new(d("2025-06-01"), t(10, 0), t(12, 0));
        let b = Slot::new(d("2025-06-02"), t(10, 0), t(12, 0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn slot_contained_overlaps() {
        let outer = Slot::new(d("2025-06-01"), t(8, 0), t(18, 0));
        let inner = Slot::new(d("2025-06-01"), t(10, 0), t(11, 0));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn whole_hours_ignores_minutes() {
        let s = Slot::new(d("2025-06-01"), t(10, 0), t(12, 30));
        assert_eq!(s.whole_hours(), 2);
    }

    #[test]
    fn whole_hours_full_day_span() {
        let s = Slot::new(d("2025-06-01"), t(0, 0), t(23, 0));
        assert_eq!(s.whole_hours(), 23);
    }

    #[test]
    fn end_instant_combines_date_and_to_time() {
        let s = Slot::new(d("2025-06-01"), t(10, 0), t(12, 0));
        assert_eq!(
            s.end_instant(),
            d("2025-06-01").and_hms_opt(12, 0, 0).unwrap()
        );
    }

    #[test]
    fn slot_display_format() {
        let s = Slot::new(d("2025-06-01"), t(9, 0), t(17, 30));
        assert_eq!(s.to_string(), "2025-06-01 [09:00, 17:30)");
    }
}
