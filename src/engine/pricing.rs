use crate::model::{FeeBreakdown, Slot};

/// Round to whole cents.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Fee quote for a slot: whole hours times the hourly rate, plus a flat
/// service fee. Pure; callers must have rejected non-finite rates already.
pub fn quote(slot: &Slot, hourly_rate: f64, service_fee: f64) -> FeeBreakdown {
    let usage_fee = round2(slot.whole_hours() as f64 * hourly_rate);
    let service_fee = round2(service_fee);
    FeeBreakdown {
        usage_fee,
        service_fee,
        total_fee: round2(usage_fee + service_fee),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn slot(from_h: u32, from_m: u32, to_h: u32, to_m: u32) -> Slot {
        Slot::new(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(from_h, from_m, 0).unwrap(),
            NaiveTime::from_hms_opt(to_h, to_m, 0).unwrap(),
        )
    }

    #[test]
    fn two_hours_at_two_plus_quarter() {
        let fee = quote(&slot(10, 0, 12, 0), 2.0, 0.25);
        assert_eq!(fee.usage_fee, 4.0);
        assert_eq!(fee.service_fee, 0.25);
        assert_eq!(fee.total_fee, 4.25);
    }

    #[test]
    fn every_whole_hour_duration_prices_linearly() {
        let rate = 3.0;
        for h in 1..=23u32 {
            let fee = quote(&slot(0, 0, h, 0), rate, 0.25);
            assert_eq!(fee.total_fee, round2(h as f64 * rate + 0.25), "h={h}");
        }
    }

    #[test]
    fn minutes_do_not_price() {
        let whole = quote(&slot(10, 0, 12, 0), 2.0, 0.25);
        let ragged = quote(&slot(10, 0, 12, 30), 2.0, 0.25);
        assert_eq!(whole, ragged);
    }

    #[test]
    fn fees_round_to_cents() {
        // 3h * 1.333 = 3.999 → 4.00
        let fee = quote(&slot(9, 0, 12, 0), 1.333, 0.25);
        assert_eq!(fee.usage_fee, 4.0);
        assert_eq!(fee.total_fee, 4.25);
    }

    #[test]
    fn zero_hour_slot_is_service_fee_only() {
        // from == to is rejected upstream; same-hour ragged slots still
        // reach pricing and charge nothing for usage.
        let fee = quote(&slot(9, 0, 9, 30), 2.0, 0.25);
        assert_eq!(fee.usage_fee, 0.0);
        assert_eq!(fee.total_fee, 0.25);
    }
}
