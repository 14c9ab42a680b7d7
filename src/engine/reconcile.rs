//! Identifier reconciliation for heterogeneous reservation rows.
//!
//! Depending on how a row was created (and which schema revision wrote it),
//! its own id may live in `id`, in a type-specific transaction column, or
//! nowhere at all. The same goes for the resource reference. Every fallback
//! chain lives here, behind pure functions, so nothing else in the engine
//! guesses at column names.

use serde_json::Value;

use crate::model::ResourceKind;
use crate::store::Row;

/// Column holding the row's own type-specific transaction id.
pub(super) fn txn_id_column(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Parking => "parking_transaction_id",
        ResourceKind::Charging => "charging_transaction_id",
    }
}

/// Column referencing the reserved resource.
pub(super) fn resource_column(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Parking => "parking_id",
        ResourceKind::Charging => "charger_id",
    }
}

/// Non-empty column text. Numeric primary keys are rendered as decimal
/// text so the canonical id is always a string.
pub(super) fn text(row: &Row, column: &str) -> Option<String> {
    match row.get(column) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// The one stable identifier for a reservation row: the primary key when
/// present, else the type-specific transaction id, else a deterministic
/// composite of kind, date and time range.
///
/// The composite is NOT globally unique when several keyless rows share the
/// same kind/date/times — a documented limitation, not retried around.
pub fn canonical_id(kind: ResourceKind, row: &Row) -> String {
    if let Some(id) = text(row, "id") {
        return id;
    }
    if let Some(id) = text(row, txn_id_column(kind)) {
        return id;
    }
    let date = text(row, "date").unwrap_or_default();
    let from = text(row, "from_time").unwrap_or_default();
    let to = text(row, "to_time").unwrap_or_default();
    format!("{kind}-{date}-{from}-{to}")
}

/// Which resource the row points at. Charging rows written by an older
/// client sometimes carry the charger id in `charging_transaction_id`
/// instead. `None` means downstream must take the unknown-resource path,
/// never fail the reconciliation.
pub fn resource_ref(kind: ResourceKind, row: &Row) -> Option<String> {
    if let Some(id) = text(row, resource_column(kind)) {
        return Some(id);
    }
    match kind {
        ResourceKind::Charging => text(row, txn_id_column(kind)),
        ResourceKind::Parking => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn primary_id_wins() {
        let r = row(&[
            ("id", json!("pk-9")),
            ("parking_transaction_id", json!("txn-1")),
            ("date", json!("2025-06-01")),
        ]);
        assert_eq!(canonical_id(ResourceKind::Parking, &r), "pk-9");
    }

    #[test]
    fn transaction_id_when_no_primary() {
        let r = row(&[
            ("charging_transaction_id", json!("txn-7")),
            ("date", json!("2025-06-01")),
        ]);
        assert_eq!(canonical_id(ResourceKind::Charging, &r), "txn-7");
    }

    #[test]
    fn composite_when_no_natural_key() {
        let r = row(&[
            ("date", json!("2025-06-01")),
            ("from_time", json!("10:00")),
            ("to_time", json!("12:00")),
        ]);
        assert_eq!(
            canonical_id(ResourceKind::Charging, &r),
            "charging-2025-06-01-10:00-12:00"
        );
    }

    #[test]
    fn reconciliation_is_deterministic() {
        let r = row(&[
            ("date", json!("2025-06-01")),
            ("from_time", json!("10:00")),
            ("to_time", json!("12:00")),
        ]);
        assert_eq!(
            canonical_id(ResourceKind::Parking, &r),
            canonical_id(ResourceKind::Parking, &r)
        );
    }

    #[test]
    fn numeric_primary_key_becomes_text() {
        let r = row(&[("id", json!(42))]);
        assert_eq!(canonical_id(ResourceKind::Parking, &r), "42");
    }

    #[test]
    fn empty_string_id_is_treated_as_missing() {
        let r = row(&[
            ("id", json!("")),
            ("parking_transaction_id", json!("txn-3")),
        ]);
        assert_eq!(canonical_id(ResourceKind::Parking, &r), "txn-3");
    }

    #[test]
    fn resource_ref_prefers_kind_column() {
        let r = row(&[
            ("charger_id", json!("c-1")),
            ("charging_transaction_id", json!("c-2")),
        ]);
        assert_eq!(resource_ref(ResourceKind::Charging, &r), Some("c-1".into()));
    }

    #[test]
    fn charging_falls_back_to_transaction_column() {
        let r = row(&[("charging_transaction_id", json!("c-2"))]);
        assert_eq!(resource_ref(ResourceKind::Charging, &r), Some("c-2".into()));
    }

    #[test]
    fn parking_has_no_secondary_resource_column() {
        let r = row(&[("parking_transaction_id", json!("txn-1"))]);
        assert_eq!(resource_ref(ResourceKind::Parking, &r), None);
    }
}
