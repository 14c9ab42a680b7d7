//! CRUD boundary over the two parallel reservation tables. All table and
//! column names live here (and in `reconcile`); the rest of the engine
//! only sees [`ResourceKind`] and domain types.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde_json::{Value, json};

use crate::model::{DATE_FMT, ResourceKind, Slot, TIME_FMT, WalletSettlement};
use crate::store::{Filter, RecordStore, Row};

use super::EngineError;
use super::reconcile::{resource_column, text};

// Live schema names. The charging reservation table really is singular.
const PARKING_RESERVATIONS: &str = "Parking_Transactions";
const CHARGING_RESERVATIONS: &str = "Charging_Transaction";
const PARKING_RESOURCES: &str = "Parking";
const CHARGING_RESOURCES: &str = "Chargers";
const USERS: &str = "user";

fn reservations_table(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Parking => PARKING_RESERVATIONS,
        ResourceKind::Charging => CHARGING_RESERVATIONS,
    }
}

fn resources_table(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Parking => PARKING_RESOURCES,
        ResourceKind::Charging => CHARGING_RESOURCES,
    }
}

pub(super) fn unknown_label(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Parking => "Unknown Location",
        ResourceKind::Charging => "Unknown Charging Station",
    }
}

/// Dates and times are stored as text columns; rows that predate the
/// current schema may carry anything, so parsing is fallible per row.
pub(super) fn parse_slot(row: &Row) -> Option<Slot> {
    let date = NaiveDate::parse_from_str(&text(row, "date")?, DATE_FMT).ok()?;
    let from = NaiveTime::parse_from_str(&text(row, "from_time")?, TIME_FMT).ok()?;
    let to = NaiveTime::parse_from_str(&text(row, "to_time")?, TIME_FMT).ok()?;
    if from >= to {
        return None;
    }
    Some(Slot::new(date, from, to))
}

pub struct Repository {
    store: Arc<dyn RecordStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Raw reservation rows for one renter, one table. Unordered; ordering
    /// is a presentation concern.
    pub async fn list_by_renter(
        &self,
        kind: ResourceKind,
        renter_email: &str,
    ) -> Result<Vec<Row>, EngineError> {
        let filter = Filter::new().eq("useremail_id", renter_email);
        Ok(self.store.select(reservations_table(kind), &filter).await?)
    }

    /// Raw reservation rows for one resource and date — the availability
    /// checker's read.
    pub async fn list_by_resource_and_date(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Row>, EngineError> {
        let filter = Filter::new()
            .eq(resource_column(kind), resource_id)
            .eq("date", date.format(DATE_FMT).to_string());
        Ok(self.store.select(reservations_table(kind), &filter).await?)
    }

    /// Insert a reservation row, returning it as stored (with the
    /// store-assigned primary key).
    pub async fn create(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        renter_email: &str,
        provider_email: &str,
        slot: &Slot,
        settlement: &WalletSettlement,
    ) -> Result<Row, EngineError> {
        let mut row = Row::new();
        row.insert("useremail_id".into(), json!(renter_email));
        row.insert("provideremail_id".into(), json!(provider_email));
        row.insert("date".into(), json!(slot.date.format(DATE_FMT).to_string()));
        row.insert("from_time".into(), json!(slot.from.format(TIME_FMT).to_string()));
        row.insert("to_time".into(), json!(slot.to.format(TIME_FMT).to_string()));
        row.insert(resource_column(kind).into(), json!(resource_id));
        row.insert("provider_account_addr".into(), json!(settlement.provider_account));
        row.insert("provider_evm_addr".into(), json!(settlement.provider_evm));
        row.insert("user_account_addr".into(), json!(settlement.renter_account));
        row.insert("user_evm_addr".into(), json!(settlement.renter_evm));
        row.insert("provider_earned_rewards".into(), json!("0"));
        row.insert("user_earned_rewards".into(), json!("0"));
        row.insert("nft_id".into(), json!(""));
        match kind {
            ResourceKind::Parking => {
                row.insert("transaction_link".into(), json!(""));
            }
            ResourceKind::Charging => {
                // Legacy stored-status column. Written for schema
                // compatibility, never read back: status is derived.
                row.insert("status".into(), json!("Active"));
            }
        }
        Ok(self.store.insert(reservations_table(kind), row).await?)
    }

    /// Delete by primary id, falling back to the composite
    /// `(date, from_time, to_time[, provideremail_id])` when the canonical
    /// id was synthetic and never stored as a column value. `NotFound` only
    /// when neither pass removes a row.
    pub async fn delete(
        &self,
        kind: ResourceKind,
        canonical_id: &str,
        slot: &Slot,
        provider_email: Option<&str>,
    ) -> Result<(), EngineError> {
        let table = reservations_table(kind);
        let by_id = Filter::new().eq("id", canonical_id);
        if self.store.delete(table, &by_id).await? > 0 {
            return Ok(());
        }

        let mut composite = Filter::new()
            .eq("date", slot.date.format(DATE_FMT).to_string())
            .eq("from_time", slot.from.format(TIME_FMT).to_string())
            .eq("to_time", slot.to.format(TIME_FMT).to_string());
        if let Some(provider) = provider_email {
            composite = composite.eq("provideremail_id", provider);
        }
        if self.store.delete(table, &composite).await? > 0 {
            return Ok(());
        }
        Err(EngineError::NotFound(format!("{kind} reservation {canonical_id}")))
    }

    /// The resource's metadata row, if it exists.
    pub async fn resource_row(
        &self,
        kind: ResourceKind,
        resource_id: &str,
    ) -> Result<Option<Row>, EngineError> {
        let filter = Filter::new().eq(resource_column(kind), resource_id);
        let mut rows = self.store.select(resources_table(kind), &filter).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    /// Human-readable address of a resource. Field naming drifted across
    /// schema revisions, so try the preferred column, two known alternates,
    /// then any string column that smells like a location.
    pub async fn resolve_resource_address(
        &self,
        kind: ResourceKind,
        resource_id: &str,
    ) -> Result<String, EngineError> {
        let Some(row) = self.resource_row(kind, resource_id).await? else {
            return Ok(unknown_label(kind).to_string());
        };
        for column in ["address", "title", "location"] {
            if let Some(addr) = text(&row, column) {
                return Ok(addr);
            }
        }
        for (key, value) in &row {
            if let Value::String(s) = value
                && !s.is_empty()
                && (key.contains("addr") || key.contains("location") || key.contains("place"))
            {
                return Ok(s.clone());
            }
        }
        Ok(unknown_label(kind).to_string())
    }

    /// Renter wallet addresses from the user table. Best-effort: a missing
    /// row settles with empty addresses rather than blocking the booking.
    pub async fn renter_settlement(&self, email: &str) -> Result<(String, String), EngineError> {
        let filter = Filter::new().eq("email_id", email);
        let rows = self.store.select(USERS, &filter).await?;
        let Some(row) = rows.first() else {
            return Ok((String::new(), String::new()));
        };
        Ok((
            text(row, "hedera_account_id").unwrap_or_default(),
            text(row, "hedera_evm_addr").unwrap_or_default(),
        ))
    }
}
