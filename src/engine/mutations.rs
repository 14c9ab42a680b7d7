use std::time::Instant;

use chrono::Timelike;
use serde_json::Value;
use tracing::{debug, info};

use crate::limits::{MAX_EMAIL_LEN, MAX_RESOURCE_ID_LEN};
use crate::model::{BookingRequest, Reservation, ResourceKind, Slot, WalletSettlement};
use crate::observability::{
    BOOKING_DURATION_SECONDS, BOOKINGS_TOTAL, CANCELLATIONS_TOTAL, CONFLICTS_TOTAL, kind_label,
};

use super::classify::{classify, now_local};
use super::reconcile::text;
use super::{Engine, EngineError, pricing, reconcile};

fn outcome_label(result: &Result<Reservation, EngineError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(EngineError::Validation(_)) => "validation",
        Err(EngineError::Conflict { .. }) => "conflict",
        Err(EngineError::NotFound(_)) => "not_found",
        Err(EngineError::Infra(_)) => "infra",
    }
}

/// Field presence, length bounds, clock quantization, and interval sanity.
/// Everything here fails before the store is touched.
fn validate(req: &BookingRequest, end_step_minutes: u32) -> Result<Slot, EngineError> {
    if req.renter_email.is_empty() {
        return Err(EngineError::Validation("renter email is required"));
    }
    if req.renter_email.len() > MAX_EMAIL_LEN {
        return Err(EngineError::Validation("renter email too long"));
    }
    if req.resource_id.is_empty() {
        return Err(EngineError::Validation("resource id is required"));
    }
    if req.resource_id.len() > MAX_RESOURCE_ID_LEN {
        return Err(EngineError::Validation("resource id too long"));
    }

    // Starts snap to the hour, ends snap down to the configured step —
    // the stored schema only ever holds quantized HH:MM values.
    let from = req
        .from
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .unwrap_or(req.from);
    let step = end_step_minutes.clamp(1, 60);
    let to = req
        .to
        .with_minute(req.to.minute() - req.to.minute() % step)
        .and_then(|t| t.with_second(0))
        .unwrap_or(req.to);

    if from >= to {
        return Err(EngineError::Validation("end time must be after start time"));
    }
    Ok(Slot::new(req.date, from, to))
}

impl Engine {
    /// Execute a booking end to end: validate, check availability, price,
    /// persist. Best-effort with no rollback — nothing is mutated before
    /// the single insert. Retries are the caller's business and must
    /// re-invoke the whole thing.
    pub async fn book(&self, req: BookingRequest) -> Result<Reservation, EngineError> {
        let started = Instant::now();
        let kind = req.kind;
        let result = self.book_inner(req).await;
        metrics::histogram!(BOOKING_DURATION_SECONDS, "kind" => kind_label(kind))
            .record(started.elapsed().as_secs_f64());
        metrics::counter!(
            BOOKINGS_TOTAL,
            "kind" => kind_label(kind),
            "outcome" => outcome_label(&result)
        )
        .increment(1);
        match &result {
            Ok(r) => info!(
                "booked {kind} {} {} for {} (total ${:.2})",
                r.resource_id, r.slot, r.renter_email, r.fee.total_fee
            ),
            Err(e @ EngineError::Conflict { .. }) => {
                metrics::counter!(CONFLICTS_TOTAL, "kind" => kind_label(kind)).increment(1);
                debug!("booking refused: {e}");
            }
            Err(e) => debug!("booking aborted: {e}"),
        }
        result
    }

    async fn book_inner(&self, req: BookingRequest) -> Result<Reservation, EngineError> {
        let slot = validate(&req, self.config().end_step_minutes)?;

        // Refuse before any write occurs.
        self.check_available(req.kind, &req.resource_id, &slot).await?;

        let resource = self
            .repo
            .resource_row(req.kind, &req.resource_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("{} {}", req.kind, req.resource_id)))?;
        let provider_email = text(&resource, "email_id").ok_or_else(|| {
            EngineError::NotFound(format!("provider for {} {}", req.kind, req.resource_id))
        })?;

        let rate = resource
            .get("hourly_rate")
            .and_then(Value::as_f64)
            .unwrap_or(self.config().default_hourly_rate);
        if !rate.is_finite() || rate < 0.0 {
            return Err(EngineError::Validation(
                "hourly rate must be finite and non-negative",
            ));
        }
        let fee = pricing::quote(&slot, rate, self.config().fixed_service_fee);

        let (renter_account, renter_evm) = self.repo.renter_settlement(&req.renter_email).await?;
        let settlement = WalletSettlement {
            renter_account,
            renter_evm,
            provider_account: text(&resource, "provider_account_addr").unwrap_or_default(),
            provider_evm: text(&resource, "provider_evm_addr").unwrap_or_default(),
        };

        let stored = self
            .repo
            .create(
                req.kind,
                &req.resource_id,
                &req.renter_email,
                &provider_email,
                &slot,
                &settlement,
            )
            .await?;
        let canonical_id = reconcile::canonical_id(req.kind, &stored);

        Ok(Reservation {
            canonical_id,
            kind: req.kind,
            resource_id: req.resource_id,
            renter_email: req.renter_email,
            provider_email,
            slot,
            fee,
            settlement,
            status: classify(&slot, now_local()),
        })
    }

    /// Cancel = delete the row; reservations are never edited in place.
    /// A second cancel of the same reservation yields `NotFound`, which
    /// callers may treat as a no-op.
    pub async fn cancel(
        &self,
        kind: ResourceKind,
        canonical_id: &str,
        slot: &Slot,
        provider_email: Option<&str>,
    ) -> Result<(), EngineError> {
        let result = self.repo.delete(kind, canonical_id, slot, provider_email).await;
        let outcome = match &result {
            Ok(()) => "ok",
            Err(EngineError::NotFound(_)) => "not_found",
            Err(_) => "infra",
        };
        metrics::counter!(
            CANCELLATIONS_TOTAL,
            "kind" => kind_label(kind),
            "outcome" => outcome
        )
        .increment(1);
        match &result {
            Ok(()) => info!("cancelled {kind} reservation {canonical_id}"),
            Err(e) => debug!("cancel {canonical_id}: {e}"),
        }
        result
    }
}
