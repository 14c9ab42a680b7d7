use std::time::Instant;

use tracing::warn;

use crate::limits::MAX_TRIPS_PER_LISTING;
use crate::model::{ResourceKind, TripInfo};
use crate::observability::{LISTING_DURATION_SECONDS, MALFORMED_ROWS_TOTAL, kind_label};
use crate::store::Row;

use super::classify::{classify, now_local};
use super::reconcile::text;
use super::repository::{parse_slot, unknown_label};
use super::{Engine, EngineError, pricing, reconcile};

impl Engine {
    /// Everything the renter has booked, across both backing tables:
    /// reconcile each row to a canonical id, resolve its address, recompute
    /// the fee, classify it against the wall clock. Unordered. Malformed
    /// rows are dropped with a warning; infra errors abort the listing.
    pub async fn list_trips(&self, renter_email: &str) -> Result<Vec<TripInfo>, EngineError> {
        let started = Instant::now();
        let now = now_local();
        let mut trips = Vec::new();

        'kinds: for kind in [ResourceKind::Parking, ResourceKind::Charging] {
            let rows = self.repo.list_by_renter(kind, renter_email).await?;
            for row in rows {
                if trips.len() >= MAX_TRIPS_PER_LISTING {
                    warn!("trip listing for {renter_email} truncated at {MAX_TRIPS_PER_LISTING}");
                    break 'kinds;
                }
                match self.hydrate(kind, &row, now).await? {
                    Some(trip) => trips.push(trip),
                    None => {
                        metrics::counter!(MALFORMED_ROWS_TOTAL, "kind" => kind_label(kind))
                            .increment(1);
                        warn!("skipping malformed {kind} reservation row");
                    }
                }
            }
        }

        metrics::histogram!(LISTING_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
        Ok(trips)
    }

    /// One raw row → one trip. `Ok(None)` means the row is malformed
    /// (unparseable date/times); store failures propagate.
    async fn hydrate(
        &self,
        kind: ResourceKind,
        row: &Row,
        now: chrono::NaiveDateTime,
    ) -> Result<Option<TripInfo>, EngineError> {
        let Some(slot) = parse_slot(row) else {
            return Ok(None);
        };

        let canonical_id = reconcile::canonical_id(kind, row);
        let resource_id = reconcile::resource_ref(kind, row);
        let address = match &resource_id {
            Some(rid) => self.repo.resolve_resource_address(kind, rid).await?,
            None => unknown_label(kind).to_string(),
        };

        // The listing recomputes at the default rate rather than refetching
        // each resource's rate; booking-time pricing is authoritative.
        let fee = pricing::quote(
            &slot,
            self.config().default_hourly_rate,
            self.config().fixed_service_fee,
        );

        Ok(Some(TripInfo {
            canonical_id,
            kind,
            address,
            slot,
            fee,
            status: classify(&slot, now),
            resource_id,
            provider_email: text(row, "provideremail_id"),
        }))
    }
}
