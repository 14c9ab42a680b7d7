use std::sync::Arc;

use chrono::Duration;
use serde_json::json;
use tracing::info;

use parkd::auth::{IdentitySource, StaticIdentity};
use parkd::bookmarks::SavedMarks;
use parkd::engine::{Engine, EngineConfig, EngineError};
use parkd::model::{BookingRequest, ResourceKind};
use parkd::store::{MemoryStore, RecordStore, Row};

fn seed_row(pairs: &[(&str, &str)]) -> Row {
    pairs.iter().map(|(k, v)| (k.to_string(), json!(v))).collect()
}

/// Smoke harness: wire the engine against the in-memory store, run one
/// booking/listing/cancel round-trip, and exit. The engine has no wire
/// protocol of its own — in the app it sits behind the UI screens.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("PARKD_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    parkd::observability::init(metrics_port);

    let mut config = EngineConfig::default();
    if let Some(fee) = std::env::var("PARKD_SERVICE_FEE")
        .ok()
        .and_then(|s| s.parse().ok())
    {
        config.fixed_service_fee = fee;
    }
    if let Some(rate) = std::env::var("PARKD_HOURLY_RATE")
        .ok()
        .and_then(|s| s.parse().ok())
    {
        config.default_hourly_rate = rate;
    }

    let store = Arc::new(MemoryStore::new());
    store.seed(
        "Parking",
        [seed_row(&[
            ("parking_id", "p-100"),
            ("email_id", "provider@parkd.test"),
            ("address", "12 Harbor St"),
            ("provider_account_addr", "0.0.1001"),
            ("provider_evm_addr", "0xabc"),
        ])],
    );
    store.seed(
        "Chargers",
        [seed_row(&[
            ("charger_id", "c-200"),
            ("email_id", "provider@parkd.test"),
            ("address", "EV Hub, 40 Dock Rd"),
            ("provider_account_addr", "0.0.1002"),
            ("provider_evm_addr", "0xdef"),
        ])],
    );
    store.seed(
        "user",
        [seed_row(&[
            ("email_id", "renter@parkd.test"),
            ("hedera_account_id", "0.0.2001"),
            ("hedera_evm_addr", "0x123"),
        ])],
    );

    let engine = Engine::new(store.clone() as Arc<dyn RecordStore>, config);
    let identity = StaticIdentity::new("renter@parkd.test");
    let marks = SavedMarks::new();

    let renter = identity
        .current_email()
        .await
        .ok_or("no signed-in user")?;
    // Tomorrow morning, so the trip lists as Active.
    let date = (chrono::Local::now() + Duration::days(1)).date_naive();
    let from = chrono::NaiveTime::from_hms_opt(9, 0, 0).ok_or("clock")?;
    let to = chrono::NaiveTime::from_hms_opt(11, 0, 0).ok_or("clock")?;

    let booked = engine
        .book(BookingRequest {
            kind: ResourceKind::Parking,
            resource_id: "p-100".into(),
            renter_email: renter.clone(),
            date,
            from,
            to,
        })
        .await?;
    info!(
        "reservation {} confirmed, total ${:.2}",
        booked.canonical_id, booked.fee.total_fee
    );
    marks.add(&renter, &booked.canonical_id);

    // The same slot again must be refused.
    match engine
        .book(BookingRequest {
            kind: ResourceKind::Parking,
            resource_id: "p-100".into(),
            renter_email: renter.clone(),
            date,
            from,
            to,
        })
        .await
    {
        Err(e @ EngineError::Conflict { .. }) => info!("as expected: {}", e.user_message()),
        other => return Err(format!("expected a conflict, got {other:?}").into()),
    }

    for trip in engine.list_trips(&renter).await? {
        info!(
            "trip {} at {} — {} {:?} saved={}",
            trip.canonical_id,
            trip.address,
            trip.slot,
            trip.status,
            marks.is_saved(&renter, &trip.canonical_id)
        );
    }

    engine
        .cancel(
            booked.kind,
            &booked.canonical_id,
            &booked.slot,
            Some(&booked.provider_email),
        )
        .await?;
    marks.remove(&renter, &booked.canonical_id);
    info!("round-trip complete");
    Ok(())
}
