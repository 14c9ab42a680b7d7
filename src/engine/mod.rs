mod classify;
mod conflict;
mod error;
mod mutations;
mod pricing;
mod queries;
mod reconcile;
mod repository;

pub use classify::classify;
pub use error::EngineError;
pub use pricing::quote;
pub use reconcile::{canonical_id, resource_ref};
pub use repository::Repository;

use std::sync::Arc;

use crate::store::RecordStore;

/// Engine tunables. Defaults match the production app: $0.25 flat service
/// fee, $2/hr when a resource row carries no rate, 30-minute end steps.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Flat per-booking charge added to every quote.
    pub fixed_service_fee: f64,
    /// Hourly rate used when the resource row has no `hourly_rate` column.
    pub default_hourly_rate: f64,
    /// End times are snapped down to this minute step; starts snap to the
    /// hour.
    pub end_step_minutes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_service_fee: 0.25,
            default_hourly_rate: 2.0,
            end_step_minutes: 30,
        }
    }
}

/// The reservation lifecycle engine. One instance per process; every
/// booking or listing request runs as its own task with no coordination
/// between requests beyond what the store provides.
pub struct Engine {
    repo: Repository,
    config: EngineConfig,
}

impl Engine {
    pub fn new(store: Arc<dyn RecordStore>, config: EngineConfig) -> Self {
        Self {
            repo: Repository::new(store),
            config,
        }
    }

    pub fn with_defaults(store: Arc<dyn RecordStore>) -> Self {
        Self::new(store, EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
