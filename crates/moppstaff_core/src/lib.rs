//! Core domain logic for MOPP Staff.
//! This crate is the single source of truth for roster invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::staff::{StaffId, StaffMember, StaffStatus, StaffValidationError};
pub use service::roster_service::{
    decode_roster, encode_roster, seed_roster, RosterError, RosterResult, RosterService,
    ROSTER_KEY,
};
pub use store::kv::{DurableStore, SqliteKvStore, StoreError, StoreResult};
pub use store::write_queue::{PersistError, PersistResult, PersistTicket, WriteQueue};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
