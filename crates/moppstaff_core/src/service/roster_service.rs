//! Staff roster state manager.
//!
//! # Responsibility
//! - Hold the canonical in-memory roster and apply all mutations to it.
//! - Mirror every successful mutation into the durable store as one
//!   whole-roster snapshot.
//!
//! # Invariants
//! - Mutations are atomic in memory: fully applied or fully rejected
//!   before any observable change.
//! - The in-memory roster wins over the stored mirror until the next
//!   successful save.
//! - Member ids are unique within the roster and never reused.

use crate::model::staff::{StaffId, StaffMember, StaffStatus, StaffValidationError};
use crate::store::kv::{DurableStore, StoreError};
use crate::store::write_queue::{PersistTicket, WriteQueue};
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store key holding the serialized roster snapshot.
pub const ROSTER_KEY: &str = "mopp_staff_v1";

pub type RosterResult<T> = Result<T, RosterError>;

/// Error reported by roster mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// User input failed validation; nothing was mutated.
    Validation(StaffValidationError),
    /// No member carries the requested id; nothing was mutated.
    NotFound(StaffId),
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "staff member not found: {id}"),
        }
    }
}

impl Error for RosterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<StaffValidationError> for RosterError {
    fn from(value: StaffValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Fixed roster used when the store has no usable snapshot.
pub fn seed_roster() -> Vec<StaffMember> {
    vec![
        seed_member("1", "Mouna", StaffStatus::Available),
        seed_member("2", "Fatima", StaffStatus::Standby),
        seed_member("3", "Jonas", StaffStatus::Holiday),
        seed_member("4", "Linda", StaffStatus::Available),
    ]
}

fn seed_member(id: &str, name: &str, status: StaffStatus) -> StaffMember {
    StaffMember {
        id: id.to_string(),
        name: name.to_string(),
        status,
        photo_uri: None,
    }
}

/// Serializes a roster into its stored representation.
pub fn encode_roster(roster: &[StaffMember]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(roster)
}

/// Decodes a stored snapshot into a roster the manager may adopt.
///
/// Returns `None` for anything that must not be adopted: malformed
/// payloads, empty arrays, records failing validation, or duplicated ids.
/// Callers fall back to the seed roster in that case.
pub fn decode_roster(bytes: &[u8]) -> Option<Vec<StaffMember>> {
    let roster: Vec<StaffMember> = serde_json::from_slice(bytes).ok()?;
    if roster.is_empty() {
        return None;
    }
    if roster.iter().any(|member| member.validate().is_err()) {
        return None;
    }
    let mut seen = HashSet::new();
    if !roster.iter().all(|member| seen.insert(member.id.as_str())) {
        return None;
    }
    Some(roster)
}

/// State-owning manager for the staff roster.
///
/// Owns the only mutable copy of the roster; the presentation layer calls
/// in and re-renders from [`RosterService::staff`]. Every successful
/// mutation also enqueues one whole-roster write behind the single-writer
/// queue, returned to the caller as a [`PersistTicket`] it may wait on or
/// drop.
pub struct RosterService {
    roster: Vec<StaffMember>,
    queue: WriteQueue,
}

impl RosterService {
    /// Loads the roster from `store` and takes ownership of persistence.
    ///
    /// Absent, unreadable, malformed and empty snapshots all fall back to
    /// the seed roster. The fallback does not write back to the store; the
    /// next mutation will.
    pub fn open<S>(mut store: S) -> Self
    where
        S: DurableStore + Send + 'static,
    {
        let roster = match store.load(ROSTER_KEY) {
            Ok(Some(bytes)) => match decode_roster(&bytes) {
                Some(roster) => {
                    info!(
                        "event=roster_load module=roster status=ok members={}",
                        roster.len()
                    );
                    roster
                }
                None => {
                    warn!("event=roster_load module=roster status=fallback reason=unusable_snapshot");
                    seed_roster()
                }
            },
            Ok(None) => {
                info!("event=roster_load module=roster status=fallback reason=absent");
                seed_roster()
            }
            Err(err) => {
                warn!("event=roster_load module=roster status=fallback reason=store_error error={err}");
                seed_roster()
            }
        };

        Self {
            roster,
            queue: WriteQueue::spawn(store),
        }
    }

    /// Current roster snapshot for rendering.
    pub fn staff(&self) -> &[StaffMember] {
        &self.roster
    }

    /// Adds a new member at the top of the roster (newest first).
    pub fn create(
        &mut self,
        name: &str,
        status: StaffStatus,
        photo_uri: Option<String>,
    ) -> RosterResult<(StaffMember, PersistTicket)> {
        let member = StaffMember::new(name, status, photo_uri)?;
        self.roster.insert(0, member.clone());
        let ticket = self.persist_snapshot();
        Ok((member, ticket))
    }

    /// Replaces name, status and photo of one member, preserving its id
    /// and position.
    pub fn update(
        &mut self,
        id: &str,
        name: &str,
        status: StaffStatus,
        photo_uri: Option<String>,
    ) -> RosterResult<(StaffMember, PersistTicket)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StaffValidationError::EmptyName.into());
        }

        let member = self.find_mut(id)?;
        member.name = name.to_string();
        member.status = status;
        member.photo_uri = photo_uri;
        let member = member.clone();

        let ticket = self.persist_snapshot();
        Ok((member, ticket))
    }

    /// Advances one member's availability along the fixed rotation.
    pub fn cycle_status(&mut self, id: &str) -> RosterResult<(StaffMember, PersistTicket)> {
        let member = self.find_mut(id)?;
        member.status = member.status.next();
        let member = member.clone();

        let ticket = self.persist_snapshot();
        Ok((member, ticket))
    }

    /// Removes one member. Unknown ids are a no-op: no mutation, no store
    /// write, and `None` instead of a ticket.
    pub fn remove(&mut self, id: &str) -> Option<PersistTicket> {
        let position = self.roster.iter().position(|member| member.id == id)?;
        self.roster.remove(position);
        Some(self.persist_snapshot())
    }

    /// Discards the roster and the stored snapshot and reinstates the seed.
    ///
    /// Destructive and unconditional; any confirmation dialog belongs to
    /// the caller.
    pub fn reset_to_default(&mut self) -> PersistTicket {
        info!("event=roster_reset module=roster status=ok");
        self.roster = seed_roster();
        self.queue.enqueue_remove(ROSTER_KEY)
    }

    fn find_mut(&mut self, id: &str) -> RosterResult<&mut StaffMember> {
        match self.roster.iter_mut().find(|member| member.id == id) {
            Some(member) => Ok(member),
            None => Err(RosterError::NotFound(id.to_string())),
        }
    }

    fn persist_snapshot(&self) -> PersistTicket {
        match encode_roster(&self.roster) {
            Ok(bytes) => self.queue.enqueue_save(ROSTER_KEY, bytes),
            Err(err) => {
                error!(
                    "event=roster_persist module=roster status=error error_code=encode_failed error={err}"
                );
                PersistTicket::failed(StoreError::Encode(err))
            }
        }
    }
}
