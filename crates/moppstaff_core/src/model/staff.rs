//! Staff roster domain model.
//!
//! # Responsibility
//! - Define the canonical staff record rendered by the roster UI.
//! - Own name validation and the fixed availability rotation.
//!
//! # Invariants
//! - `id` is stable, unique within a roster, and never reused.
//! - `name` is stored trimmed and is never empty.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static NAME_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Stable identifier for one staff member.
///
/// Kept opaque as a string: freshly created members carry a UUIDv4 value,
/// while rosters persisted by earlier app versions may carry plain numeric
/// ids. Nothing is allowed to parse or order these.
pub type StaffId = String;

/// Availability shown on the staff wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffStatus {
    /// On shift and reachable.
    Available,
    /// Off shift but can be called in.
    Standby,
    /// Away; do not schedule.
    Holiday,
}

impl StaffStatus {
    /// Advances along the fixed rotation
    /// Available -> Standby -> Holiday -> Available.
    pub fn next(self) -> Self {
        match self {
            Self::Available => Self::Standby,
            Self::Standby => Self::Holiday,
            Self::Holiday => Self::Available,
        }
    }

    /// Human-readable label for the status chip.
    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Standby => "Standby",
            Self::Holiday => "Holiday",
        }
    }

    /// Stable wire tag used in storage and across the FFI boundary.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Standby => "STANDBY",
            Self::Holiday => "HOLIDAY",
        }
    }

    /// Parses a wire tag produced by [`StaffStatus::as_tag`].
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "AVAILABLE" => Some(Self::Available),
            "STANDBY" => Some(Self::Standby),
            "HOLIDAY" => Some(Self::Holiday),
            _ => None,
        }
    }
}

/// Validation failure for staff record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffValidationError {
    /// Name is empty after trimming.
    EmptyName,
    /// Caller-provided id is empty.
    EmptyId,
}

impl Display for StaffValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "staff name must not be empty"),
            Self::EmptyId => write!(f, "staff id must not be empty"),
        }
    }
}

impl Error for StaffValidationError {}

/// Canonical staff record held by the roster.
///
/// The serialized shape (`id`, `name`, `status`, optional `photoUri`) is
/// the stored mirror format and must keep round-tripping older snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Stable id used for edits, deletes and status changes.
    pub id: StaffId,
    /// Trimmed display name.
    pub name: String,
    pub status: StaffStatus,
    /// Locator handed over by the external photo picker; `None` means the
    /// UI renders initials instead. Stored opaquely, never interpreted.
    #[serde(rename = "photoUri", default, skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,
}

impl StaffMember {
    /// Creates a member with a freshly allocated id.
    pub fn new(
        name: impl Into<String>,
        status: StaffStatus,
        photo_uri: Option<String>,
    ) -> Result<Self, StaffValidationError> {
        Self::with_id(Uuid::new_v4().to_string(), name, status, photo_uri)
    }

    /// Creates a member with caller-provided identity (seed and decode paths).
    ///
    /// # Invariants
    /// - The provided `id` must remain stable for this member's lifetime.
    pub fn with_id(
        id: StaffId,
        name: impl Into<String>,
        status: StaffStatus,
        photo_uri: Option<String>,
    ) -> Result<Self, StaffValidationError> {
        let member = Self {
            id,
            name: name.into().trim().to_string(),
            status,
            photo_uri,
        };
        member.validate()?;
        Ok(member)
    }

    /// Checks the record invariants shared by create, update and decode paths.
    pub fn validate(&self) -> Result<(), StaffValidationError> {
        if self.id.trim().is_empty() {
            return Err(StaffValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(StaffValidationError::EmptyName);
        }
        Ok(())
    }

    /// Uppercased initials for photo-less rendering.
    ///
    /// First letter of the first and last whitespace-separated name parts;
    /// single-part names yield one letter.
    pub fn initials(&self) -> String {
        let parts: Vec<&str> = NAME_SPLIT_RE
            .split(self.name.trim())
            .filter(|part| !part.is_empty())
            .collect();
        let first = parts.first().and_then(|part| part.chars().next());
        let last = if parts.len() > 1 {
            parts.last().and_then(|part| part.chars().next())
        } else {
            None
        };
        first
            .into_iter()
            .chain(last)
            .flat_map(char::to_uppercase)
            .collect()
    }
}
