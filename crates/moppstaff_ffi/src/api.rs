//! FFI use-case API for the mobile shell.
//!
//! # Responsibility
//! - Expose roster operations to Dart via FRB sync calls.
//! - Keep one process-wide roster instance as the canonical state.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The in-memory roster stays authoritative; store writes are detached
//!   and never block the UI.

use log::warn;
use moppstaff_core::db::{open_db, open_db_in_memory};
use moppstaff_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    RosterService, SqliteKvStore, StaffMember, StaffStatus,
};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Mutex;

const ROSTER_DB_FILE_NAME: &str = "moppstaff.sqlite3";
static ROSTER: OnceCell<Mutex<RosterService>> = OnceCell::new();
static ROSTER_DB_PATH: OnceCell<PathBuf> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same configuration (idempotent).
/// - Reconfiguration attempts return an error message.
/// - Never panics; returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One roster row shaped for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffItem {
    /// Stable member id in string form.
    pub id: String,
    pub name: String,
    /// Status wire tag (`AVAILABLE|STANDBY|HOLIDAY`).
    pub status: String,
    /// Display label for the status chip.
    pub status_label: String,
    /// Uppercased initials rendered when `photo_uri` is absent.
    pub initials: String,
    pub photo_uri: Option<String>,
}

/// Roster list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffListResponse {
    /// Current roster, newest member first.
    pub items: Vec<StaffItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Mutation result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffActionResponse {
    /// Whether the operation mutated the roster.
    pub ok: bool,
    /// Id of the affected member, when one exists.
    pub staff_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl StaffActionResponse {
    fn success(message: impl Into<String>, staff_id: String) -> Self {
        Self {
            ok: true,
            staff_id: Some(staff_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            staff_id: None,
            message: message.into(),
        }
    }
}

/// Returns the current roster for the staff wall.
///
/// # FFI contract
/// - Sync call; reads in-memory state only.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn staff_list() -> StaffListResponse {
    match with_roster(|roster| roster.staff().iter().map(to_staff_item).collect::<Vec<_>>()) {
        Ok(items) => {
            let message = format!("{} member(s).", items.len());
            StaffListResponse { items, message }
        }
        Err(message) => StaffListResponse {
            items: Vec::new(),
            message,
        },
    }
}

/// Adds a new staff member at the top of the roster.
///
/// # FFI contract
/// - Empty names are rejected with `ok = false`; nothing is mutated.
/// - `status` must be a wire tag accepted by the roster.
/// - Persistence runs detached; the response reflects in-memory state.
#[flutter_rust_bridge::frb(sync)]
pub fn staff_create(
    name: String,
    status: String,
    photo_uri: Option<String>,
) -> StaffActionResponse {
    let Some(status) = parse_status_tag(&status) else {
        return StaffActionResponse::failure(format!("unknown status tag `{status}`"));
    };

    match with_roster(|roster| {
        roster
            .create(&name, status, photo_uri)
            .map(|(member, _ticket)| member)
    }) {
        Ok(Ok(member)) => StaffActionResponse::success("Employee added.", member.id),
        Ok(Err(err)) => StaffActionResponse::failure(err.to_string()),
        Err(message) => StaffActionResponse::failure(message),
    }
}

/// Replaces name, status and photo of one member.
///
/// # FFI contract
/// - Same validation as `staff_create`.
/// - Unknown ids return `ok = false` without mutating anything.
#[flutter_rust_bridge::frb(sync)]
pub fn staff_update(
    id: String,
    name: String,
    status: String,
    photo_uri: Option<String>,
) -> StaffActionResponse {
    let Some(status) = parse_status_tag(&status) else {
        return StaffActionResponse::failure(format!("unknown status tag `{status}`"));
    };

    match with_roster(|roster| {
        roster
            .update(&id, &name, status, photo_uri)
            .map(|(member, _ticket)| member)
    }) {
        Ok(Ok(member)) => StaffActionResponse::success("Employee updated.", member.id),
        Ok(Err(err)) => StaffActionResponse::failure(err.to_string()),
        Err(message) => StaffActionResponse::failure(message),
    }
}

/// Removes one member from the roster.
///
/// # FFI contract
/// - Removing an unknown id is not an error; `ok = false` reports that
///   nothing was removed.
#[flutter_rust_bridge::frb(sync)]
pub fn staff_delete(id: String) -> StaffActionResponse {
    match with_roster(|roster| roster.remove(&id).is_some()) {
        Ok(true) => StaffActionResponse::success("Employee removed.", id),
        Ok(false) => StaffActionResponse::failure("No employee with that id."),
        Err(message) => StaffActionResponse::failure(message),
    }
}

/// Advances one member's availability along the fixed rotation.
///
/// # FFI contract
/// - Unknown ids return `ok = false` without mutating anything.
#[flutter_rust_bridge::frb(sync)]
pub fn staff_cycle_status(id: String) -> StaffActionResponse {
    match with_roster(|roster| {
        roster
            .cycle_status(&id)
            .map(|(member, _ticket)| member)
    }) {
        Ok(Ok(member)) => StaffActionResponse::success(
            format!("Status set to {}.", member.status.label()),
            member.id,
        ),
        Ok(Err(err)) => StaffActionResponse::failure(err.to_string()),
        Err(message) => StaffActionResponse::failure(message),
    }
}

/// Restores the default roster, discarding the stored snapshot.
///
/// # FFI contract
/// - Destructive; the shell is expected to confirm with the user first.
/// - Returns the reinstated default roster.
#[flutter_rust_bridge::frb(sync)]
pub fn staff_reset() -> StaffListResponse {
    match with_roster(|roster| {
        let _ticket = roster.reset_to_default();
        roster.staff().iter().map(to_staff_item).collect::<Vec<_>>()
    }) {
        Ok(items) => StaffListResponse {
            items,
            message: "Roster reset to defaults.".to_string(),
        },
        Err(message) => StaffListResponse {
            items: Vec::new(),
            message,
        },
    }
}

fn parse_status_tag(tag: &str) -> Option<StaffStatus> {
    StaffStatus::parse(tag.trim())
}

fn to_staff_item(member: &StaffMember) -> StaffItem {
    StaffItem {
        id: member.id.clone(),
        name: member.name.clone(),
        status: member.status.as_tag().to_string(),
        status_label: member.status.label().to_string(),
        initials: member.initials(),
        photo_uri: member.photo_uri.clone(),
    }
}

fn with_roster<T>(f: impl FnOnce(&mut RosterService) -> T) -> Result<T, String> {
    let roster = ROSTER.get_or_try_init(|| -> Result<Mutex<RosterService>, String> {
        Ok(Mutex::new(RosterService::open(open_default_store()?)))
    })?;
    let mut guard = roster
        .lock()
        .map_err(|_| "roster state is poisoned".to_string())?;
    Ok(f(&mut guard))
}

fn open_default_store() -> Result<SqliteKvStore, String> {
    let path = resolve_db_path();
    let file_store = open_db(&path)
        .map_err(|err| err.to_string())
        .and_then(|conn| SqliteKvStore::try_new(conn).map_err(|err| err.to_string()));

    match file_store {
        Ok(store) => Ok(store),
        Err(err) => {
            // Roster stays usable without durability; the store contract
            // never surfaces read failures to the user.
            warn!(
                "event=roster_store_open module=ffi status=fallback path={} error={err}",
                path.display()
            );
            let conn = open_db_in_memory()
                .map_err(|err| format!("in-memory store open failed: {err}"))?;
            SqliteKvStore::try_new(conn).map_err(|err| format!("in-memory store init failed: {err}"))
        }
    }
}

fn resolve_db_path() -> PathBuf {
    ROSTER_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("MOPPSTAFF_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(ROSTER_DB_FILE_NAME)
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ping, staff_create, staff_cycle_status, staff_delete,
        staff_list, staff_reset, staff_update,
    };
    use serial_test::serial;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/moppstaff-logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    #[serial]
    fn staff_create_then_list_contains_member() {
        let name = unique_token("list-roundtrip");
        let created = staff_create(name.clone(), "STANDBY".to_string(), None);
        assert!(created.ok, "{}", created.message);
        let created_id = created.staff_id.clone().expect("create should return an id");

        let listed = staff_list();
        let item = listed
            .items
            .iter()
            .find(|item| item.id == created_id)
            .expect("created member should be listed");
        assert_eq!(item.name, name);
        assert_eq!(item.status, "STANDBY");
        assert_eq!(item.status_label, "Standby");
        assert!(item.photo_uri.is_none());
        assert!(!item.initials.is_empty());
    }

    #[test]
    #[serial]
    fn staff_create_rejects_blank_name_and_unknown_status() {
        let blank = staff_create("   ".to_string(), "AVAILABLE".to_string(), None);
        assert!(!blank.ok);
        assert!(blank.message.contains("name"));

        let unknown = staff_create("Sam".to_string(), "SICK".to_string(), None);
        assert!(!unknown.ok);
        assert!(unknown.message.contains("SICK"));
    }

    #[test]
    #[serial]
    fn staff_update_replaces_fields_and_rejects_unknown_id() {
        let created = staff_create(unique_token("update"), "AVAILABLE".to_string(), None);
        assert!(created.ok, "{}", created.message);
        let id = created.staff_id.expect("create should return an id");

        let renamed = unique_token("renamed");
        let updated = staff_update(
            id.clone(),
            renamed.clone(),
            "HOLIDAY".to_string(),
            Some("file:///photos/a.jpg".to_string()),
        );
        assert!(updated.ok, "{}", updated.message);

        let listed = staff_list();
        let item = listed
            .items
            .iter()
            .find(|item| item.id == id)
            .expect("updated member should be listed");
        assert_eq!(item.name, renamed);
        assert_eq!(item.status, "HOLIDAY");
        assert_eq!(item.photo_uri.as_deref(), Some("file:///photos/a.jpg"));

        let missing = staff_update(
            "no-such-id".to_string(),
            "X".to_string(),
            "AVAILABLE".to_string(),
            None,
        );
        assert!(!missing.ok);
        assert!(missing.message.contains("not found"));
    }

    #[test]
    #[serial]
    fn staff_cycle_status_three_times_returns_to_start() {
        let created = staff_create(unique_token("cycle"), "AVAILABLE".to_string(), None);
        assert!(created.ok, "{}", created.message);
        let id = created.staff_id.expect("create should return an id");

        let first = staff_cycle_status(id.clone());
        assert!(first.ok);
        assert!(first.message.contains("Standby"));
        let second = staff_cycle_status(id.clone());
        assert!(second.message.contains("Holiday"));
        let third = staff_cycle_status(id.clone());
        assert!(third.message.contains("Available"));

        let missing = staff_cycle_status("no-such-id".to_string());
        assert!(!missing.ok);
    }

    #[test]
    #[serial]
    fn staff_delete_reports_noop_for_unknown_id() {
        let missing = staff_delete("no-such-id".to_string());
        assert!(!missing.ok);

        let created = staff_create(unique_token("delete"), "AVAILABLE".to_string(), None);
        let id = created.staff_id.expect("create should return an id");
        let removed = staff_delete(id.clone());
        assert!(removed.ok);
        assert!(!staff_list().items.iter().any(|item| item.id == id));
    }

    #[test]
    #[serial]
    fn staff_reset_restores_the_default_roster() {
        let created = staff_create(unique_token("reset"), "AVAILABLE".to_string(), None);
        assert!(created.ok, "{}", created.message);

        let reset = staff_reset();
        assert_eq!(reset.items.len(), 4);
        let names: Vec<&str> = reset.items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["Mouna", "Fatima", "Jonas", "Linda"]);
    }

    #[test]
    #[serial]
    fn mutations_reach_the_kv_table() {
        let name = unique_token("persisted");
        let created = staff_create(name.clone(), "AVAILABLE".to_string(), None);
        assert!(created.ok, "{}", created.message);

        // The store write is detached; poll briefly for the writer thread.
        let db_path = super::resolve_db_path();
        let deadline = SystemTime::now() + Duration::from_secs(5);
        loop {
            let conn = rusqlite::Connection::open(&db_path).expect("open kv db");
            let snapshot: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT value FROM kv_entries WHERE key = 'mopp_staff_v1';",
                    [],
                    |row| row.get(0),
                )
                .ok();
            if let Some(bytes) = snapshot {
                if String::from_utf8_lossy(&bytes).contains(&name) {
                    break;
                }
            }
            assert!(
                SystemTime::now() < deadline,
                "snapshot did not reach the store in time"
            );
            std::thread::sleep(Duration::from_millis(25));
        }
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
