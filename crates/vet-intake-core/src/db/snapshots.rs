//! Snapshot persistence: the clinic state stored as one JSON document per
//! storage key.

use rusqlite::{params, OptionalExtension};
use tracing::{info, warn};

use super::{Database, DbResult};
use crate::models::Snapshot;
use crate::state::ClinicState;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "vet_system_v1";

impl Database {
    /// Get the raw stored document for a key.
    pub fn get_app_state(&self, key: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Replace the stored document for a key.
    pub fn set_app_state(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO app_state (key, value, updated_at) VALUES (?, ?, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }

    /// Load and normalize the clinic state.
    ///
    /// A missing document yields an empty state. A document that fails to
    /// parse is discarded: the empty state is written back in its place.
    pub fn load_state(&self, key: &str) -> DbResult<ClinicState> {
        let raw = match self.get_app_state(key)? {
            Some(raw) => raw,
            None => return Ok(ClinicState::default()),
        };

        match Snapshot::parse(&raw) {
            Ok(snapshot) => {
                let (state, report) = snapshot.into_state();
                if !report.is_clean() {
                    info!(
                        key,
                        coerced = report.coerced_staff_ids.len(),
                        staff_ids = ?report.coerced_staff_ids,
                        "inconsistent staff records reset to every-day availability"
                    );
                }
                Ok(state)
            }
            Err(err) => {
                warn!(key, error = %err, "stored snapshot unreadable, resetting to empty state");
                let state = ClinicState::default();
                self.save_state(key, &state)?;
                Ok(state)
            }
        }
    }

    /// Persist the clinic state.
    pub fn save_state(&self, key: &str, state: &ClinicState) -> DbResult<()> {
        let json = Snapshot::from_state(state).to_json()?;
        self.set_app_state(key, &json)
    }
}
