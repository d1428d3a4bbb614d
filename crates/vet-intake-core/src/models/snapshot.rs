//! Persisted snapshot of the clinic state and its load-time normalization.
//!
//! Loading is a two-step affair: parse the versioned JSON document, then
//! normalize every staff record against the availability invariant before
//! anything reaches the live [`ClinicState`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::intake::IntakeRequest;
use super::staff::{StaffAvailability, StaffRecord};
use crate::state::ClinicState;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Snapshot errors.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// The persisted document: `{ version, queue, schedule }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version; documents written before versioning read as 1
    #[serde(default = "legacy_version")]
    pub version: u32,
    #[serde(default)]
    pub queue: Vec<IntakeRequest>,
    /// Staff records in their stored (possibly inconsistent) form
    #[serde(default)]
    pub schedule: Vec<StaffRecord>,
}

fn legacy_version() -> u32 {
    SNAPSHOT_VERSION
}

/// What the normalization pass changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizationReport {
    /// IDs of staff records coerced to `AllDays`
    pub coerced_staff_ids: Vec<String>,
}

impl NormalizationReport {
    pub fn is_clean(&self) -> bool {
        self.coerced_staff_ids.is_empty()
    }
}

impl Snapshot {
    /// Parse a stored document and check its version.
    pub fn parse(json: &str) -> SnapshotResult<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }

    /// Capture the live state in persisted form.
    pub fn from_state(state: &ClinicState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            queue: state.queue().to_vec(),
            schedule: state
                .roster()
                .iter()
                .cloned()
                .map(StaffRecord::from)
                .collect(),
        }
    }

    /// Serialize to the stored JSON form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Normalize the schedule and build the live state.
    pub fn into_state(self) -> (ClinicState, NormalizationReport) {
        let (roster, report) = normalize_roster(self.schedule);
        (ClinicState::new(self.queue, roster), report)
    }
}

/// Coerce every inconsistent staff record to `AllDays`.
///
/// Idempotent: normalizing the persisted form of an already-normalized
/// roster changes nothing.
pub fn normalize_roster(records: Vec<StaffRecord>) -> (Vec<StaffAvailability>, NormalizationReport) {
    let mut report = NormalizationReport::default();

    let roster = records
        .into_iter()
        .map(|record| {
            if !record.is_consistent() {
                report.coerced_staff_ids.push(record.id.clone());
            }
            StaffAvailability::from(record)
        })
        .collect();

    (roster, report)
}
