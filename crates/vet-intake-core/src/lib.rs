//! Vet Intake Core Library
//!
//! Triage ordering and staff availability matching for a veterinary clinic's
//! intake desk.
//!
//! # Architecture
//!
//! ```text
//!   Schedule form ──► validate staff record ──┐
//!                                             ▼
//!                                    ┌─────────────────┐
//!   Intake form ──► re-check staff ─►│   ClinicState   │──► save snapshot
//!                   availability     │  queue, roster  │    (SQLite, JSON)
//!                                    └────────┬────────┘
//!                                             │
//!                          ┌──────────────────┼──────────────────┐
//!                          ▼                  ▼                  ▼
//!                    Auto-sort          Recommended          Staff picker
//!                   (in place)        order (read-only)    (date + shift)
//! ```
//!
//! # Modules
//!
//! - [`schedule`]: date resolution, availability predicate, roster query,
//!   triage comparator and form validation (all pure)
//! - [`models`]: domain types and the persisted snapshot
//! - [`state`]: the queue/roster owner and its mutations
//! - [`db`]: SQLite snapshot store with malformed-snapshot recovery
//! - [`session`]: state + database, persisting after every mutation
//! - [`export`]: queue report (metrics and recommended order)
//! - [`config`], [`telemetry`]: environment configuration and logging

pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod schedule;
pub mod session;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::CoreConfig;
pub use db::Database;
pub use export::{QueueMetrics, QueueReport};
pub use models::{
    Availability, AvailabilityMode, IntakeRequest, Priority, Shift, Snapshot, StaffAvailability,
};
pub use schedule::{
    available_staff, compare_triage, is_available, validate_and_build_intake,
    validate_and_build_staff_record, IntakeFields, Stamp, StaffFields, ValidationError,
};
pub use session::{ClinicSession, SessionError};
pub use state::ClinicState;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum VetIntakeError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for VetIntakeError {
    fn from(e: db::DbError) -> Self {
        VetIntakeError::DatabaseError(e.to_string())
    }
}

impl From<schedule::ValidationError> for VetIntakeError {
    fn from(e: schedule::ValidationError) -> Self {
        VetIntakeError::ValidationError(e.to_string())
    }
}

impl From<SessionError> for VetIntakeError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Validation(e) => e.into(),
            SessionError::Database(e) => e.into(),
        }
    }
}

impl From<serde_json::Error> for VetIntakeError {
    fn from(e: serde_json::Error) -> Self {
        VetIntakeError::SerializationError(e.to_string())
    }
}

impl From<config::ConfigError> for VetIntakeError {
    fn from(e: config::ConfigError) -> Self {
        VetIntakeError::ConfigError(e.to_string())
    }
}

impl From<telemetry::TelemetryError> for VetIntakeError {
    fn from(e: telemetry::TelemetryError) -> Self {
        VetIntakeError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for VetIntakeError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        VetIntakeError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

fn wrap(session: ClinicSession) -> Arc<VetIntakeCore> {
    Arc::new(VetIntakeCore {
        session: Arc::new(Mutex::new(session)),
    })
}

/// Open or create a clinic database at the given path.
#[uniffi::export]
pub fn open_clinic(
    path: String,
    storage_key: Option<String>,
) -> Result<Arc<VetIntakeCore>, VetIntakeError> {
    let db = Database::open(&path)?;
    let key = storage_key.unwrap_or_else(|| db::DEFAULT_STORAGE_KEY.to_string());
    Ok(wrap(ClinicSession::new(db, key)?))
}

/// Open the clinic database named by the environment configuration.
#[uniffi::export]
pub fn open_clinic_from_env() -> Result<Arc<VetIntakeCore>, VetIntakeError> {
    let config = CoreConfig::from_env()?;
    Ok(wrap(ClinicSession::open(&config)?))
}

/// Create an in-memory clinic (for testing).
#[uniffi::export]
pub fn open_clinic_in_memory() -> Result<Arc<VetIntakeCore>, VetIntakeError> {
    Ok(wrap(ClinicSession::open_in_memory()?))
}

/// Install the log subscriber at the given level/filter.
#[uniffi::export]
pub fn init_logging(log_level: String) -> Result<(), VetIntakeError> {
    telemetry::init(&config::TelemetryConfig { log_level })?;
    Ok(())
}

/// Today's date (`YYYY-MM-DD`) for defaulting the intake form.
#[uniffi::export]
pub fn today_date() -> String {
    schedule::calendar::today()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe clinic session wrapper for FFI.
#[derive(uniffi::Object)]
pub struct VetIntakeCore {
    session: Arc<Mutex<ClinicSession>>,
}

#[uniffi::export]
impl VetIntakeCore {
    // =========================================================================
    // Intake Operations
    // =========================================================================

    /// Validate and queue a new intake.
    pub fn create_intake(
        &self,
        fields: FfiIntakeFields,
    ) -> Result<FfiIntakeRequest, VetIntakeError> {
        let mut session = self.session.lock()?;
        let intake = session.create_intake(fields.into())?;
        Ok(intake.into())
    }

    /// Remove an intake from the queue.
    pub fn delete_intake(&self, intake_id: String) -> Result<bool, VetIntakeError> {
        let mut session = self.session.lock()?;
        Ok(session.delete_intake(&intake_id)?)
    }

    /// Queue in stored order.
    pub fn list_queue(&self) -> Result<Vec<FfiIntakeRequest>, VetIntakeError> {
        let session = self.session.lock()?;
        Ok(session
            .state()
            .queue()
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Queue in triage order, without reordering the stored queue.
    pub fn recommended_order(&self) -> Result<Vec<FfiIntakeRequest>, VetIntakeError> {
        let session = self.session.lock()?;
        Ok(session
            .state()
            .recommended_order()
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Reorder the stored queue by triage order.
    pub fn auto_sort(&self) -> Result<(), VetIntakeError> {
        let mut session = self.session.lock()?;
        Ok(session.auto_sort()?)
    }

    // =========================================================================
    // Roster Operations
    // =========================================================================

    /// Validate and add a new staff record.
    pub fn add_staff(
        &self,
        fields: FfiStaffFields,
    ) -> Result<FfiStaffAvailability, VetIntakeError> {
        let mut session = self.session.lock()?;
        let staff = session.add_staff(fields.into())?;
        Ok(staff.into())
    }

    /// Remove a staff record from the roster.
    pub fn delete_staff(&self, staff_id: String) -> Result<bool, VetIntakeError> {
        let mut session = self.session.lock()?;
        Ok(session.delete_staff(&staff_id)?)
    }

    pub fn list_roster(&self) -> Result<Vec<FfiStaffAvailability>, VetIntakeError> {
        let session = self.session.lock()?;
        Ok(session
            .state()
            .roster()
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Staff on `shift` available on `date`.
    pub fn available_staff(
        &self,
        date: String,
        shift: String,
    ) -> Result<Vec<FfiStaffAvailability>, VetIntakeError> {
        let session = self.session.lock()?;
        Ok(session
            .state()
            .available_staff(&date, &Shift::parse(&shift))
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Whether a roster member may work on `date`. Unknown IDs are never
    /// available.
    pub fn is_staff_available(&self, staff_id: String, date: String) -> Result<bool, VetIntakeError> {
        let session = self.session.lock()?;
        Ok(session
            .state()
            .find_staff(&staff_id)
            .map(|staff| is_available(staff, &date))
            .unwrap_or(false))
    }

    /// What the staff selection list should show for a date and shift.
    pub fn staff_picker(
        &self,
        date: Option<String>,
        shift: String,
    ) -> Result<FfiStaffPicker, VetIntakeError> {
        let session = self.session.lock()?;
        let picker = session
            .state()
            .staff_picker(date.as_deref(), &Shift::parse(&shift));
        Ok(picker.into())
    }

    /// Label for a staff ID, or "Unassigned".
    pub fn staff_label(&self, staff_id: Option<String>) -> Result<String, VetIntakeError> {
        let session = self.session.lock()?;
        Ok(session.state().staff_label(staff_id.as_deref()))
    }

    // =========================================================================
    // Report Operations
    // =========================================================================

    pub fn metrics(&self) -> Result<FfiQueueMetrics, VetIntakeError> {
        let session = self.session.lock()?;
        Ok(QueueMetrics::from_state(session.state()).into())
    }

    /// Export the queue report as JSON.
    pub fn export_queue_json(&self) -> Result<String, VetIntakeError> {
        let session = self.session.lock()?;
        Ok(session.report().to_json()?)
    }

    /// Export the queue report as CSV.
    pub fn export_queue_csv(&self) -> Result<String, VetIntakeError> {
        let session = self.session.lock()?;
        Ok(session.report().to_csv())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe intake form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiIntakeFields {
    pub tutor: String,
    pub pet: String,
    pub priority: String,
    pub service: String,
    pub date: Option<String>,
    pub shift: String,
    pub assigned_staff_id: Option<String>,
}

impl From<FfiIntakeFields> for IntakeFields {
    fn from(fields: FfiIntakeFields) -> Self {
        IntakeFields {
            tutor: fields.tutor,
            pet: fields.pet,
            priority: Priority::parse(&fields.priority),
            service: fields.service,
            date: fields.date,
            shift: Shift::parse(&fields.shift),
            assigned_staff_id: fields.assigned_staff_id,
        }
    }
}

/// FFI-safe intake request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiIntakeRequest {
    pub id: String,
    pub tutor: String,
    pub pet: String,
    pub priority: String,
    pub service: String,
    pub date: Option<String>,
    pub shift: String,
    pub assigned_staff_id: Option<String>,
    pub created_at: String,
}

impl From<IntakeRequest> for FfiIntakeRequest {
    fn from(intake: IntakeRequest) -> Self {
        Self {
            id: intake.id,
            tutor: intake.tutor,
            pet: intake.pet,
            priority: intake.priority.into(),
            service: intake.service,
            date: intake.date,
            shift: intake.shift.into(),
            assigned_staff_id: intake.assigned_staff_id,
            created_at: intake.created_at.to_rfc3339(),
        }
    }
}

/// FFI-safe schedule form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStaffFields {
    pub staff_name: String,
    pub role: String,
    pub shift: String,
    /// "all", "date" or "weekday"
    pub mode: String,
    pub work_date: Option<String>,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: Option<i64>,
}

impl From<FfiStaffFields> for StaffFields {
    fn from(fields: FfiStaffFields) -> Self {
        StaffFields {
            staff_name: fields.staff_name,
            role: fields.role,
            shift: Shift::parse(&fields.shift),
            mode: AvailabilityMode::parse(&fields.mode),
            work_date: fields.work_date,
            weekday: fields.weekday,
        }
    }
}

/// FFI-safe staff record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStaffAvailability {
    pub id: String,
    pub staff_name: String,
    pub role: String,
    pub shift: String,
    pub mode: String,
    pub work_date: Option<String>,
    pub weekday: Option<u32>,
    pub label: String,
    pub availability_label: String,
}

impl From<StaffAvailability> for FfiStaffAvailability {
    fn from(staff: StaffAvailability) -> Self {
        let (work_date, weekday) = match &staff.availability {
            Availability::AllDays => (None, None),
            Availability::FixedDate(date) => (Some(date.clone()), None),
            Availability::Weekday(weekday) => {
                (None, Some(schedule::calendar::weekday_index(*weekday)))
            }
        };

        Self {
            label: staff.label(),
            availability_label: staff.availability.label(),
            mode: staff.availability.mode().as_str().to_string(),
            id: staff.id,
            staff_name: staff.staff_name,
            role: staff.role,
            shift: staff.shift.into(),
            work_date,
            weekday,
        }
    }
}

/// FFI-safe staff selection state.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiStaffPicker {
    NeedsDate,
    NoneAvailable,
    Choices { staff: Vec<FfiStaffAvailability> },
}

impl From<schedule::StaffPicker<'_>> for FfiStaffPicker {
    fn from(picker: schedule::StaffPicker<'_>) -> Self {
        match picker {
            schedule::StaffPicker::NeedsDate => FfiStaffPicker::NeedsDate,
            schedule::StaffPicker::NoneAvailable => FfiStaffPicker::NoneAvailable,
            schedule::StaffPicker::Choices(staff) => FfiStaffPicker::Choices {
                staff: staff.into_iter().cloned().map(Into::into).collect(),
            },
        }
    }
}

/// FFI-safe dashboard metrics.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiQueueMetrics {
    pub attendances: u32,
    pub surgeries: u32,
    pub staff: u32,
}

impl From<QueueMetrics> for FfiQueueMetrics {
    fn from(metrics: QueueMetrics) -> Self {
        Self {
            attendances: metrics.attendances as u32,
            surgeries: metrics.surgeries as u32,
            staff: metrics.staff as u32,
        }
    }
}
