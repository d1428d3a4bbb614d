//! A clinic session: live state backed by the database.
//!
//! State is loaded once when the session opens and written back after every
//! mutating operation. A rejected operation writes nothing, and an operation
//! whose write fails leaves the live state as it was.

use thiserror::Error;

use crate::config::CoreConfig;
use crate::db::{Database, DbError, DEFAULT_STORAGE_KEY};
use crate::export::QueueReport;
use crate::models::{IntakeRequest, StaffAvailability};
use crate::schedule::{IntakeFields, Stamp, StaffFields, ValidationError};
use crate::state::ClinicState;

/// Session errors.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type SessionResult<T> = Result<T, SessionError>;

pub struct ClinicSession {
    db: Database,
    storage_key: String,
    state: ClinicState,
}

impl ClinicSession {
    /// Load the state stored under `storage_key` and start a session on it.
    pub fn new(db: Database, storage_key: impl Into<String>) -> SessionResult<Self> {
        let storage_key = storage_key.into();
        let state = db.load_state(&storage_key)?;
        Ok(Self {
            db,
            storage_key,
            state,
        })
    }

    /// Open the configured database file.
    pub fn open(config: &CoreConfig) -> SessionResult<Self> {
        let db = Database::open(&config.database_path)?;
        Self::new(db, config.storage_key.clone())
    }

    /// Session on a fresh in-memory database (for testing).
    pub fn open_in_memory() -> SessionResult<Self> {
        Self::new(Database::open_in_memory()?, DEFAULT_STORAGE_KEY)
    }

    pub fn state(&self) -> &ClinicState {
        &self.state
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Apply `change` to a copy of the state and adopt the copy only once
    /// it is stored. A failed change or a failed write leaves the live
    /// state untouched.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut ClinicState) -> SessionResult<T>,
    ) -> SessionResult<T> {
        let mut next = self.state.clone();
        let out = change(&mut next)?;
        self.db.save_state(&self.storage_key, &next)?;
        self.state = next;
        Ok(out)
    }

    /// Validate and queue a new intake.
    pub fn create_intake(&mut self, fields: IntakeFields) -> SessionResult<IntakeRequest> {
        self.create_intake_stamped(fields, Stamp::new())
    }

    /// Like [`create_intake`](Self::create_intake) with a caller-supplied
    /// ID and timestamp.
    pub fn create_intake_stamped(
        &mut self,
        fields: IntakeFields,
        stamp: Stamp,
    ) -> SessionResult<IntakeRequest> {
        self.commit(|state| Ok(state.create_intake(fields, stamp)?))
    }

    /// Validate and add a new staff record.
    pub fn add_staff(&mut self, fields: StaffFields) -> SessionResult<StaffAvailability> {
        self.add_staff_stamped(fields, Stamp::new())
    }

    pub fn add_staff_stamped(
        &mut self,
        fields: StaffFields,
        stamp: Stamp,
    ) -> SessionResult<StaffAvailability> {
        self.commit(|state| Ok(state.add_staff(fields, stamp)?))
    }

    pub fn delete_intake(&mut self, id: &str) -> SessionResult<bool> {
        if self.state.find_intake(id).is_none() {
            return Ok(false);
        }
        self.commit(|state| Ok(state.delete_intake(id)))
    }

    pub fn delete_staff(&mut self, id: &str) -> SessionResult<bool> {
        if self.state.find_staff(id).is_none() {
            return Ok(false);
        }
        self.commit(|state| Ok(state.delete_staff(id)))
    }

    /// Reorder the stored queue by triage order and persist it.
    pub fn auto_sort(&mut self) -> SessionResult<()> {
        self.commit(|state| {
            state.auto_sort();
            Ok(())
        })
    }

    /// Dashboard metrics plus the recommended order.
    pub fn report(&self) -> QueueReport {
        QueueReport::from_state(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AvailabilityMode, Priority, Shift, Snapshot};

    fn all_days(name: &str) -> StaffFields {
        StaffFields {
            staff_name: name.into(),
            role: "Vet".into(),
            shift: Shift::Morning,
            mode: AvailabilityMode::AllDays,
            work_date: None,
            weekday: None,
        }
    }

    fn intake(staff_id: &str) -> IntakeFields {
        IntakeFields {
            tutor: "Ana".into(),
            pet: "Rex".into(),
            priority: Priority::Urgent,
            service: "Cirurgia".into(),
            date: Some("2024-05-06".into()),
            shift: Shift::Morning,
            assigned_staff_id: Some(staff_id.into()),
        }
    }

    fn stored(session: &ClinicSession) -> Snapshot {
        let raw = session
            .database()
            .get_app_state(session.storage_key())
            .unwrap()
            .unwrap();
        Snapshot::parse(&raw).unwrap()
    }

    #[test]
    fn test_mutations_are_persisted() {
        let mut session = ClinicSession::open_in_memory().unwrap();

        let staff = session.add_staff(all_days("Dr. A")).unwrap();
        assert_eq!(stored(&session).schedule.len(), 1);

        let created = session.create_intake(intake(&staff.id)).unwrap();
        assert_eq!(stored(&session).queue.len(), 1);
        assert_eq!(created.id.len(), 36);

        assert!(session.delete_intake(&created.id).unwrap());
        assert!(stored(&session).queue.is_empty());
    }

    #[test]
    fn test_rejected_intake_writes_nothing() {
        let mut session = ClinicSession::open_in_memory().unwrap();
        session.add_staff(all_days("Dr. A")).unwrap();
        let before = session.database().get_app_state(session.storage_key()).unwrap();

        let result = session.create_intake(intake("someone-else"));
        assert!(matches!(
            result,
            Err(SessionError::Validation(ValidationError::StaffUnavailable { .. }))
        ));
        assert!(session.state().queue().is_empty());
        assert_eq!(
            session.database().get_app_state(session.storage_key()).unwrap(),
            before
        );
    }

    #[test]
    fn test_deleting_nothing_does_not_write() {
        let mut session = ClinicSession::open_in_memory().unwrap();
        assert!(!session.delete_staff("missing").unwrap());
        assert_eq!(
            session.database().get_app_state(session.storage_key()).unwrap(),
            None
        );
    }

    fn break_store(session: &ClinicSession) {
        session
            .database()
            .conn()
            .execute_batch("DROP TABLE app_state")
            .unwrap();
    }

    #[test]
    fn test_failed_write_keeps_state() {
        let mut session = ClinicSession::open_in_memory().unwrap();
        let staff = session.add_staff(all_days("Dr. A")).unwrap();
        let mut late = intake(&staff.id);
        late.priority = Priority::Routine;
        session
            .create_intake_stamped(
                late,
                Stamp {
                    id: "q1".into(),
                    at: "2024-05-01T09:00:00Z".parse().unwrap(),
                },
            )
            .unwrap();
        session
            .create_intake_stamped(
                intake(&staff.id),
                Stamp {
                    id: "q2".into(),
                    at: "2024-05-01T09:05:00Z".parse().unwrap(),
                },
            )
            .unwrap();
        let before = session.state().clone();

        break_store(&session);

        assert!(matches!(
            session.create_intake(intake(&staff.id)),
            Err(SessionError::Database(_))
        ));
        assert!(session.add_staff(all_days("Dr. B")).is_err());
        assert!(session.delete_intake("q1").is_err());
        assert!(session.delete_staff(&staff.id).is_err());
        assert!(session.auto_sort().is_err());

        assert_eq!(session.state(), &before);
        assert_eq!(session.state().queue()[0].id, "q1");
    }

    #[test]
    fn test_report_counts() {
        let mut session = ClinicSession::open_in_memory().unwrap();
        let staff = session.add_staff(all_days("Dr. A")).unwrap();
        session.create_intake(intake(&staff.id)).unwrap();

        let report = session.report();
        assert_eq!(report.metrics.attendances, 1);
        assert_eq!(report.metrics.surgeries, 1);
        assert_eq!(report.metrics.staff, 1);
    }
}
