//! Application state: the intake queue and the staff roster.
//!
//! The two collections are owned here and only change through the
//! operations below (append, delete, reorder).

use tracing::{debug, info};

use crate::models::{IntakeRequest, Shift, StaffAvailability};
use crate::schedule::{
    self, IntakeFields, Stamp, StaffFields, StaffPicker, ValidationResult,
};

/// Label shown for an intake with no (or a since-deleted) staff member.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// Queue and roster owned by one application instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClinicState {
    queue: Vec<IntakeRequest>,
    roster: Vec<StaffAvailability>,
}

impl ClinicState {
    pub fn new(queue: Vec<IntakeRequest>, roster: Vec<StaffAvailability>) -> Self {
        Self { queue, roster }
    }

    /// Intake queue, in stored order.
    pub fn queue(&self) -> &[IntakeRequest] {
        &self.queue
    }

    /// Staff roster, in insertion order.
    pub fn roster(&self) -> &[StaffAvailability] {
        &self.roster
    }

    pub fn find_intake(&self, id: &str) -> Option<&IntakeRequest> {
        self.queue.iter().find(|intake| intake.id == id)
    }

    pub fn find_staff(&self, id: &str) -> Option<&StaffAvailability> {
        self.roster.iter().find(|staff| staff.id == id)
    }

    /// Validate an intake against the current roster and append it.
    ///
    /// On error nothing is appended.
    pub fn create_intake(
        &mut self,
        fields: IntakeFields,
        stamp: Stamp,
    ) -> ValidationResult<IntakeRequest> {
        let intake = schedule::validate_and_build_intake(fields, &self.roster, stamp)?;
        info!(intake_id = %intake.id, shift = %intake.shift, "intake queued");
        self.queue.push(intake.clone());
        Ok(intake)
    }

    /// Validate a staff record and append it to the roster.
    pub fn add_staff(
        &mut self,
        fields: StaffFields,
        stamp: Stamp,
    ) -> ValidationResult<StaffAvailability> {
        let staff = schedule::validate_and_build_staff_record(fields, stamp)?;
        info!(staff_id = %staff.id, shift = %staff.shift, "staff record added");
        self.roster.push(staff.clone());
        Ok(staff)
    }

    /// Remove an intake. Returns whether anything was removed.
    pub fn delete_intake(&mut self, id: &str) -> bool {
        let before = self.queue.len();
        self.queue.retain(|intake| intake.id != id);
        let removed = self.queue.len() != before;
        debug!(intake_id = id, removed, "delete intake");
        removed
    }

    /// Remove a staff record. Intakes booked with it keep the stale ID and
    /// show as unassigned.
    pub fn delete_staff(&mut self, id: &str) -> bool {
        let before = self.roster.len();
        self.roster.retain(|staff| staff.id != id);
        let removed = self.roster.len() != before;
        debug!(staff_id = id, removed, "delete staff");
        removed
    }

    /// Reorder the stored queue by triage order.
    pub fn auto_sort(&mut self) {
        schedule::sort_by_triage(&mut self.queue);
        debug!(queue_len = self.queue.len(), "queue sorted by triage order");
    }

    /// Triage order without touching the stored queue.
    pub fn recommended_order(&self) -> Vec<&IntakeRequest> {
        schedule::recommended_order(&self.queue)
    }

    pub fn available_staff(&self, date: &str, shift: &Shift) -> Vec<&StaffAvailability> {
        schedule::available_staff(&self.roster, date, shift)
    }

    pub fn staff_picker(&self, date: Option<&str>, shift: &Shift) -> StaffPicker<'_> {
        schedule::staff_picker(&self.roster, date, shift)
    }

    /// Label for the staff member an intake is booked with.
    pub fn staff_label(&self, staff_id: Option<&str>) -> String {
        staff_id
            .and_then(|id| self.find_staff(id))
            .map(StaffAvailability::label)
            .unwrap_or_else(|| UNASSIGNED_LABEL.to_string())
    }
}
