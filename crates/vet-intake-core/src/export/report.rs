//! Queue report: dashboard metrics and the recommended triage order.

use serde::{Deserialize, Serialize};

use crate::state::ClinicState;

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMetrics {
    /// Intakes in the queue
    pub attendances: usize,
    /// Queued intakes in the surgery category
    pub surgeries: usize,
    /// Staff records on the roster
    pub staff: usize,
}

impl QueueMetrics {
    pub fn from_state(state: &ClinicState) -> Self {
        Self {
            attendances: state.queue().len(),
            surgeries: state.queue().iter().filter(|i| i.is_surgery()).count(),
            staff: state.roster().len(),
        }
    }
}

/// One line of the recommended order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueReportEntry {
    /// 1-based position in triage order
    pub position: usize,
    pub intake_id: String,
    pub pet: String,
    pub tutor: String,
    pub date: Option<String>,
    pub shift: String,
    pub priority: String,
    pub service: String,
    /// Staff label, or "Unassigned"
    pub staff: String,
}

/// Read-only queue report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueReport {
    /// Report timestamp
    pub generated_at: String,
    pub metrics: QueueMetrics,
    pub entries: Vec<QueueReportEntry>,
}

impl QueueReport {
    /// Build the report from the current state. The stored queue order is
    /// not changed.
    pub fn from_state(state: &ClinicState) -> Self {
        let entries = state
            .recommended_order()
            .into_iter()
            .enumerate()
            .map(|(index, intake)| QueueReportEntry {
                position: index + 1,
                intake_id: intake.id.clone(),
                pet: intake.pet.clone(),
                tutor: intake.tutor.clone(),
                date: intake.date.clone(),
                shift: intake.shift.to_string(),
                priority: intake.priority.to_string(),
                service: intake.service.clone(),
                staff: state.staff_label(intake.assigned_staff_id.as_deref()),
            })
            .collect();

        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            metrics: QueueMetrics::from_state(state),
            entries,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        csv.push_str("position,intake_id,pet,tutor,date,shift,priority,service,staff\n");

        for entry in &self.entries {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                entry.position,
                escape_csv(&entry.intake_id),
                escape_csv(&entry.pet),
                escape_csv(&entry.tutor),
                entry.date.as_deref().map(escape_csv).unwrap_or_default(),
                escape_csv(&entry.shift),
                escape_csv(&entry.priority),
                escape_csv(&entry.service),
                escape_csv(&entry.staff),
            ));
        }

        csv
    }
}

/// Escape a value for CSV.
fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
