//! Staff availability predicate and roster queries.

use super::calendar;
use crate::models::{Availability, Shift, StaffAvailability};

/// Whether `staff` may work on `date`.
///
/// Fixed dates match by exact string equality. A weekday record never
/// matches an unparsable or empty date.
pub fn is_available(staff: &StaffAvailability, date: &str) -> bool {
    match &staff.availability {
        Availability::AllDays => true,
        Availability::FixedDate(work_date) => !work_date.is_empty() && work_date == date,
        Availability::Weekday(weekday) => calendar::weekday_of(date) == Some(*weekday),
    }
}

/// Staff records on `shift` that are available on `date`, in roster order.
///
/// An empty result is a normal answer, not an error.
pub fn available_staff<'a>(
    roster: &'a [StaffAvailability],
    date: &str,
    shift: &Shift,
) -> Vec<&'a StaffAvailability> {
    roster
        .iter()
        .filter(|staff| &staff.shift == shift && is_available(staff, date))
        .collect()
}

/// What a staff selection list should offer for a (date, shift) pair.
#[derive(Debug, Clone, PartialEq)]
pub enum StaffPicker<'a> {
    /// No date chosen yet; assignment stays disabled.
    NeedsDate,
    /// Nobody works that date and shift; assignment stays disabled.
    NoneAvailable,
    /// Selectable staff, in roster order.
    Choices(Vec<&'a StaffAvailability>),
}

pub fn staff_picker<'a>(
    roster: &'a [StaffAvailability],
    date: Option<&str>,
    shift: &Shift,
) -> StaffPicker<'a> {
    let date = match date.map(str::trim) {
        Some(date) if !date.is_empty() => date,
        _ => return StaffPicker::NeedsDate,
    };

    let staff = available_staff(roster, date, shift);
    if staff.is_empty() {
        StaffPicker::NoneAvailable
    } else {
        StaffPicker::Choices(staff)
    }
}
