//! Scheduling core: date resolution, staff availability, triage ordering
//! and form validation.
//!
//! Everything here is a pure function of its inputs. Mutation of the queue
//! and roster lives in [`crate::state`].

pub mod calendar;
mod availability;
mod triage;
mod validation;

pub use availability::*;
pub use triage::*;
pub use validation::*;
