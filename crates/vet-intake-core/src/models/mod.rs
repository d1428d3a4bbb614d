//! Domain models for the intake system.

mod intake;
mod snapshot;
mod staff;

pub use intake::*;
pub use snapshot::*;
pub use staff::*;
