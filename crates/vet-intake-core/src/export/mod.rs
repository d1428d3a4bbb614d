//! Read-only exports of the queue.

mod report;

pub use report::*;
