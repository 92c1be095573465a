//! Common helpers for formatter implementations.
//!
//! Small helper types that are convenient when implementing nestest formatters.
//! They are formatter focused and not meant as general purpose building blocks.

use std::time::Duration;

use crate::formatter::FmtRunOutcomes;

pub mod color;

/// Two spaces per tree level.
pub fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// The counts shown in a run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration: Duration,
}

impl From<FmtRunOutcomes> for Summary {
    fn from(value: FmtRunOutcomes) -> Self {
        Self {
            total: value.total,
            passed: value.passed,
            failed: value.failed,
            duration: value.duration,
        }
    }
}
