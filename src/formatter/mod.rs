//! Output formatting for test runs.
//!
//! The harness does not print anything itself. While it walks the group tree it
//! produces format events (`Fmt*` values) and hands them to a [`TestFormatter`].
//! Events are delivered in execution order on a dedicated formatter thread,
//! the final [`FmtRunOutcomes`] is delivered after all tests finished.
//!
//! Every event has an associated type on the formatter trait that the event
//! data is converted into. This lets a formatter pick exactly the data it needs
//! (or `()` to ignore an event) while the default method bodies do nothing.

use std::time::Duration;

use crate::outcome::TestOutcome;

pub mod common;
pub mod no;
pub mod pretty;

/// Identifies the formatter call that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatError {
    RunStart,
    GroupStart,
    TestOutcome,
    RunOutcomes,
}

/// Sent once before the first group or test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FmtRunStart {
    pub tests: usize,
}

/// Sent when a named group starts, before any of its tests or children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmtGroupStart {
    pub name: String,
    pub depth: usize,
}

/// Sent after a test and its hooks completed.
///
/// `depth` is the depth the test line is rendered at, one more than its group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmtTestOutcome {
    pub name: String,
    pub depth: usize,
    pub outcome: TestOutcome,
}

/// Sent once after the whole tree ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FmtRunOutcomes {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration: Duration,
}

pub(crate) enum FmtEvent {
    GroupStart(FmtGroupStart),
    TestOutcome(FmtTestOutcome),
}

pub trait TestFormatter {
    type Error: Send + 'static;

    type RunStart: From<FmtRunStart>;
    fn fmt_run_start(&mut self, data: Self::RunStart) -> Result<(), Self::Error> {
        let _ = data;
        Ok(())
    }

    type GroupStart: From<FmtGroupStart>;
    fn fmt_group_start(&mut self, data: Self::GroupStart) -> Result<(), Self::Error> {
        let _ = data;
        Ok(())
    }

    type TestOutcome: From<FmtTestOutcome>;
    fn fmt_test_outcome(&mut self, data: Self::TestOutcome) -> Result<(), Self::Error> {
        let _ = data;
        Ok(())
    }

    type RunOutcomes: From<FmtRunOutcomes>;
    fn fmt_run_outcomes(&mut self, data: Self::RunOutcomes) -> Result<(), Self::Error> {
        let _ = data;
        Ok(())
    }
}
