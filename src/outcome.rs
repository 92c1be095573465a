use std::{fmt::Display, time::Duration};

use crate::group::HookKind;

/// The outcome of one test, including its hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TestOutcome {
    pub status: TestStatus,
    pub duration: Duration,
    /// Failure of the after-each hook.
    ///
    /// This never changes [`status`](Self::status).
    pub teardown: Option<TestFailure>,
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        self.status.passed()
    }

    pub fn failed(&self) -> bool {
        self.status.failed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestStatus {
    Passed,
    Failed(TestFailure),
}

impl TestStatus {
    pub fn passed(&self) -> bool {
        matches!(self, TestStatus::Passed)
    }

    pub fn failed(&self) -> bool {
        matches!(self, TestStatus::Failed(_))
    }

    pub fn failure(&self) -> Option<&TestFailure> {
        match self {
            TestStatus::Passed => None,
            TestStatus::Failed(failure) => Some(failure),
        }
    }
}

/// Which part of a test run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    BeforeEach,
    Test,
    AfterEach,
}

impl From<HookKind> for Phase {
    fn from(value: HookKind) -> Self {
        match value {
            HookKind::BeforeEach => Phase::BeforeEach,
            HookKind::AfterEach => Phase::AfterEach,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    Error(String),
    Panicked(String),
}

impl FailureCause {
    pub fn message(&self) -> &str {
        match self {
            FailureCause::Error(msg) | FailureCause::Panicked(msg) => msg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFailure {
    pub phase: Phase,
    pub cause: FailureCause,
}

impl TestFailure {
    pub fn message(&self) -> &str {
        self.cause.message()
    }
}

impl Display for TestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.phase {
            Phase::Test => f.write_str(self.message()),
            Phase::BeforeEach => write!(f, "before each hook: {}", self.message()),
            Phase::AfterEach => write!(f, "after each hook: {}", self.message()),
        }
    }
}
