use std::{
    process::{ExitCode, Termination},
    time::Duration,
};

use crate::{formatter::FormatError, outcome::TestOutcome};

pub type TestOutcomes = Vec<(String, TestOutcome)>;

/// Outcomes of one group and its descendants, mirroring the group tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct GroupReport {
    pub name: Option<String>,
    pub outcomes: TestOutcomes,
    pub children: Vec<GroupReport>,
    /// Whether every test in this subtree passed.
    pub passed: bool,
}

impl GroupReport {
    /// The first direct child group called `name`.
    pub fn group(&self, name: &str) -> Option<&GroupReport> {
        self.children
            .iter()
            .find(|child| child.name.as_deref() == Some(name))
    }

    /// The outcome of the first direct test called `name`.
    pub fn outcome(&self, name: &str) -> Option<&TestOutcome> {
        self.outcomes
            .iter()
            .find(|(test, _)| test == name)
            .map(|(_, outcome)| outcome)
    }

    /// Follow `path` through child groups, the last segment names the test.
    pub fn find(&self, path: &[&str]) -> Option<&TestOutcome> {
        match path {
            [] => None,
            [test] => self.outcome(test),
            [group, rest @ ..] => self.group(group)?.find(rest),
        }
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub struct TestReport<FmtError> {
    pub root: GroupReport,
    pub total: usize,
    pub passed: usize,
    pub duration: Duration,
    pub fmt_errors: Vec<(FormatError, FmtError)>,
}

impl<FmtError> TestReport<FmtError> {
    pub fn failed(&self) -> usize {
        self.total - self.passed
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn exit_code(&self) -> ExitCode {
        match self.is_success() {
            true => ExitCode::SUCCESS,
            false => ExitCode::FAILURE,
        }
    }
}

impl<FmtError> Termination for TestReport<FmtError> {
    fn report(self) -> ExitCode {
        self.exit_code()
    }
}
