use std::io;

use crate::{
    formatter::{
        FmtGroupStart, FmtTestOutcome, TestFormatter,
        common::{
            Summary,
            color::{ColorSetting, SupportsColor, colors::*},
            indent,
        },
    },
    outcome::TestStatus,
};

/// Prints the group tree as it runs.
///
/// ```text
///   math
///     ✓ adds
///     ✗ fails
///       assertion `left == right` failed
///
/// --- Test Summary ---
/// Total Tests: 2
/// Passed: 1
/// Failed: 1
/// ```
#[derive(Debug)]
pub struct PrettyFormatter<W: io::Write> {
    target: W,
    color_setting: ColorSetting,
}

impl Default for PrettyFormatter<io::Stdout> {
    fn default() -> Self {
        Self {
            target: io::stdout(),
            color_setting: Default::default(),
        }
    }
}

impl<W: io::Write> PrettyFormatter<W> {
    pub fn with_target<WithTarget: io::Write>(
        self,
        with_target: WithTarget,
    ) -> PrettyFormatter<WithTarget> {
        PrettyFormatter {
            target: with_target,
            color_setting: self.color_setting,
        }
    }

    pub fn with_color_setting(self, color_setting: impl Into<ColorSetting>) -> Self {
        PrettyFormatter {
            color_setting: color_setting.into(),
            ..self
        }
    }
}

impl<W: io::Write + SupportsColor> PrettyFormatter<W> {
    /// Return whether this formatter will currently emit colored output.
    pub fn use_color(&self) -> bool {
        match self.color_setting {
            ColorSetting::Automatic => self.target.supports_color(),
            ColorSetting::Always => true,
            ColorSetting::Never => false,
        }
    }

    /// Write a failure message line by line, an empty message still gets a line.
    fn message(&mut self, indent: &str, message: &str) -> io::Result<()> {
        if message.is_empty() {
            return self.line(GRAY, format_args!("{indent}"));
        }
        for line in message.lines() {
            self.line(GRAY, format_args!("{indent}{line}"))?;
        }
        Ok(())
    }

    fn line(&mut self, color: &str, text: std::fmt::Arguments<'_>) -> io::Result<()> {
        match self.use_color() {
            true => writeln!(self.target, "{color}{text}{RESET}"),
            false => writeln!(self.target, "{text}"),
        }
    }
}

impl<W: io::Write + SupportsColor> TestFormatter for PrettyFormatter<W> {
    type Error = io::Error;

    type RunStart = ();

    type GroupStart = FmtGroupStart;
    fn fmt_group_start(&mut self, data: Self::GroupStart) -> Result<(), Self::Error> {
        let indent = indent(data.depth);
        self.line(BLUE, format_args!("{indent}{}", data.name))
    }

    type TestOutcome = FmtTestOutcome;
    fn fmt_test_outcome(
        &mut self,
        FmtTestOutcome {
            name,
            depth,
            outcome,
        }: Self::TestOutcome,
    ) -> Result<(), Self::Error> {
        let test_indent = indent(depth);
        let msg_indent = indent(depth + 1);
        match &outcome.status {
            TestStatus::Passed => self.line(GREEN, format_args!("{test_indent}✓ {name}"))?,
            TestStatus::Failed(failure) => {
                self.line(RED, format_args!("{test_indent}✗ {name}"))?;
                self.message(&msg_indent, &failure.to_string())?;
            }
        }

        if let Some(teardown) = &outcome.teardown {
            self.message(&msg_indent, &teardown.to_string())?;
        }

        Ok(())
    }

    type RunOutcomes = Summary;
    fn fmt_run_outcomes(
        &mut self,
        Summary {
            total,
            passed,
            failed,
            ..
        }: Self::RunOutcomes,
    ) -> Result<(), Self::Error> {
        writeln!(self.target)?;
        self.line(CYAN, format_args!("--- Test Summary ---"))?;
        self.line(CYAN, format_args!("Total Tests: {total}"))?;
        self.line(GREEN, format_args!("Passed: {passed}"))?;
        self.line(RED, format_args!("Failed: {failed}"))?;
        self.target.flush()
    }
}
