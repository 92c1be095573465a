use crate::formatter::*;

/// A formatter that produces no output.
///
/// `NoFormatter` discards every event. This is useful when the caller only
/// cares about the returned [`TestReport`](crate::TestReport), for example when
/// embedding nestest into another tool that handles its own reporting.
#[derive(Debug, Default, Clone)]
pub struct NoFormatter;

macro_rules! impl_unit_from {
    [$($name:ident),* $(,)?] => {$(
        impl From<$name> for () {
            fn from(_: $name) -> () {}
        })*
    };
}

impl_unit_from![FmtRunStart, FmtGroupStart, FmtTestOutcome, FmtRunOutcomes];

impl TestFormatter for NoFormatter {
    type Error = ();
    type RunStart = ();
    type GroupStart = ();
    type TestOutcome = ();
    type RunOutcomes = ();
}
