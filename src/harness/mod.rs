use std::io;

use crate::{
    formatter::{FormatError, pretty::PrettyFormatter},
    panic::DefaultPanicHandler,
    registry::Suite,
};

macro_rules! named_fmt {
    ($event:ident: $formatter:ident.$method:ident($data:expr)) => {
        $formatter
            .$method(From::from($data))
            .map_err(|err| ($crate::formatter::FormatError::$event, err))
    };
}

mod tree;
pub use tree::TreeHarness;

pub(crate) trait FmtErrors<E> {
    fn push_on_error(&mut self, res: Result<(), (FormatError, E)>);
}

impl<E> FmtErrors<E> for Vec<(FormatError, E)> {
    fn push_on_error(&mut self, res: Result<(), (FormatError, E)>) {
        if let Err(err) = res {
            self.push(err);
        }
    }
}

/// Create a harness for `suite` with the default strategies.
///
/// Panics are caught per test and the tree is printed to stdout by the
/// [`PrettyFormatter`].
pub fn harness(suite: Suite) -> TreeHarness<DefaultPanicHandler, PrettyFormatter<io::Stdout>> {
    TreeHarness {
        suite,
        panic_handler: DefaultPanicHandler::default(),
        formatter: PrettyFormatter::default(),
    }
}
