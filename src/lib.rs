//! A small hierarchical test runner.
//!
//! Tests are registered in nested groups through a [`Registrar`], each group may
//! carry one before-each and one after-each hook that run around every test
//! directly inside that group. The resulting [`Suite`] is executed depth first
//! by a [`TreeHarness`], which isolates failures per test and returns a
//! [`TestReport`].
//!
//! ```
//! let suite = nestest::suite(|s| {
//!     s.describe("math", |s| {
//!         s.it("adds", || async { assert_eq!(1 + 1, 2) })?;
//!         Ok(())
//!     })?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! let report = nestest::harness(suite)
//!     .with_formatter(nestest::formatter::no::NoFormatter)
//!     .run_blocking()
//!     .unwrap();
//! assert_eq!((report.total, report.passed), (1, 1));
//! ```

pub mod capture;
pub mod formatter;
pub mod group;
pub mod outcome;
pub mod panic;
pub mod registry;

#[cfg(test)]
mod test_support;

mod harness;
pub use harness::*;

mod report;
pub use report::*;

pub use registry::{Registrar, RegistrationError, Suite, suite};
pub use test::TestFnHandle;
