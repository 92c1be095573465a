//! The failure-isolation boundary around actions.
//!
//! A [`TestPanicHandler`] starts an action and turns everything it reports into
//! `Result<(), FailureCause>`. Returned errors always become
//! [`FailureCause::Error`], what happens to panics depends on the handler.

use std::{
    any::Any,
    future::Future,
    panic::{self, AssertUnwindSafe},
};

use futures::{FutureExt, future::LocalBoxFuture};

use crate::{capture::PanicHookGuard, outcome::FailureCause, test::TestResult};

pub trait TestPanicHandler {
    /// Start the action produced by `f` and await it.
    fn handle<F>(&self, f: F) -> impl Future<Output = Result<(), FailureCause>>
    where
        F: FnOnce() -> LocalBoxFuture<'static, TestResult>;

    /// Called once at the start of a run, the guard is held until the run ends.
    fn install_hook(&self) -> Option<PanicHookGuard> {
        None
    }
}

/// Does not catch panics.
///
/// Returned errors are still isolated per test, but a panicking action aborts
/// the whole run, skipping the after-each hook of that test.
#[derive(Debug, Default, Clone)]
pub struct NoPanicHandler;

impl TestPanicHandler for NoPanicHandler {
    fn handle<F>(&self, f: F) -> impl Future<Output = Result<(), FailureCause>>
    where
        F: FnOnce() -> LocalBoxFuture<'static, TestResult>,
    {
        let fut = f();
        async move { fut.await.0.map_err(FailureCause::Error) }
    }
}

/// Catches panics while starting and while polling an action.
#[derive(Debug, Clone)]
pub struct DefaultPanicHandler {
    silence_hook: bool,
}

impl Default for DefaultPanicHandler {
    fn default() -> Self {
        Self { silence_hook: true }
    }
}

impl DefaultPanicHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the process panic hook while running, so panics are also printed
    /// to stderr.
    pub fn with_panic_hook_output(self, enabled: bool) -> Self {
        Self {
            silence_hook: !enabled,
        }
    }

    pub fn downcast_panic_err(err: Box<dyn Any + Send + 'static>) -> String {
        err.downcast::<&'static str>()
            .map(|s| s.to_string())
            .or_else(|err| err.downcast::<String>().map(|s| *s))
            .unwrap_or_else(|_| String::from("non-string panic payload"))
    }
}

impl TestPanicHandler for DefaultPanicHandler {
    fn handle<F>(&self, f: F) -> impl Future<Output = Result<(), FailureCause>>
    where
        F: FnOnce() -> LocalBoxFuture<'static, TestResult>,
    {
        let started = panic::catch_unwind(AssertUnwindSafe(f));
        async move {
            let fut = match started {
                Ok(fut) => fut,
                Err(err) => return Err(FailureCause::Panicked(Self::downcast_panic_err(err))),
            };
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(TestResult(res)) => res.map_err(FailureCause::Error),
                Err(err) => Err(FailureCause::Panicked(Self::downcast_panic_err(err))),
            }
        }
    }

    fn install_hook(&self) -> Option<PanicHookGuard> {
        self.silence_hook.then(PanicHookGuard::install)
    }
}
