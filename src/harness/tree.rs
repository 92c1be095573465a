use std::{io, thread, time::Instant};

use futures::{FutureExt, future::LocalBoxFuture};
use tracing::Instrument;

use crate::{
    TestReport,
    formatter::*,
    group::{Group, HookKind},
    outcome::{Phase, TestFailure, TestOutcome, TestStatus},
    panic::TestPanicHandler,
    registry::Suite,
    report::GroupReport,
    test::Test,
};

use super::FmtErrors;

pub struct TreeHarness<PanicHandler, Formatter> {
    pub(crate) suite: Suite,
    pub(crate) panic_handler: PanicHandler,
    pub(crate) formatter: Formatter,
}

/// Counters and event sink of a single run.
struct ExecutionContext {
    total: usize,
    passed: usize,
    events: crossbeam_channel::Sender<FmtEvent>,
}

impl ExecutionContext {
    fn send(&self, event: FmtEvent) {
        // the formatter thread only stops once all senders are gone
        let _ = self.events.send(event);
    }
}

impl<PanicHandler, Formatter> TreeHarness<PanicHandler, Formatter>
where
    PanicHandler: TestPanicHandler,
    Formatter: TestFormatter + Send + 'static,
{
    /// Run every test of the suite, depth first in registration order.
    pub async fn run(self) -> TestReport<Formatter::Error> {
        let now = Instant::now();
        let TreeHarness {
            suite,
            panic_handler,
            mut formatter,
        } = self;
        let _panic_hook = panic_handler.install_hook();

        let mut fmt_errors = Vec::new();
        fmt_errors.push_on_error(named_fmt!(
            RunStart: formatter.fmt_run_start(FmtRunStart {
                tests: suite.test_count()
            })
        ));

        let (ftx, frx) = crossbeam_channel::unbounded();
        let fmt_thread = thread::spawn(move || {
            while let Ok(event) = frx.recv() {
                fmt_errors.push_on_error(match event {
                    FmtEvent::GroupStart(data) => {
                        named_fmt!(GroupStart: formatter.fmt_group_start(data))
                    }
                    FmtEvent::TestOutcome(data) => {
                        named_fmt!(TestOutcome: formatter.fmt_test_outcome(data))
                    }
                });
            }
            (formatter, fmt_errors)
        });

        let mut ctx = ExecutionContext {
            total: 0,
            passed: 0,
            events: ftx,
        };
        let root = execute(&suite.root, 0, &panic_handler, &mut ctx).await;
        let ExecutionContext {
            total,
            passed,
            events,
        } = ctx;
        drop(events);

        let (mut formatter, mut fmt_errors) = fmt_thread
            .join()
            .expect("format thread should join without issues");

        let duration = now.elapsed();
        let failed = total - passed;
        tracing::debug!(total, passed, failed, ?duration, "run finished");
        fmt_errors.push_on_error(named_fmt!(
            RunOutcomes: formatter.fmt_run_outcomes(FmtRunOutcomes {
                total,
                passed,
                failed,
                duration,
            })
        ));

        TestReport {
            root,
            total,
            passed,
            duration,
            fmt_errors,
        }
    }

    /// Drive [`run`](Self::run) to completion on a fresh current-thread tokio
    /// runtime, so actions can use `tokio::time`.
    pub fn run_blocking(self) -> io::Result<TestReport<Formatter::Error>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(self.run()))
    }
}

fn execute<'a, 'c, P>(
    group: &'a Group,
    depth: usize,
    panic_handler: &'a P,
    ctx: &'c mut ExecutionContext,
) -> LocalBoxFuture<'c, GroupReport>
where
    'a: 'c,
    P: TestPanicHandler + 'a,
{
    let span = tracing::debug_span!("group", name = group.name().unwrap_or_default(), depth);
    async move {
        if let Some(name) = group.name() {
            tracing::debug!(tests = group.tests().len(), "entering group");
            ctx.send(FmtEvent::GroupStart(FmtGroupStart {
                name: name.to_string(),
                depth,
            }));
        }

        let mut passed = true;
        let mut outcomes = Vec::with_capacity(group.tests().len());
        for test in group.tests() {
            ctx.total += 1;
            let outcome = run_test(test, group, panic_handler).await;
            match outcome.passed() {
                true => ctx.passed += 1,
                false => passed = false,
            }
            ctx.send(FmtEvent::TestOutcome(FmtTestOutcome {
                name: test.name.to_string(),
                depth: depth + 1,
                outcome: outcome.clone(),
            }));
            outcomes.push((test.name.to_string(), outcome));
        }

        let mut children = Vec::with_capacity(group.children().len());
        for child in group.children() {
            let report = execute(child, depth + 1, panic_handler, &mut *ctx).await;
            passed &= report.passed;
            children.push(report);
        }

        GroupReport {
            name: group.name().map(str::to_string),
            outcomes,
            children,
            passed,
        }
    }
    .instrument(span)
    .boxed_local()
}

/// Run one test as a unit of before-each hook, action and after-each hook.
async fn run_test<P: TestPanicHandler>(
    test: &Test,
    group: &Group,
    panic_handler: &P,
) -> TestOutcome {
    let now = Instant::now();
    let mut status = match run_hook(HookKind::BeforeEach, group, panic_handler).await {
        Some(failure) => TestStatus::Failed(failure),
        None => TestStatus::Passed,
    };

    if status.passed()
        && let Err(cause) = panic_handler.handle(|| test.call()).await
    {
        status = TestStatus::Failed(TestFailure {
            phase: Phase::Test,
            cause,
        });
    }

    // runs on every path, after the status is already fixed
    let teardown = run_hook(HookKind::AfterEach, group, panic_handler).await;

    match (&status, &teardown) {
        (TestStatus::Passed, Some(teardown)) => {
            tracing::warn!(
                test = %test.name,
                %teardown,
                "after each hook failed for a passing test"
            )
        }
        (TestStatus::Failed(failure), _) => {
            tracing::debug!(test = %test.name, %failure, "test failed")
        }
        (TestStatus::Passed, None) => {}
    }

    TestOutcome {
        status,
        duration: now.elapsed(),
        teardown,
    }
}

async fn run_hook<P: TestPanicHandler>(
    kind: HookKind,
    group: &Group,
    panic_handler: &P,
) -> Option<TestFailure> {
    let hook = group.hook(kind)?;
    let cause = panic_handler.handle(|| hook.call()).await.err()?;
    Some(TestFailure {
        phase: Phase::from(kind),
        cause,
    })
}

impl<PanicHandler, Formatter> TreeHarness<PanicHandler, Formatter> {
    pub fn with_panic_handler<WithPanicHandler: TestPanicHandler>(
        self,
        panic_handler: WithPanicHandler,
    ) -> TreeHarness<WithPanicHandler, Formatter> {
        TreeHarness {
            suite: self.suite,
            panic_handler,
            formatter: self.formatter,
        }
    }

    pub fn with_formatter<WithFormatter>(
        self,
        formatter: WithFormatter,
    ) -> TreeHarness<PanicHandler, WithFormatter> {
        TreeHarness {
            suite: self.suite,
            panic_handler: self.panic_handler,
            formatter,
        }
    }

    pub fn suite(&self) -> &Suite {
        &self.suite
    }
}
