use std::{
    fs,
    path::PathBuf,
    process::{ExitCode, Termination},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};

use nestest::{Registrar, RegistrationError, TestFnHandle};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn infra(s: &mut Registrar) -> Result<(), RegistrationError> {
    s.describe("infra", |s| {
        s.describe("sleep", |s| {
            s.it("should resolve after the specified time", || async {
                let start = Instant::now();
                tokio::time::sleep(Duration::from_millis(100)).await;
                assert!(start.elapsed() >= Duration::from_millis(100));
            })?;
            s.it("should handle zero duration", || async {
                let start = Instant::now();
                tokio::time::sleep(Duration::ZERO).await;
                assert!(start.elapsed() < Duration::from_millis(50));
            })?;
            Ok(())
        })?;

        s.describe("timeout", |s| {
            s.it("should execute callback after specified time", || async {
                let executed = Arc::new(AtomicBool::new(false));
                let flag = Arc::clone(&executed);
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    flag.store(true, Ordering::SeqCst);
                })
                .await
                .expect("timer task should not panic");
                assert!(executed.load(Ordering::SeqCst), "callback did not run");
            })?;
            s.it("should not execute callback if cleared", || async {
                let executed = Arc::new(AtomicBool::new(false));
                let flag = Arc::clone(&executed);
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    flag.store(true, Ordering::SeqCst);
                });
                handle.abort();
                tokio::time::sleep(Duration::from_millis(100)).await;
                assert!(!executed.load(Ordering::SeqCst));
            })?;
            Ok(())
        })?;

        s.describe("interval", |s| {
            s.it("should execute callback repeatedly", || async {
                let count = Arc::new(AtomicUsize::new(0));
                let ticks = Arc::clone(&count);
                let handle = tokio::spawn(async move {
                    let mut interval = tokio::time::interval(Duration::from_millis(20));
                    loop {
                        interval.tick().await;
                        ticks.fetch_add(1, Ordering::SeqCst);
                    }
                });
                tokio::time::sleep(Duration::from_millis(90)).await;
                handle.abort();
                assert!(count.load(Ordering::SeqCst) >= 3);
            })?;
            Ok(())
        })?;
        Ok(())
    })?;
    Ok(())
}

fn filesystem(s: &mut Registrar) -> Result<(), RegistrationError> {
    let dir = std::env::temp_dir().join(format!("nestest-demo-{}", std::process::id()));

    s.describe("filesystem", |s| {
        let setup = dir.clone();
        s.before_each(TestFnHandle::from_blocking(move || {
            fs::create_dir_all(&setup)
        }))?;
        let teardown = dir.clone();
        s.after_each(TestFnHandle::from_blocking(move || {
            fs::remove_dir_all(&teardown)
        }))?;

        let file: PathBuf = dir.join("testfile.txt");
        s.it(
            "should write and read a file",
            TestFnHandle::from_blocking(move || -> std::io::Result<()> {
                fs::write(&file, "Hello, filesystem!")?;
                let content = fs::read_to_string(&file)?;
                assert_eq!(content, "Hello, filesystem!");
                Ok(())
            }),
        )?;

        let sub_dir = dir.join("newdir");
        s.it(
            "should create a directory",
            TestFnHandle::from_blocking(move || -> std::io::Result<()> {
                assert!(!sub_dir.exists());
                fs::create_dir_all(&sub_dir)?;
                assert!(sub_dir.is_dir());
                Ok(())
            }),
        )?;

        let missing = dir.join("missing.txt");
        s.it(
            "should fail to read a missing file",
            TestFnHandle::from_blocking(move || {
                assert!(fs::read_to_string(&missing).is_err());
            }),
        )?;
        Ok(())
    })?;
    Ok(())
}

fn math(s: &mut Registrar) -> Result<(), RegistrationError> {
    s.describe("math", |s| {
        s.it("adds", || async { assert_eq!(1 + 1, 2) })?;
        s.it("multiplies", || async { assert_eq!(3 * 4, 12) })?;
        s.it("fails on purpose", || async { assert_eq!(1 + 1, 3) })?;
        Ok(())
    })?;
    Ok(())
}

fn main() -> impl Termination {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();

    let suite = match nestest::suite(|s| {
        infra(s)?;
        filesystem(s)?;
        math(s)
    }) {
        Ok(suite) => suite,
        Err(err) => {
            eprintln!("registration failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    match nestest::harness(suite).run_blocking() {
        Ok(report) => report.exit_code(),
        Err(err) => {
            eprintln!("could not start the runtime: {err}");
            ExitCode::FAILURE
        }
    }
}
