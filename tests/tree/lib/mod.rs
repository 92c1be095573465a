use std::{
    cell::RefCell,
    io,
    rc::Rc,
    string::FromUtf8Error,
    sync::{Arc, LazyLock, Mutex},
};

use nestest::{
    TestFnHandle,
    formatter::{
        common::color::{ColorSetting, SupportsColor},
        pretty::PrettyFormatter,
    },
};
use regex::Regex;

#[derive(Debug)]
#[allow(dead_code)]
pub enum Error {
    Poison,
    FromUtf8(FromUtf8Error),
}

#[derive(Debug, Default, Clone)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::other("poison error"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SupportsColor for Buffer {
    fn supports_color(&self) -> bool {
        false
    }
}

impl Buffer {
    pub fn try_to_string(&self) -> Result<String, Error> {
        let guard = self.0.lock().map_err(|_| Error::Poison)?;
        String::from_utf8(guard.to_vec()).map_err(Error::FromUtf8)
    }
}

/// A target that rejects every write.
#[derive(Debug, Default)]
pub struct Broken;

impl io::Write for Broken {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("broken target"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SupportsColor for Broken {
    fn supports_color(&self) -> bool {
        false
    }
}

pub fn pretty(buffer: &Buffer, color: ColorSetting) -> PrettyFormatter<Buffer> {
    PrettyFormatter::default()
        .with_target(buffer.clone())
        .with_color_setting(color)
}

/// Ordered record of what ran, shared between actions.
pub type Log = Rc<RefCell<Vec<String>>>;

pub fn record(log: &Log, entry: &'static str) -> TestFnHandle {
    let log = Rc::clone(log);
    TestFnHandle::from_blocking(move || log.borrow_mut().push(entry.to_string()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());

pub fn strip_ansi(input: &str) -> String {
    ANSI_RE.replace_all(input, "").into_owned()
}
