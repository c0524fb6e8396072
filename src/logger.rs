use std::cell::RefCell;
use std::io::{self, Result, Write};
use std::rc::Rc;

/// Controls where logs for a specific channel are routed to
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Route {
    Stdout,
    Stderr,
    Silent,
}

pub struct Routes {
    /// Whether to print a line like "--- prune unused packages ---" before stages.
    pub stage: Route,

    /// One line per path actually removed.
    pub removal: Route,

    /// Things that were skipped but didn't fail the run.
    pub warning: Route,

    /// Totals at the end of each project.
    pub summary: Route,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            stage: Route::Stdout,
            removal: Route::Silent,
            warning: Route::Stderr,
            summary: Route::Stdout,
        }
    }
}

pub enum LogWriter<'a> {
    Stdout(&'a mut dyn Write),
    Stderr(&'a mut dyn Write),
    Silent,
}

impl Write for LogWriter<'_> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        match self {
            Self::Stdout(w) => w.write(bytes),
            Self::Stderr(w) => w.write(bytes),
            Self::Silent => Ok(bytes.len()),
        }
    }

    fn flush(&mut self) -> Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::Stderr(w) => w.flush(),
            Self::Silent => Ok(()),
        }
    }
}

/// Shared in-memory buffer, so tests can read back what was logged.
#[derive(Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<u8>>>);

impl Recorder {
    pub fn recorded(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Recorder {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.0.borrow_mut().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

pub struct Logger {
    pub stdout: Box<dyn Write>,
    pub stderr: Box<dyn Write>,
    pub routes: Routes,
    recorders: Option<(Recorder, Recorder)>,
}

impl Logger {
    pub fn new(stdout: impl Write + 'static, stderr: impl Write + 'static) -> Self {
        Self {
            stdout: Box::new(stdout),
            stderr: Box::new(stderr),
            routes: Routes::default(),
            recorders: None,
        }
    }

    pub fn new_real() -> Self {
        Self::new(io::stdout(), io::stderr())
    }

    pub fn new_vec() -> Self {
        let (out, err) = (Recorder::default(), Recorder::default());
        let mut log = Self::new(out.clone(), err.clone());
        log.recorders = Some((out, err));
        log
    }

    /// Everything written so far as (stdout, stderr). Empty unless built with `new_vec`.
    pub fn recorded(&self) -> (String, String) {
        match &self.recorders {
            Some((out, err)) => (out.recorded(), err.recorded()),
            None => (String::new(), String::new()),
        }
    }

    fn lw_for(&mut self, route: Route) -> LogWriter {
        match route {
            Route::Stdout => LogWriter::Stdout(&mut *self.stdout),
            Route::Stderr => LogWriter::Stderr(&mut *self.stderr),
            Route::Silent => LogWriter::Silent,
        }
    }

    pub fn stage(&mut self) -> LogWriter {
        self.lw_for(self.routes.stage)
    }

    pub fn removal(&mut self) -> LogWriter {
        self.lw_for(self.routes.removal)
    }

    pub fn warning(&mut self) -> LogWriter {
        self.lw_for(self.routes.warning)
    }

    pub fn summary(&mut self) -> LogWriter {
        self.lw_for(self.routes.summary)
    }
}
