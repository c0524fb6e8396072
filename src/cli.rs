use crate::doc::usage;
use crate::fs::{Filesystem, OsFs};
use crate::lock::Lock;
use crate::logger::{Logger, Route};
use crate::options::{Policy, PruneOptions};
use crate::prune::Pruner;
use std::io::{Error, ErrorKind, Result, Write};
use std::process::ExitCode;

/// A pruning run, as asked for on the command line.
#[derive(PartialEq, Debug, Default)]
pub struct Request {
    pub root: String,
    pub options: PruneOptions,
    pub packages: Vec<String>,
    pub lock: Option<String>,
    pub verbose: bool,
}

/// What we decide to do based on CLI arguments
#[derive(PartialEq, Debug)]
pub enum Behavior {
    Help,
    Version,
    UnexpectedArg(String),
    MissingParam(&'static str),
    Prune(Request),
}

pub fn parse<S>(args: impl Iterator<Item = S>) -> Behavior
where
    S: AsRef<str>,
{
    let mut args = args.map(|a| a.as_ref().to_owned()).peekable();
    if args.peek().is_none() {
        return Behavior::Help;
    }

    let mut req = Request::default();
    let mut root: Option<String> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" => return Behavior::Version,
            "--help" => return Behavior::Help,
            "--all" => req.options = PruneOptions::all(),
            "--verbose" => req.verbose = true,
            "--package" => match args.next() {
                Some(pkg) => req.packages.push(pkg),
                None => return Behavior::MissingParam("--package"),
            },
            "--lock" => match args.next() {
                Some(path) => req.lock = Some(path),
                None => return Behavior::MissingParam("--lock"),
            },
            other => match Policy::from_flag(other) {
                Some(policy) => req.options.insert(policy),
                None if other.starts_with("--") || root.is_some() => {
                    return Behavior::UnexpectedArg(other.to_owned())
                }
                None => root = Some(other.to_owned()),
            },
        }
    }

    // Each locked project already lists its own packages
    if req.lock.is_some() && !req.packages.is_empty() {
        return Behavior::UnexpectedArg("--package".into());
    }

    match root {
        Some(root) => Behavior::Prune(Request {
            root: root,
            ..req
        }),
        None => Behavior::MissingParam("root"),
    }
}

pub fn run(behavior: Behavior, fs: &impl Filesystem, log: &mut Logger) -> Result<()> {
    match behavior {
        Behavior::Help => write!(log.stdout, "{}", usage()),
        Behavior::Version => write!(log.stdout, "{}\n", env!("CARGO_PKG_VERSION")),
        Behavior::UnexpectedArg(a) => Err(Error::new(
            ErrorKind::InvalidInput,
            format!("Unexpected argument: {}", a),
        )),
        Behavior::MissingParam(name) => Err(Error::new(
            ErrorKind::InvalidInput,
            format!("Missing parameter: {}", name),
        )),
        Behavior::Prune(req) => execute_prune(req, fs, log),
    }
}

pub fn execute(behavior: Behavior, fs: &impl Filesystem, log: &mut Logger) -> ExitCode {
    match run(behavior, fs, log) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            // Nowhere left to report a failure to print the failure
            let _ = write!(log.stderr, "vendorprune: {}\n", e);
            ExitCode::from(1)
        }
    }
}

fn execute_prune(req: Request, fs: &impl Filesystem, log: &mut Logger) -> Result<()> {
    if req.verbose {
        log.routes.removal = Route::Stdout;
    }

    match &req.lock {
        Some(path) => {
            let mut lock = Lock::from_path(path).map_err(|e| {
                Error::new(e.kind(), format!("could not read lock file {}: {}", path, e))
            })?;
            if !req.options.is_empty() {
                lock.prune.defaults = req.options;
            }
            Pruner::new(fs, log).prune_vendor_tree(&req.root, &lock)?;
        }
        None => {
            let report =
                Pruner::new(fs, log).prune_project(&req.root, &req.packages, req.options)?;
            write!(log.summary(), "Removed {} entries\n", report.total())?;
        }
    }
    Ok(())
}

pub fn real_cli() -> ExitCode {
    let mut log = Logger::new_real();
    execute(parse(std::env::args().skip(1)), &OsFs, &mut log)
}
