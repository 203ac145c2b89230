//! Helpers shared by the command line tools: argument parsing and logger setup.
//!
//! Arguments are positional values plus `--name value` options and bare
//! `--name` switches. Only the names a tool declares are accepted.

use std::collections::{HashMap, HashSet};
use std::process;
use std::str::FromStr;

use log::error;

use crate::errors::{Result, ToolError};

/// Initialise `env_logger` with `info` as the default level; `RUST_LOG` overrides it.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Parse `value` as the argument `name`.
pub fn parse_value<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ToolError::Usage(format!("invalid value {:?} for {}", value, name)))
}

#[derive(Debug, Default)]
pub struct Args {
    positional: Vec<String>,
    options: HashMap<String, String>,
    switches: HashSet<String>,
}

impl Args {
    /// Split `args` (without the program name) into positionals, options and switches.
    pub fn parse<I>(args: I, options: &[&str], switches: &[&str]) -> Result<Args>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args::default();
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            if !arg.starts_with("--") || arg.len() == 2 {
                parsed.positional.push(arg);
                continue;
            }
            let name = &arg[2..];
            if switches.contains(&name) {
                parsed.switches.insert(name.to_string());
            } else if options.contains(&name) {
                let value = iter
                    .next()
                    .ok_or_else(|| ToolError::Usage(format!("missing value for --{}", name)))?;
                parsed.options.insert(name.to_string(), value);
            } else {
                return Err(ToolError::Usage(format!("unknown option --{}", name)));
            }
        }
        Ok(parsed)
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn switch(&self, name: &str) -> bool {
        self.switches.contains(name)
    }

    pub fn option<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        match self.options.get(name) {
            Some(v) => parse_value(&format!("--{}", name), v).map(Some),
            None => Ok(None),
        }
    }

    pub fn required<T: FromStr>(&self, name: &str) -> Result<T> {
        self.option(name)?
            .ok_or_else(|| ToolError::Usage(format!("missing required option --{}", name)))
    }
}

/// Report a failed run and exit with status 1.
pub fn exit_on_error(result: Result<()>, usage: &str) {
    if let Err(e) = result {
        error!("{}", e);
        if let ToolError::Usage(_) = e {
            eprintln!("{}", usage);
        }
        process::exit(1);
    }
}
