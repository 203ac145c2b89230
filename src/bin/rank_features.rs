extern crate gbdt_tools;

use std::env;
use std::path::Path;

use gbdt_tools::cli::{exit_on_error, init_logging, parse_value, Args};
use gbdt_tools::config::MalformedPolicy;
use gbdt_tools::errors::{Result, ToolError};
use gbdt_tools::ranker::rank_file;

const USAGE: &str = "usage: rank_features <data> <samples> <mapping> [--skip-malformed]";

fn run() -> Result<()> {
    let args = Args::parse(env::args().skip(1), &[], &["skip-malformed"])?;
    let pos = args.positional();
    if pos.len() != 3 {
        return Err(ToolError::Usage(format!(
            "expected 3 positional arguments, got {}",
            pos.len()
        )));
    }
    let n_samples: usize = parse_value("samples", &pos[1])?;
    let malformed = if args.switch("skip-malformed") {
        MalformedPolicy::SkipAndWarn
    } else {
        MalformedPolicy::FailFast
    };

    let ranked = rank_file(&pos[0], n_samples, Path::new(&pos[2]), malformed)?;
    println!("{}", ranked.len());
    for (name, score) in &ranked {
        println!("{}:{}", name, score);
    }
    Ok(())
}

fn main() {
    init_logging();
    exit_on_error(run(), USAGE);
}
