extern crate gbdt_tools;

use std::env;
use std::path::Path;

use gbdt_tools::cli::{exit_on_error, init_logging, parse_value, Args};
use gbdt_tools::config::{MalformedPolicy, SamplerConfig};
use gbdt_tools::errors::{Result, ToolError};
use gbdt_tools::sampler::sample_file;
use log::{debug, info};

const USAGE: &str = "usage: sample_data <input> <output> <row_budget> <negative_ratio> \
[<positive_weight> <negative_weight>] [--seed N] [--skip-malformed]";

fn run() -> Result<()> {
    let args = Args::parse(env::args().skip(1), &["seed"], &["skip-malformed"])?;
    let pos = args.positional();
    if pos.len() != 4 && pos.len() != 6 {
        return Err(ToolError::Usage(format!(
            "expected 4 or 6 positional arguments, got {}",
            pos.len()
        )));
    }

    let mut cfg = SamplerConfig::new(
        parse_value("row_budget", &pos[2])?,
        parse_value("negative_ratio", &pos[3])?,
    );
    if pos.len() == 6 {
        cfg.set_weight_multipliers(
            parse_value("positive_weight", &pos[4])?,
            parse_value("negative_weight", &pos[5])?,
        );
    }
    if let Some(seed) = args.option("seed")? {
        cfg.set_seed(seed);
    }
    if args.switch("skip-malformed") {
        cfg.set_malformed_policy(MalformedPolicy::SkipAndWarn);
    }
    debug!("config: {}", serde_json::to_string(&cfg)?);

    let stats = sample_file(Path::new(&pos[0]), Path::new(&pos[1]), &cfg)?;
    info!("sampled {} rows: {}", stats.emitted, serde_json::to_string(&stats)?);
    Ok(())
}

fn main() {
    init_logging();
    exit_on_error(run(), USAGE);
}
