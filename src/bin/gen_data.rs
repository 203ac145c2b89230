extern crate gbdt_tools;

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use gbdt_tools::cli::{exit_on_error, init_logging, Args};
use gbdt_tools::errors::{Result, ToolError};
use gbdt_tools::generator::{generate, GeneratorConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

const USAGE: &str = "usage: gen_data [--rows N] [--seed S] [--noisy] [--out PATH]";

fn run() -> Result<()> {
    let args = Args::parse(env::args().skip(1), &["rows", "seed", "out"], &["noisy"])?;
    let mut cfg = GeneratorConfig::default();
    if let Some(rows) = args.option("rows")? {
        cfg.rows = rows;
    }
    cfg.seed = args.option("seed")?;
    cfg.noisy = args.switch("noisy");

    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    match args.option::<String>("out")? {
        Some(path) => {
            let file = File::create(&path).map_err(|e| ToolError::io(&path, "create", e))?;
            let mut out = BufWriter::new(file);
            generate(&mut out, &cfg, &mut rng)?;
            out.flush().map_err(|e| ToolError::io(&path, "write", e))?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            generate(&mut out, &cfg, &mut rng)?;
            out.flush().map_err(ToolError::Write)?;
        }
    }
    Ok(())
}

fn main() {
    init_logging();
    exit_on_error(run(), USAGE);
}
