extern crate gbdt_tools;

use std::env;

use gbdt_tools::benchmark;
use gbdt_tools::cli::{exit_on_error, init_logging, Args};
use gbdt_tools::config::BenchConfig;
use gbdt_tools::errors::Result;
use log::debug;

const USAGE: &str = "usage: gbrt_bench --features N --train PATH --test PATH [--depth D] \
[--shrinkage R] [--iterations K] [--loss ls|lad|logloss] [--print-predictions]";

fn run() -> Result<()> {
    let args = Args::parse(
        env::args().skip(1),
        &["features", "train", "test", "depth", "shrinkage", "iterations", "loss"],
        &["print-predictions"],
    )?;
    let train: String = args.required("train")?;
    let test: String = args.required("test")?;
    let mut cfg = BenchConfig::new(args.required("features")?, &train, &test);
    if let Some(depth) = args.option("depth")? {
        cfg.set_max_depth(depth);
    }
    if let Some(rate) = args.option("shrinkage")? {
        cfg.set_shrinkage(rate);
    }
    if let Some(n) = args.option("iterations")? {
        cfg.set_iterations(n);
    }
    if let Some(loss) = args.option::<String>("loss")? {
        cfg.set_loss(&loss)?;
    }
    debug!("config:\n{}", cfg.to_string());

    let report = benchmark::run(&cfg)?;
    println!("fit time: {:.3}s", report.fit_duration.as_secs_f64());
    println!("{}: {}", report.metric.name(), report.value);
    if args.switch("print-predictions") {
        for p in &report.predictions {
            println!("{}", p);
        }
    }
    Ok(())
}

fn main() {
    init_logging();
    exit_on_error(run(), USAGE);
}
