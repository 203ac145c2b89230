//! This module implements the benchmark harness.
//!
//! The harness loads a train and a test file with [`crate::input`], fits a
//! [`gbdt::gradient_boost::GBDT`] model with the configured loss and reports
//! the fit time together with the metric that goes with the loss:
//!
//! | loss      | metric |
//! |-----------|--------|
//! | `ls`      | RMSE   |
//! | `lad`     | MAE    |
//! | `logloss` | AUC    |

use std::time::{Duration, Instant};

use gbdt::config::Config;
use gbdt::decision_tree::{DataVec, PredVec, ValueType};
use gbdt::fitness::{AUC, MAE, RMSE};
use gbdt::gradient_boost::GBDT;
use log::{debug, info};

use crate::config::{BenchConfig, Loss, MetricKind};
use crate::errors::{Result, ToolError};
use crate::input::{self, InputFormat};

/// Outcome of one benchmark run.
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub train_rows: usize,
    pub test_rows: usize,
    pub fit_duration: Duration,
    pub metric: MetricKind,
    pub value: f64,
    pub predictions: PredVec,
}

fn gbdt_config(cfg: &BenchConfig) -> Config {
    let mut conf = Config::new();
    conf.set_feature_size(cfg.feature_size);
    conf.set_max_depth(cfg.max_depth);
    conf.set_iterations(cfg.iterations);
    conf.set_shrinkage(cfg.shrinkage);
    conf.set_loss(cfg.loss.gbdt_name());
    conf
}

/// Log-loss in `gbdt` expects `-1`/`1` labels; map the label sign onto them.
fn shape_labels(dv: &mut DataVec, loss: Loss) {
    if loss != Loss::LogLoss {
        return;
    }
    for d in dv.iter_mut() {
        let label: ValueType = if d.label > 0.0 { 1.0 } else { -1.0 };
        d.label = label;
        d.target = label;
        d.residual = label;
    }
}

/// Score predictions against the labels of `test` with the given metric.
pub fn score(metric: MetricKind, test: &DataVec, predicted: &PredVec) -> f64 {
    let value = match metric {
        MetricKind::RMSE => RMSE(test, predicted, test.len()),
        MetricKind::MAE => MAE(test, predicted, test.len()),
        MetricKind::AUC => AUC(test, predicted, test.len()),
    };
    f64::from(value)
}

/// Fit on `train`, predict `test` and score the predictions.
pub fn fit_and_score(cfg: &BenchConfig, train: &mut DataVec, test: &mut DataVec) -> Result<BenchReport> {
    cfg.validate()?;
    shape_labels(train, cfg.loss);
    shape_labels(test, cfg.loss);

    let conf = gbdt_config(cfg);
    let mut model = GBDT::new(&conf);

    let start = Instant::now();
    model.fit(train);
    let fit_duration = start.elapsed();
    debug!("fit {} rows in {:?}", train.len(), fit_duration);

    let predictions: PredVec = model.predict(test);
    let metric = cfg.loss.metric();
    let value = score(metric, test, &predictions);

    Ok(BenchReport {
        train_rows: train.len(),
        test_rows: test.len(),
        fit_duration,
        metric,
        value,
        predictions,
    })
}

/// Load both files and run the benchmark.
///
/// # Error
/// Raise error if a file cannot be loaded, including a feature index that
/// does not fit `feature_size`; nothing is fitted in that case.
pub fn run(cfg: &BenchConfig) -> Result<BenchReport> {
    cfg.validate()?;
    let mut fmt = InputFormat::txt_format();
    fmt.set_feature_size(cfg.feature_size);

    let mut train = input::load(&cfg.train_file, &fmt)?;
    let mut test = input::load(&cfg.test_file, &fmt)?;
    info!(
        "loaded {} training rows and {} test rows",
        train.len(),
        test.len()
    );
    if train.is_empty() {
        return Err(ToolError::InvalidConfig(format!(
            "no training rows in {}",
            cfg.train_file
        )));
    }
    if test.is_empty() {
        return Err(ToolError::InvalidConfig(format!(
            "no test rows in {}",
            cfg.test_file
        )));
    }
    fit_and_score(cfg, &mut train, &mut test)
}
