//! This module implements the configs for the sampler and the benchmark harness.
//!
//! Configs are plain structs with public fields, a `new()` constructor holding the
//! defaults and `set_*` setters. They derive `Serialize` so the tools can dump
//! the effective configuration.

use crate::errors::{Result, ToolError};

/// Which of the two line variants a data file uses.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum RecordFormat {
    /// `<label> <bias> <idx>:<val> ...`; retained lines are copied verbatim.
    LabelOnly,
    /// `<label> <weight> <idx>:<val> ...`; retained lines get their weight rescaled.
    Weighted,
}

impl Default for RecordFormat {
    fn default() -> Self {
        RecordFormat::LabelOnly
    }
}

/// What to do with a line that does not parse.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum MalformedPolicy {
    /// Abort the whole pass with the parse error.
    FailFast,
    /// Log a warning, drop the line and go on.
    SkipAndWarn,
}

impl Default for MalformedPolicy {
    fn default() -> Self {
        MalformedPolicy::FailFast
    }
}

/// Loss used by the benchmark harness. Each loss comes with the metric it is scored by.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum Loss {
    /// `ls`: least squares, scored by RMSE.
    LeastSquares,
    /// `lad`: least absolute deviation, scored by MAE.
    LeastAbsoluteDeviation,
    /// `logloss`: binary classification log-loss, scored by AUC.
    LogLoss,
}

impl Default for Loss {
    fn default() -> Self {
        Loss::LeastSquares
    }
}

/// Scalar summary reported by the benchmark harness.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum MetricKind {
    RMSE,
    MAE,
    AUC,
}

impl MetricKind {
    pub fn name(self) -> &'static str {
        match self {
            MetricKind::RMSE => "RMSE",
            MetricKind::MAE => "MAE",
            MetricKind::AUC => "AUC",
        }
    }
}

impl Loss {
    /// Name of the loss in the `gbdt` crate's configuration.
    pub fn gbdt_name(self) -> &'static str {
        match self {
            Loss::LeastSquares => "SquaredError",
            Loss::LeastAbsoluteDeviation => "LAD",
            Loss::LogLoss => "LogLikelyhood",
        }
    }

    pub fn metric(self) -> MetricKind {
        match self {
            Loss::LeastSquares => MetricKind::RMSE,
            Loss::LeastAbsoluteDeviation => MetricKind::MAE,
            Loss::LogLoss => MetricKind::AUC,
        }
    }
}

/// Parse the command line name of a loss.
///
/// # Example
/// ```rust
/// use gbdt_tools::config::{string2loss, Loss};
/// assert_eq!(string2loss("lad").unwrap(), Loss::LeastAbsoluteDeviation);
/// assert!(string2loss("huber").is_err());
/// ```
pub fn string2loss(s: &str) -> Result<Loss> {
    match s {
        "ls" => Ok(Loss::LeastSquares),
        "lad" => Ok(Loss::LeastAbsoluteDeviation),
        "logloss" => Ok(Loss::LogLoss),
        _ => Err(ToolError::InvalidConfig(format!(
            "unknown loss {:?}, expected one of ls, lad, logloss",
            s
        ))),
    }
}

pub fn loss2string(l: &Loss) -> String {
    match l {
        Loss::LeastSquares => String::from("ls"),
        Loss::LeastAbsoluteDeviation => String::from("lad"),
        Loss::LogLoss => String::from("logloss"),
    }
}

/// Parameters of one sampling pass.
///
/// `negative_ratio >= 1` keeps every negative line. The weight multipliers are
/// only applied to [`RecordFormat::Weighted`] data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub row_budget: usize,
    pub negative_ratio: f64,
    pub positive_weight: f64,
    pub negative_weight: f64,
    pub format: RecordFormat,
    pub malformed: MalformedPolicy,
    /// Seed of the session's random source. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig::new(0, 1.0)
    }
}

impl SamplerConfig {
    pub fn new(row_budget: usize, negative_ratio: f64) -> SamplerConfig {
        SamplerConfig {
            row_budget,
            negative_ratio,
            positive_weight: 1.0,
            negative_weight: 1.0,
            format: RecordFormat::LabelOnly,
            malformed: MalformedPolicy::FailFast,
            seed: None,
        }
    }

    pub fn set_row_budget(&mut self, n: usize) {
        self.row_budget = n;
    }

    pub fn set_negative_ratio(&mut self, ratio: f64) {
        self.negative_ratio = ratio;
    }

    /// Switch to the weight-aware variant with the given per-class multipliers.
    pub fn set_weight_multipliers(&mut self, positive: f64, negative: f64) {
        self.format = RecordFormat::Weighted;
        self.positive_weight = positive;
        self.negative_weight = negative;
    }

    pub fn set_format(&mut self, format: RecordFormat) {
        self.format = format;
    }

    pub fn set_malformed_policy(&mut self, policy: MalformedPolicy) {
        self.malformed = policy;
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    /// Multiplier applied to the weight of a line with this label.
    pub fn weight_multiplier(&self, label: f64) -> f64 {
        if label > 0.0 {
            self.positive_weight
        } else {
            self.negative_weight
        }
    }

    /// Reject ratios and multipliers outside `[0, inf)`.
    pub fn validate(&self) -> Result<()> {
        if !(self.negative_ratio.is_finite() && self.negative_ratio >= 0.0) {
            return Err(ToolError::InvalidConfig(format!(
                "negative ratio must be a non-negative number, got {}",
                self.negative_ratio
            )));
        }
        for (name, m) in [
            ("positive weight multiplier", self.positive_weight),
            ("negative weight multiplier", self.negative_weight),
        ]
        .iter()
        {
            if !(m.is_finite() && *m >= 0.0) {
                return Err(ToolError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, m
                )));
            }
        }
        Ok(())
    }

    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> String {
        let mut s = String::from("");
        s.push_str(&format!("row budget = {}\n", self.row_budget));
        s.push_str(&format!("negative ratio = {}\n", self.negative_ratio));
        s.push_str(&format!("record format = {:?}\n", self.format));
        if self.format == RecordFormat::Weighted {
            s.push_str(&format!("positive weight = {}\n", self.positive_weight));
            s.push_str(&format!("negative weight = {}\n", self.negative_weight));
        }
        s.push_str(&format!("malformed lines = {:?}\n", self.malformed));
        match self.seed {
            Some(seed) => s.push_str(&format!("seed = {}\n", seed)),
            None => s.push_str("seed = entropy\n"),
        }
        s
    }
}

/// Parameters of one benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    pub feature_size: usize,
    pub train_file: String,
    pub test_file: String,
    pub max_depth: u32,
    pub shrinkage: f32,
    pub iterations: usize,
    pub loss: Loss,
}

impl BenchConfig {
    pub fn new(feature_size: usize, train_file: &str, test_file: &str) -> BenchConfig {
        BenchConfig {
            feature_size,
            train_file: train_file.to_string(),
            test_file: test_file.to_string(),
            max_depth: 6,
            shrinkage: 0.1,
            iterations: 100,
            loss: Loss::LeastSquares,
        }
    }

    pub fn set_max_depth(&mut self, n: u32) {
        self.max_depth = n;
    }

    pub fn set_shrinkage(&mut self, r: f32) {
        self.shrinkage = r;
    }

    pub fn set_iterations(&mut self, n: usize) {
        self.iterations = n;
    }

    pub fn set_loss(&mut self, l: &str) -> Result<()> {
        self.loss = string2loss(l)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.feature_size == 0 {
            return Err("feature size must be positive".into());
        }
        if self.max_depth == 0 {
            return Err("tree depth must be positive".into());
        }
        if self.iterations == 0 {
            return Err("iteration count must be positive".into());
        }
        if !(self.shrinkage.is_finite() && self.shrinkage > 0.0) {
            return Err(ToolError::InvalidConfig(format!(
                "learning rate must be positive, got {}",
                self.shrinkage
            )));
        }
        Ok(())
    }

    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> String {
        let mut s = String::from("");
        s.push_str(&format!("number of features = {}\n", self.feature_size));
        s.push_str(&format!("train file = {}\n", self.train_file));
        s.push_str(&format!("test file = {}\n", self.test_file));
        s.push_str(&format!("max depth = {}\n", self.max_depth));
        s.push_str(&format!("learning rate = {}\n", self.shrinkage));
        s.push_str(&format!("iterations = {}\n", self.iterations));
        s.push_str(&format!("loss type = {}\n", loss2string(&self.loss)));
        s
    }
}
