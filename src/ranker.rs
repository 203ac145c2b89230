//! This module implements the univariate feature ranker.
//!
//! Every column of a densified data set is scored by the one-way ANOVA F
//! statistic between the classes given by the labels, and the features are
//! reported by descending score under the names of a mapping file (one name per
//! line, line `i` naming feature index `i`).

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use gbdt::decision_tree::{DataVec, ValueType};

use crate::config::MalformedPolicy;
use crate::errors::{Result, ToolError};
use crate::input::{self, InputFormat};

/// Read the feature names, one per line, surrounding whitespace removed.
pub fn load_feature_mapping(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| ToolError::io(path, "open", e))?;
    let mut names = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| ToolError::io(path, "read", e))?;
        names.push(line.trim().to_string());
    }
    Ok(names)
}

/// Load at most `n_samples` rows of `n_features` columns.
pub fn load_samples(
    data_file: &str,
    n_samples: usize,
    n_features: usize,
    malformed: MalformedPolicy,
) -> Result<DataVec> {
    let mut fmt = InputFormat::txt_format();
    fmt.set_feature_size(n_features);
    fmt.set_max_samples(n_samples);
    fmt.set_malformed_policy(malformed);
    input::load(data_file, &fmt)
}

/// One-way ANOVA F statistic of every column against the label classes.
///
/// A column that is constant within every class scores `inf` when the class
/// means differ and `NaN` when the column is constant overall.
///
/// # Error
/// Needs at least two classes and more rows than classes.
pub fn f_classif(dv: &DataVec, n_features: usize) -> Result<Vec<f64>> {
    let mut classes: Vec<ValueType> = Vec::new();
    let class_of: Vec<usize> = dv
        .iter()
        .map(|d| match classes.iter().position(|c| *c == d.label) {
            Some(k) => k,
            None => {
                classes.push(d.label);
                classes.len() - 1
            }
        })
        .collect();

    let n = dv.len();
    let k = classes.len();
    if k < 2 {
        return Err(ToolError::InvalidConfig(format!(
            "F statistic needs at least two label classes, found {}",
            k
        )));
    }
    if n <= k {
        return Err(ToolError::InvalidConfig(format!(
            "F statistic needs more rows than classes, found {} rows and {} classes",
            n, k
        )));
    }

    let mut counts = vec![0usize; k];
    for &c in &class_of {
        counts[c] += 1;
    }

    let mut scores = Vec::with_capacity(n_features);
    for j in 0..n_features {
        let mut sums = vec![0.0f64; k];
        let mut total = 0.0f64;
        for (d, &c) in dv.iter().zip(&class_of) {
            let x = f64::from(d.feature[j]);
            sums[c] += x;
            total += x;
        }
        let grand_mean = total / n as f64;
        let means: Vec<f64> = sums
            .iter()
            .zip(&counts)
            .map(|(s, &cnt)| s / cnt as f64)
            .collect();

        let ss_between: f64 = means
            .iter()
            .zip(&counts)
            .map(|(m, &cnt)| cnt as f64 * (m - grand_mean).powi(2))
            .sum();
        let ss_within: f64 = dv
            .iter()
            .zip(&class_of)
            .map(|(d, &c)| (f64::from(d.feature[j]) - means[c]).powi(2))
            .sum();

        let ms_between = ss_between / (k - 1) as f64;
        let ms_within = ss_within / (n - k) as f64;
        scores.push(if ms_within > 0.0 {
            ms_between / ms_within
        } else if ms_between > 0.0 {
            f64::INFINITY
        } else {
            f64::NAN
        });
    }
    Ok(scores)
}

/// Pair names with scores, highest score first. `NaN` scores go last; ties keep
/// feature order.
pub fn rank(names: &[String], scores: &[f64]) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = names.iter().cloned().zip(scores.iter().cloned()).collect();
    ranked.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal),
    });
    ranked
}

/// Load the mapping and the data, score every feature and rank them.
pub fn rank_file(
    data_file: &str,
    n_samples: usize,
    mapping: &Path,
    malformed: MalformedPolicy,
) -> Result<Vec<(String, f64)>> {
    let names = load_feature_mapping(mapping)?;
    if names.is_empty() {
        return Err(ToolError::InvalidConfig(format!(
            "feature mapping {} is empty",
            mapping.display()
        )));
    }
    let dv = load_samples(data_file, n_samples, names.len(), malformed)?;
    let scores = f_classif(&dv, names.len())?;
    Ok(rank(&names, &scores))
}
