//! Synthetic data for quick experiments.
//!
//! Every row draws three integers `x, y, z` uniformly from `[-10, 10]` and
//! labels the row by the logistic of `w = x + 2y - z`: `1` when
//! `1 / (1 + e^-w) >= 0.5`, `-1` otherwise. With `noisy` set the label is `1`
//! with probability `1 / (1 + e^-w)` instead. Rows are written in the
//! label-only format with a constant bias placeholder:
//!
//! ```text
//! <label> 1 0:<x> 1:<y> 2:<z>
//! ```

use std::io::Write;

use rand::Rng;

use crate::errors::{Result, ToolError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub rows: usize,
    pub noisy: bool,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            rows: 10000,
            noisy: false,
            seed: None,
        }
    }
}

fn logistic(w: f64) -> f64 {
    1.0 / (1.0 + (-w).exp())
}

/// Write `cfg.rows` rows into `out`, drawing from `rng`.
pub fn generate<W: Write, R: Rng>(out: &mut W, cfg: &GeneratorConfig, rng: &mut R) -> Result<()> {
    for _ in 0..cfg.rows {
        let x: i32 = rng.gen_range(-10..=10);
        let y: i32 = rng.gen_range(-10..=10);
        let z: i32 = rng.gen_range(-10..=10);
        let p = logistic(f64::from(x + 2 * y - z));
        let positive = if cfg.noisy {
            rng.gen::<f64>() < p
        } else {
            p >= 0.5
        };
        let label = if positive { 1 } else { -1 };
        writeln!(out, "{} 1 0:{} 1:{} 2:{}", label, x, y, z).map_err(ToolError::Write)?;
    }
    Ok(())
}
