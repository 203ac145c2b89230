//! This module implements the streaming label-stratified sampler.
//!
//! The sampler reads a sparse data file line by line and keeps:
//!
//! 1. every positive line (`label > 0`) it reaches,
//! 2. each negative line independently with probability `negative_ratio`
//!    (all of them when the ratio is `>= 1`),
//!
//! until `row_budget` lines have been written. Input order is preserved and the
//! feature payload of a line is never parsed or reformatted. In the weight-aware
//! variant the weight field of a retained line is multiplied by the class
//! multiplier and the `label weight` prefix is rewritten.
//!
//! Lines are handled as raw bytes: only the label and weight tokens are decoded,
//! the rest of a line is written back byte for byte whatever its encoding.
//!
//! # Example
//! ```rust
//! use gbdt_tools::config::SamplerConfig;
//! use gbdt_tools::sampler::sample;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let input = "-1 1 0:3 1:-2\n1 1 0:5 1:1\n";
//! let mut output: Vec<u8> = Vec::new();
//! let cfg = SamplerConfig::new(10, 0.0);
//! let stats = sample(input.as_bytes(), &mut output, &cfg, StdRng::seed_from_u64(7)).unwrap();
//! assert_eq!(String::from_utf8(output).unwrap(), "1 1 0:5 1:1\n");
//! assert_eq!(stats.emitted, 1);
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::NamedTempFile;

use crate::config::{MalformedPolicy, RecordFormat, SamplerConfig};
use crate::errors::{Result, ToolError};
use crate::record::{format_real, parse_label_prefix, parse_weighted_prefix, split_terminator};

/// Per-pass state: the number of lines written so far and the random source
/// deciding which negative lines survive.
pub struct SamplingSession<R: Rng> {
    row_budget: usize,
    negative_ratio: f64,
    emitted: usize,
    rng: R,
}

impl<R: Rng> SamplingSession<R> {
    pub fn new(row_budget: usize, negative_ratio: f64, rng: R) -> SamplingSession<R> {
        SamplingSession {
            row_budget,
            negative_ratio,
            emitted: 0,
            rng,
        }
    }

    /// Whether the row budget has been used up.
    pub fn is_full(&self) -> bool {
        self.emitted >= self.row_budget
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Decide whether a line with this label is kept.
    ///
    /// The random source is only consulted for negative lines when the ratio is below 1.
    pub fn retain(&mut self, label: f64) -> bool {
        if self.negative_ratio >= 1.0 || label > 0.0 {
            return true;
        }
        self.rng.gen::<f64>() < self.negative_ratio
    }

    fn record_emitted(&mut self) {
        self.emitted += 1;
    }
}

/// Counters of one sampling pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleStats {
    /// Lines pulled from the source, including skipped ones.
    pub lines_read: usize,
    pub emitted: usize,
    pub positives: usize,
    pub negatives_kept: usize,
    pub negatives_dropped: usize,
    /// Malformed lines dropped under [`MalformedPolicy::SkipAndWarn`].
    pub skipped: usize,
}

/// The parsed part of a line that the sampler needs.
enum Prefix<'a> {
    Label(f64),
    Weighted { label: f64, weight: f64, features: &'a [u8] },
}

impl<'a> Prefix<'a> {
    fn parse(content: &'a [u8], line: usize, format: RecordFormat) -> Result<Prefix<'a>> {
        match format {
            RecordFormat::LabelOnly => parse_label_prefix(content, line).map(|p| Prefix::Label(p.label)),
            RecordFormat::Weighted => parse_weighted_prefix(content, line).map(|p| Prefix::Weighted {
                label: p.label,
                weight: p.weight,
                features: p.features,
            }),
        }
    }

    fn label(&self) -> f64 {
        match *self {
            Prefix::Label(label) => label,
            Prefix::Weighted { label, .. } => label,
        }
    }
}

fn write_row<W: Write>(
    sink: &mut W,
    content: &[u8],
    terminator: &[u8],
    prefix: &Prefix,
    config: &SamplerConfig,
) -> std::io::Result<()> {
    match *prefix {
        Prefix::Label(_) => sink.write_all(content)?,
        Prefix::Weighted {
            label,
            weight,
            features,
        } => {
            let weight = weight * config.weight_multiplier(label);
            write!(sink, "{} {}", format_real(label), format_real(weight))?;
            if !features.is_empty() {
                sink.write_all(b" ")?;
                sink.write_all(features)?;
            }
        }
    }
    let terminator = if terminator.is_empty() { &b"\n"[..] } else { terminator };
    sink.write_all(terminator)
}

/// Run one sampling pass from `source` into `sink` with the given random source.
///
/// Reading stops as soon as `row_budget` lines have been written; the source is
/// not touched after that.
///
/// # Error
/// Invalid ratios or multipliers are rejected before anything is read. A
/// malformed line aborts the pass under [`MalformedPolicy::FailFast`]; lines
/// written before it stay in `sink`.
pub fn sample<B, W, R>(mut source: B, sink: &mut W, config: &SamplerConfig, rng: R) -> Result<SampleStats>
where
    B: BufRead,
    W: Write,
    R: Rng,
{
    config.validate()?;
    let mut session = SamplingSession::new(config.row_budget, config.negative_ratio, rng);
    let mut stats = SampleStats::default();
    let mut buf: Vec<u8> = Vec::new();

    while !session.is_full() {
        buf.clear();
        if source.read_until(b'\n', &mut buf).map_err(ToolError::Read)? == 0 {
            break;
        }
        stats.lines_read += 1;

        let (content, terminator) = split_terminator(&buf);
        let prefix = match Prefix::parse(content, stats.lines_read, config.format) {
            Ok(prefix) => prefix,
            Err(e) if e.is_malformed() && config.malformed == MalformedPolicy::SkipAndWarn => {
                warn!("skipping line: {}", e);
                stats.skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let positive = prefix.label() > 0.0;
        if !session.retain(prefix.label()) {
            stats.negatives_dropped += 1;
            continue;
        }
        write_row(sink, content, terminator, &prefix, config).map_err(ToolError::Write)?;
        session.record_emitted();
        if positive {
            stats.positives += 1;
        } else {
            stats.negatives_kept += 1;
        }
    }

    stats.emitted = session.emitted();
    Ok(stats)
}

/// Sample `input` into `output`.
///
/// The rows are written to a temporary file next to `output`, which replaces
/// `output` only once the whole pass succeeded. On error the temporary file is
/// removed and `output` is left untouched.
pub fn sample_file(input: &Path, output: &Path, config: &SamplerConfig) -> Result<SampleStats> {
    debug!(
        "sampling {} into {}\n{}",
        input.display(),
        output.display(),
        config.to_string()
    );
    let file = File::open(input).map_err(|e| ToolError::io(input, "open", e))?;
    let reader = BufReader::new(file);

    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)
        .map_err(|e| ToolError::io(dir, "create a temporary file in", e))?;
    let mut writer = BufWriter::new(tmp);

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let stats = sample(reader, &mut writer, config, rng)
        .map_err(|e| e.with_paths(input, Some(output)))?;

    let tmp = writer
        .into_inner()
        .map_err(|e| ToolError::io(output, "write", e.into_error()))?;
    tmp.persist(output)
        .map_err(|e| ToolError::io(output, "persist", e.error))?;
    Ok(stats)
}
