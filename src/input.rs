//! This module implements the data loader used by the benchmark harness and the feature ranker.
//!
//! Lines follow the sparse text format `<label> <bias|weight> <idx>:<val> ...`.
//! Each line is densified into a zero-initialized row of `feature_size` values
//! by scatter-writing its pairs, and becomes one [`gbdt::decision_tree::Data`].
//! The second token is ignored.
//!
//! # Example
//! ```rust
//! use gbdt_tools::input::{load_txt, InputFormat};
//! let mut fmt = InputFormat::txt_format();
//! fmt.set_feature_size(3);
//! let dv = load_txt("1 1 0:1 2:5\n-1 1 1:2\n".as_bytes(), &fmt).unwrap();
//! assert_eq!(dv[0].feature, vec![1.0, 0.0, 5.0]);
//! assert_eq!(dv[1].label, -1.0);
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};

use gbdt::decision_tree::{Data, DataVec, ValueType};
use log::{debug, warn};

use crate::config::MalformedPolicy;
use crate::errors::{Result, ToolError};
use crate::record::SparseRecord;

/// The input file format struct.
#[derive(Copy, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFormat {
    /// Width of a dense row. Every feature index in the data must be smaller.
    pub feature_size: usize,

    /// Stop after this many rows. (default = read everything)
    pub max_samples: Option<usize>,

    /// What to do with lines that do not parse. (default = fail fast)
    pub malformed: MalformedPolicy,
}

impl Default for InputFormat {
    fn default() -> Self {
        InputFormat::txt_format()
    }
}

impl InputFormat {
    /// Return a default sparse text input format.
    /// # Example
    /// ```rust
    /// use gbdt_tools::input::InputFormat;
    /// let fmt = InputFormat::txt_format();
    /// println!("{}", fmt.to_string());
    /// ```
    pub fn txt_format() -> InputFormat {
        InputFormat {
            feature_size: 0,
            max_samples: None,
            malformed: MalformedPolicy::FailFast,
        }
    }

    /// Transform the input format to human readable string.
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> String {
        let mut s = String::from("");
        s.push_str(&format!("Feature size: {}\n", self.feature_size));
        match self.max_samples {
            Some(n) => s.push_str(&format!("Max samples: {}\n", n)),
            None => s.push_str("Max samples: all\n"),
        }
        s.push_str(&format!("Malformed lines: {:?}", self.malformed));
        s
    }

    /// Set the dense row width.
    /// # Example
    /// ```rust
    /// use gbdt_tools::input::InputFormat;
    /// let mut fmt = InputFormat::txt_format();
    /// fmt.set_feature_size(126); // the total feature size
    /// ```
    pub fn set_feature_size(&mut self, size: usize) {
        self.feature_size = size;
    }

    pub fn set_max_samples(&mut self, n: usize) {
        self.max_samples = Some(n);
    }

    pub fn set_malformed_policy(&mut self, policy: MalformedPolicy) {
        self.malformed = policy;
    }
}

/// Scatter the pairs of `record` into a zero-initialized row of `feature_size` values.
///
/// # Error
/// An index `>= feature_size` means the declared feature count is too small;
/// it is reported instead of being truncated.
pub fn densify(record: &SparseRecord, feature_size: usize, line: usize) -> Result<Vec<ValueType>> {
    if let Some(&(index, _)) = record.features.iter().find(|(idx, _)| *idx >= feature_size) {
        return Err(ToolError::FeatureIndexOutOfRange {
            line,
            index,
            feature_size,
        });
    }
    let mut v: Vec<ValueType> = vec![0.0; feature_size];
    for &(idx, val) in &record.features {
        v[idx] = val as ValueType;
    }
    Ok(v)
}

/// Load sparse text data from a reader.
///
/// # Error
/// Raise error if the stream cannot be read, a line is malformed (unless
/// skipping is enabled) or a feature index does not fit.
pub fn load_txt<R: BufRead>(reader: R, input_format: &InputFormat) -> Result<DataVec> {
    if input_format.feature_size == 0 {
        return Err("feature size must be positive".into());
    }
    let mut dv = Vec::new();
    let limit = input_format.max_samples.unwrap_or(usize::MAX);

    for (i, line) in reader.lines().enumerate() {
        if dv.len() >= limit {
            break;
        }
        let line = line.map_err(ToolError::Read)?;
        let line_no = i + 1;
        // `lines()` leaves a trailing '\r', which the tokenizer treats as whitespace
        let record = match SparseRecord::parse(&line, line_no) {
            Ok(record) => record,
            Err(e) if input_format.malformed == MalformedPolicy::SkipAndWarn => {
                warn!("skipping line: {}", e);
                continue;
            }
            Err(e) => return Err(e),
        };
        let feature = densify(&record, input_format.feature_size, line_no)?;
        dv.push(Data::new_training_data(
            feature,
            1.0,
            record.label as ValueType,
            None,
        ));
    }
    Ok(dv)
}

/// Load a file with the given input format.
///
/// # Error
/// Raise error if file cannot be open or read correctly; the error names the file.
pub fn load(file_name: &str, input_format: &InputFormat) -> Result<DataVec> {
    let file = File::open(file_name).map_err(|e| ToolError::io(file_name, "open", e))?;
    let dv = load_txt(BufReader::new(file), input_format)
        .map_err(|e| e.with_paths(std::path::Path::new(file_name), None))?;
    debug!("loaded {} rows from {}", dv.len(), file_name);
    Ok(dv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fmt(n: usize) -> InputFormat {
        let mut fmt = InputFormat::txt_format();
        fmt.set_feature_size(n);
        fmt
    }

    #[test]
    fn inputformat_txt_format() {
        let fmt = InputFormat::txt_format();
        assert_eq!(fmt.feature_size, 0);
        assert_eq!(fmt.max_samples, None);
        assert_eq!(fmt.malformed, MalformedPolicy::FailFast);
        assert_eq!(
            fmt.to_string(),
            "Feature size: 0\nMax samples: all\nMalformed lines: FailFast"
        );
    }

    #[test]
    fn densify_scatters_unsorted_pairs() {
        let r = SparseRecord::parse("1 1 4:2 0:-1.5 2:3", 1).unwrap();
        assert_eq!(densify(&r, 5, 1).unwrap(), vec![-1.5, 0.0, 3.0, 0.0, 2.0]);
    }

    #[test]
    fn densify_rejects_out_of_range_index() {
        let r = SparseRecord::parse("1 1 0:1 3:2", 1).unwrap();
        match densify(&r, 3, 8).unwrap_err() {
            ToolError::FeatureIndexOutOfRange {
                line,
                index,
                feature_size,
            } => {
                assert_eq!(line, 8);
                assert_eq!(index, 3);
                assert_eq!(feature_size, 3);
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn load_txt_builds_rows() {
        let dv = load_txt("1 1 0:1 1:2\n-1 1 2:7\n".as_bytes(), &fmt(3)).unwrap();
        assert_eq!(dv.len(), 2);
        assert_eq!(dv[0].label, 1.0);
        assert_eq!(dv[0].weight, 1.0);
        assert_eq!(dv[0].feature, vec![1.0, 2.0, 0.0]);
        assert_eq!(dv[1].feature, vec![0.0, 0.0, 7.0]);
    }

    #[test]
    fn load_txt_respects_max_samples() {
        let mut f = fmt(2);
        f.set_max_samples(2);
        let dv = load_txt("1 1 0:1\n1 1 0:2\n1 1 0:3\n".as_bytes(), &f).unwrap();
        assert_eq!(dv.len(), 2);
        assert_eq!(dv[1].feature[0], 2.0);
    }

    #[test]
    fn load_txt_fails_on_malformed_line() {
        let err = load_txt("1 1 0:1\n1 1 0:x\n".as_bytes(), &fmt(2)).unwrap_err();
        match err {
            ToolError::MalformedRecord { line, token, .. } => {
                assert_eq!(line, 2);
                assert_eq!(token, "0:x");
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn load_txt_can_skip_malformed_lines() {
        let mut f = fmt(2);
        f.set_malformed_policy(MalformedPolicy::SkipAndWarn);
        let dv = load_txt("1 1 0:1\nbad\n-1 1 1:1\n".as_bytes(), &f).unwrap();
        assert_eq!(dv.len(), 2);
    }

    #[test]
    fn load_txt_never_skips_out_of_range_index() {
        let mut f = fmt(2);
        f.set_malformed_policy(MalformedPolicy::SkipAndWarn);
        let err = load_txt("1 1 0:1\n1 1 5:1\n".as_bytes(), &f).unwrap_err();
        assert!(matches!(err, ToolError::FeatureIndexOutOfRange { .. }));
    }

    #[test]
    fn load_txt_needs_feature_size() {
        assert!(load_txt("1 1 0:1\n".as_bytes(), &fmt(0)).is_err());
    }

    #[test]
    fn load_names_missing_file() {
        let err = load("does/not/exist.txt", &fmt(2)).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.txt"));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "1 1 0:3 1:1\n-1 1 0:1\n").unwrap();
        let dv = load(file.path().to_str().unwrap(), &fmt(2)).unwrap();
        assert_eq!(dv.len(), 2);
        assert_eq!(dv[0].feature, vec![3.0, 1.0]);
    }
}
