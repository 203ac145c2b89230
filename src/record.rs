//! This module implements the line grammar of the sparse text data format.
//!
//! Two variants share the same shape:
//!
//! 1. label-only: `<label> <bias> <idx0>:<val0> <idx1>:<val1> ...`, where the
//!    second token is a constant bias placeholder.
//! 2. weight-aware: `<label> <weight> <idx0>:<val0> ...`.
//!
//! Lines are tokenized first and every token is validated, so bad input turns
//! into a [`ToolError::MalformedRecord`] carrying the line number and the
//! offending token. The prefix parsers work on raw bytes and decode only the
//! label and weight tokens, so the feature payload is never required to be UTF-8.
//!
//! # Example
//! ```rust
//! use gbdt_tools::record::{parse_weighted_prefix, SparseRecord};
//! let prefix = parse_weighted_prefix(b"-1 2.0 0:1 5:0.5", 1).unwrap();
//! assert_eq!(prefix.label, -1.0);
//! assert_eq!(prefix.weight, 2.0);
//! assert_eq!(prefix.features, b"0:1 5:0.5");
//!
//! let record = SparseRecord::parse("1 1 0:3 2:-1", 1).unwrap();
//! assert_eq!(record.features, vec![(0, 3.0), (2, -1.0)]);
//! ```

use crate::errors::{Result, ToolError};

/// Label prefix of a label-only line. `rest` is everything after the label separator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPrefix<'a> {
    pub label: f64,
    pub rest: &'a [u8],
}

/// Label and weight prefix of a weight-aware line. `features` is the unparsed,
/// undecoded suffix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPrefix<'a> {
    pub label: f64,
    pub weight: f64,
    pub features: &'a [u8],
}

/// A fully parsed line.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseRecord {
    pub label: f64,
    /// The bias placeholder or the weight, if present.
    pub second: Option<f64>,
    pub features: Vec<(usize, f64)>,
}

/// Split a raw line into its content and its line terminator (`"\n"`, `"\r\n"` or `""`).
pub fn split_terminator(line: &[u8]) -> (&[u8], &[u8]) {
    if line.ends_with(b"\r\n") {
        line.split_at(line.len() - 2)
    } else if line.ends_with(b"\n") {
        line.split_at(line.len() - 1)
    } else {
        (line, &b""[..])
    }
}

/// Split off the leading token. The remainder starts right after the single
/// separating whitespace byte. Returns `None` when there is no whitespace.
fn split_token(s: &[u8]) -> Option<(&[u8], &[u8])> {
    s.iter()
        .position(|&b| b == b' ' || b == b'\t')
        .map(|idx| (&s[..idx], &s[idx + 1..]))
}

/// Only the prefix tokens are decoded; the feature payload may hold any bytes.
fn decode_token(token: &[u8], line: usize) -> Result<&str> {
    std::str::from_utf8(token).map_err(|_| {
        ToolError::malformed(line, &String::from_utf8_lossy(token), "token is not valid UTF-8")
    })
}

fn parse_label(token: &str, line: usize) -> Result<f64> {
    if token.is_empty() {
        return Err(ToolError::malformed(line, token, "missing label"));
    }
    let label: f64 = token
        .parse()
        .map_err(|_| ToolError::malformed(line, token, "label is not a number"))?;
    if !label.is_finite() {
        return Err(ToolError::malformed(line, token, "label is not finite"));
    }
    Ok(label)
}

fn parse_weight(token: &str, line: usize) -> Result<f64> {
    if token.is_empty() {
        return Err(ToolError::malformed(line, token, "missing weight"));
    }
    match token.parse::<f64>() {
        Ok(w) if w.is_finite() && w >= 0.0 => Ok(w),
        _ => Err(ToolError::malformed(
            line,
            token,
            "weight must be a non-negative number",
        )),
    }
}

/// Parse one `<idx>:<val>` pair.
pub fn parse_feature(token: &str, line: usize) -> Result<(usize, f64)> {
    let (idx, val) = token
        .split_once(':')
        .ok_or_else(|| ToolError::malformed(line, token, "expected <index>:<value>"))?;
    let idx: usize = idx
        .parse()
        .map_err(|_| ToolError::malformed(line, token, "feature index is not a non-negative integer"))?;
    let val: f64 = val
        .parse()
        .map_err(|_| ToolError::malformed(line, token, "feature value is not a number"))?;
    Ok((idx, val))
}

/// Parse the label of a label-only line. `content` must not contain the line terminator.
pub fn parse_label_prefix(content: &[u8], line: usize) -> Result<LabelPrefix<'_>> {
    let (token, rest) = split_token(content).unwrap_or((content, &b""[..]));
    let label = parse_label(decode_token(token, line)?, line)?;
    Ok(LabelPrefix { label, rest })
}

/// Parse the label and weight of a weight-aware line. `content` must not contain the line terminator.
///
/// # Error
/// A line without whitespace after the label has no weight token and is rejected.
pub fn parse_weighted_prefix(content: &[u8], line: usize) -> Result<WeightedPrefix<'_>> {
    let (label_token, rest) = split_token(content).ok_or_else(|| {
        ToolError::malformed(
            line,
            &String::from_utf8_lossy(content),
            "no whitespace after the label, expected a weight token",
        )
    })?;
    let label = parse_label(decode_token(label_token, line)?, line)?;
    let (weight_token, features) = split_token(rest).unwrap_or((rest, &b""[..]));
    let weight = parse_weight(decode_token(weight_token, line)?, line)?;
    Ok(WeightedPrefix {
        label,
        weight,
        features,
    })
}

impl SparseRecord {
    /// Tokenize and validate a whole line.
    ///
    /// The second token is the bias placeholder or weight; when it already
    /// looks like an `<idx>:<val>` pair the line is taken to have no second field.
    pub fn parse(content: &str, line: usize) -> Result<SparseRecord> {
        let mut tokens = content.split_ascii_whitespace();
        let label = parse_label(tokens.next().unwrap_or(""), line)?;

        let mut features = Vec::new();
        let second = match tokens.next() {
            Some(t) if t.contains(':') => {
                features.push(parse_feature(t, line)?);
                None
            }
            Some(t) => Some(parse_weight(t, line)?),
            None => None,
        };
        for t in tokens {
            features.push(parse_feature(t, line)?);
        }

        Ok(SparseRecord {
            label,
            second,
            features,
        })
    }
}

/// Format a real the way the rewritten prefix needs it: shortest round-trip
/// digits with a fractional part for integral values (`-1.0`, `0.5`). Values
/// Rust prints in exponent form keep it (`1e20`, `1e-7`); they still parse back
/// to the same number.
pub fn format_real(v: f64) -> String {
    format!("{:?}", v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminators_are_split_off() {
        assert_eq!(split_terminator(b"1 1 0:1\n"), (&b"1 1 0:1"[..], &b"\n"[..]));
        assert_eq!(split_terminator(b"1 1 0:1\r\n"), (&b"1 1 0:1"[..], &b"\r\n"[..]));
        assert_eq!(split_terminator(b"1 1 0:1"), (&b"1 1 0:1"[..], &b""[..]));
    }

    #[test]
    fn label_prefix() {
        let p = parse_label_prefix(b"-1 1 0:3 1:-2", 1).unwrap();
        assert_eq!(p.label, -1.0);
        assert_eq!(p.rest, b"1 0:3 1:-2");

        let p = parse_label_prefix(b"0.25\t1 0:3", 1).unwrap();
        assert_eq!(p.label, 0.25);

        // a bare label is still a record
        let p = parse_label_prefix(b"1", 1).unwrap();
        assert_eq!(p.label, 1.0);
        assert!(p.rest.is_empty());
    }

    #[test]
    fn label_prefix_rejects_garbage() {
        let err = parse_label_prefix(b"abc 1 0:1", 4).unwrap_err();
        match err {
            ToolError::MalformedRecord { line, token, .. } => {
                assert_eq!(line, 4);
                assert_eq!(token, "abc");
            }
            e => panic!("unexpected error {:?}", e),
        }
        assert!(parse_label_prefix(b"", 1).unwrap_err().is_malformed());
        assert!(parse_label_prefix(b" 1 0:1", 1).unwrap_err().is_malformed());
        assert!(parse_label_prefix(b"nan 1 0:1", 1).unwrap_err().is_malformed());
    }

    #[test]
    fn weighted_prefix_keeps_suffix_untouched() {
        let p = parse_weighted_prefix(b"1 0.5 10:1.000 3:2e-3", 1).unwrap();
        assert_eq!(p.label, 1.0);
        assert_eq!(p.weight, 0.5);
        assert_eq!(p.features, b"10:1.000 3:2e-3");

        let p = parse_weighted_prefix(b"-1 2", 1).unwrap();
        assert_eq!(p.weight, 2.0);
        assert!(p.features.is_empty());
    }

    #[test]
    fn weighted_prefix_requires_weight_token() {
        let err = parse_weighted_prefix(b"-1", 3).unwrap_err();
        match err {
            ToolError::MalformedRecord { line, token, .. } => {
                assert_eq!(line, 3);
                assert_eq!(token, "-1");
            }
            e => panic!("unexpected error {:?}", e),
        }
        assert!(parse_weighted_prefix(b"-1 x 0:1", 1).unwrap_err().is_malformed());
        assert!(parse_weighted_prefix(b"-1 -2 0:1", 1).unwrap_err().is_malformed());
        assert!(parse_weighted_prefix(b"-1  0:1", 1).unwrap_err().is_malformed());
    }

    #[test]
    fn prefix_payload_may_hold_any_bytes() {
        let p = parse_label_prefix(b"1 1 0:1 # caf\xe9", 1).unwrap();
        assert_eq!(p.label, 1.0);
        assert_eq!(p.rest, b"1 0:1 # caf\xe9");

        let p = parse_weighted_prefix(b"-1 2 0:1 \xff\xfe", 1).unwrap();
        assert_eq!(p.weight, 2.0);
        assert_eq!(p.features, b"0:1 \xff\xfe");
    }

    #[test]
    fn undecodable_prefix_token_is_malformed() {
        match parse_label_prefix(b"\xff\xfe 1 0:1", 6).unwrap_err() {
            ToolError::MalformedRecord { line, token, .. } => {
                assert_eq!(line, 6);
                assert_eq!(token, "\u{fffd}\u{fffd}");
            }
            e => panic!("unexpected error {:?}", e),
        }
        assert!(parse_weighted_prefix(b"1 \xe9 0:1", 1).unwrap_err().is_malformed());
    }

    #[test]
    fn sparse_record() {
        let r = SparseRecord::parse("1 1 0:5 1:1", 1).unwrap();
        assert_eq!(r.label, 1.0);
        assert_eq!(r.second, Some(1.0));
        assert_eq!(r.features, vec![(0, 5.0), (1, 1.0)]);

        let r = SparseRecord::parse("-1 7:0.5 2:1", 1).unwrap();
        assert_eq!(r.second, None);
        assert_eq!(r.features, vec![(7, 0.5), (2, 1.0)]);

        let err = SparseRecord::parse("1 1 0:5 bad", 9).unwrap_err();
        match err {
            ToolError::MalformedRecord { line, token, .. } => {
                assert_eq!(line, 9);
                assert_eq!(token, "bad");
            }
            e => panic!("unexpected error {:?}", e),
        }
        assert!(SparseRecord::parse("1 1 x:5", 1).unwrap_err().is_malformed());
        assert!(SparseRecord::parse("1 1 -1:5", 1).unwrap_err().is_malformed());
        assert!(SparseRecord::parse("1 1 0:y", 1).unwrap_err().is_malformed());
    }

    #[test]
    fn reals_keep_a_fractional_part() {
        assert_eq!(format_real(-1.0), "-1.0");
        assert_eq!(format_real(1.0), "1.0");
        assert_eq!(format_real(0.5), "0.5");
        assert_eq!(format_real(2.0 * 0.75), "1.5");
    }

    #[test]
    fn exponent_range_reals_round_trip() {
        assert_eq!(format_real(1e20), "1e20");
        assert_eq!(format_real(1e-7), "1e-7");
        for v in &[1e20, 1e-7, -3.5e300, 0.1 + 0.2] {
            assert_eq!(format_real(*v).parse::<f64>().unwrap(), *v);
        }
    }
}
