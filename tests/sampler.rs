extern crate gbdt_tools;

use std::fs;
use std::io::Write;
use std::path::Path;

use gbdt_tools::config::{MalformedPolicy, SamplerConfig};
use gbdt_tools::errors::ToolError;
use gbdt_tools::sampler::sample_file;
use tempfile::TempDir;

fn write_input(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("input.txt");
    let mut f = fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn sample_file_writes_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "-1 1 0:3 1:-2\n1 1 0:5 1:1\n");
    let output = dir.path().join("output.txt");

    let mut cfg = SamplerConfig::new(10, 0.0);
    cfg.set_seed(1);
    let stats = sample_file(&input, &output, &cfg).unwrap();

    assert_eq!(stats.emitted, 1);
    assert_eq!(fs::read_to_string(&output).unwrap(), "1 1 0:5 1:1\n");
}

#[test]
fn sample_file_weighted_rows() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "-1 2.0 0:1\n");
    let output = dir.path().join("output.txt");

    let mut cfg = SamplerConfig::new(10, 1.0);
    cfg.set_weight_multipliers(1.0, 0.5);
    sample_file(&input, &output, &cfg).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "-1.0 1.0 0:1\n");
}

#[test]
fn malformed_input_leaves_no_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "1 1.0 0:1\n-1\n1 1.0 0:2\n");
    let output = dir.path().join("output.txt");

    let mut cfg = SamplerConfig::new(10, 1.0);
    cfg.set_weight_multipliers(1.0, 1.0);
    let err = sample_file(&input, &output, &cfg).unwrap_err();

    assert!(err.is_malformed());
    assert!(!output.exists());
    // the temporary file is cleaned up as well
    let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn malformed_input_keeps_previous_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "garbage line\n");
    let output = dir.path().join("output.txt");
    fs::write(&output, "previous\n").unwrap();

    let err = sample_file(&input, &output, &SamplerConfig::new(10, 1.0)).unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous\n");
}

#[test]
fn skip_malformed_is_opt_in() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "1 1 0:1\ngarbage\n-1 1 0:2\n");
    let output = dir.path().join("output.txt");

    let mut cfg = SamplerConfig::new(10, 1.0);
    cfg.set_malformed_policy(MalformedPolicy::SkipAndWarn);
    let stats = sample_file(&input, &output, &cfg).unwrap();

    assert_eq!(stats.skipped, 1);
    assert_eq!(fs::read_to_string(&output).unwrap(), "1 1 0:1\n-1 1 0:2\n");
}

#[test]
fn zero_budget_gives_empty_file() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "1 1 0:1\n1 1 0:2\n");
    let output = dir.path().join("output.txt");

    sample_file(&input, &output, &SamplerConfig::new(0, 1.0)).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn same_seed_same_sample() {
    let dir = TempDir::new().unwrap();
    let content: String = (0..1000)
        .map(|i| format!("{} 1 0:{}\n", if i % 10 == 0 { 1 } else { -1 }, i))
        .collect();
    let input = write_input(&dir, &content);
    let first = dir.path().join("a.txt");
    let second = dir.path().join("b.txt");

    let mut cfg = SamplerConfig::new(300, 0.2);
    cfg.set_seed(2024);
    let s1 = sample_file(&input, &first, &cfg).unwrap();
    let s2 = sample_file(&input, &second, &cfg).unwrap();

    assert_eq!(s1, s2);
    assert_eq!(
        fs::read_to_string(&first).unwrap(),
        fs::read_to_string(&second).unwrap()
    );
    // output is an order-preserving subsequence of the input
    let input_lines: Vec<&str> = content.lines().collect();
    let out = fs::read_to_string(&first).unwrap();
    let mut pos = 0;
    for line in out.lines() {
        let found = input_lines[pos..].iter().position(|l| *l == line).unwrap();
        pos += found + 1;
    }
    assert!(out.lines().count() <= 300);
}

#[test]
fn missing_input_names_the_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("absent.txt");
    let output = dir.path().join("output.txt");

    match sample_file(&input, &output, &SamplerConfig::new(10, 1.0)).unwrap_err() {
        ToolError::Io { path, op, .. } => {
            assert_eq!(path, input);
            assert_eq!(op, "open");
        }
        e => panic!("unexpected error {:?}", e),
    }
    assert!(!Path::new(&output).exists());
}
