//! Builds a packed amplitude buffer from plain numbers.

use anyhow::anyhow;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::visualizer::{decoder::sample_count, pack_samples};

/// Packs 5-bit amplitudes into `output`.
///
/// Values come from `values`, or from whitespace/comma separated numbers on stdin when
/// none are given.
///
/// # Errors
/// - If a value is not a number in `0..=31`
/// - If stdin or the output file cannot be accessed
pub fn handle_pack(values: Vec<String>, output: &Path) -> anyhow::Result<()> {
    let tokens = if values.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| anyhow!("Failed to read values from stdin: {e}"))?;
        split_values(&input)
    } else {
        values
            .iter()
            .flat_map(|v| split_values(v))
            .collect()
    };

    let amplitudes = parse_values(&tokens)?;
    let bytes = pack_samples(&amplitudes)?;

    fs::write(output, &bytes)
        .map_err(|e| anyhow!("Failed to write {}: {e}", output.display()))?;

    tracing::info!(
        "Packed {} samples into {} bytes at {}",
        amplitudes.len(),
        bytes.len(),
        output.display()
    );
    eprintln!(
        "Packed {} samples into {} bytes ({} samples readable)",
        amplitudes.len(),
        bytes.len(),
        sample_count(bytes.len())
    );
    Ok(())
}

fn split_values(input: &str) -> Vec<String> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_values(tokens: &[String]) -> anyhow::Result<Vec<u8>> {
    tokens
        .iter()
        .map(|t| {
            t.parse::<u8>()
                .map_err(|e| anyhow!("Invalid amplitude '{t}': {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_values_accepts_commas_and_whitespace() {
        assert_eq!(split_values("1, 2\n3\t4,,5"), vec!["1", "2", "3", "4", "5"]);
        assert!(split_values("  \n").is_empty());
    }

    #[test]
    fn test_parse_values() {
        let tokens = split_values("0 31 7");
        assert_eq!(parse_values(&tokens).unwrap(), vec![0, 31, 7]);
        assert!(parse_values(&split_values("3 x")).is_err());
        assert!(parse_values(&split_values("300")).is_err());
    }
}
