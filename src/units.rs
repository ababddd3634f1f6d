//! Byte-size parsing and SI rate scaling
//!
//! Command-line size flags accept human-readable sizes like `500GB` or
//! `10Ki`: SI prefixes (K, M, G, T, P) are powers of 10, binary
//! prefixes (Ki, Mi, Gi, Ti, Pi) are powers of 2, with an optional
//! trailing `B`. A string with no unit suffix parses as plain bytes.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

fn size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+)([kKMGTP]i?)B?$").unwrap())
}

/// Parse a human-readable byte size into an integer byte count.
pub fn parse_byte_size(arg: &str) -> Result<u64> {
    if let Some(caps) = size_pattern().captures(arg) {
        let value: u64 = caps[1]
            .parse()
            .map_err(|_| Error::CapacityParse(arg.to_string()))?;
        let multiplier = match &caps[2] {
            "k" | "K" => 1_000,
            "M" => 1_000_000,
            "G" => 1_000_000_000,
            "T" => 1_000_000_000_000,
            "P" => 1_000_000_000_000_000,
            "Ki" => 1 << 10,
            "Mi" => 1 << 20,
            "Gi" => 1 << 30,
            "Ti" => 1u64 << 40,
            "Pi" => 1u64 << 50,
            _ => return Err(Error::CapacityParse(arg.to_string())),
        };
        return value
            .checked_mul(multiplier)
            .ok_or_else(|| Error::CapacityParse(arg.to_string()));
    }

    arg.parse()
        .map_err(|_| Error::CapacityParse(arg.to_string()))
}

/// clap value parser hook so `--size 500GB` works on the command line.
pub fn byte_size_value_parser(arg: &str) -> std::result::Result<u64, String> {
    parse_byte_size(arg).map_err(|e| e.to_string())
}

/// SI magnitudes for rate display, largest first, down through the
/// sub-unit prefixes used by the bandwidth monitor.
const SI_SUFFIXES: &[(f64, &str)] = &[
    (1e15, "P"),
    (1e12, "T"),
    (1e9, "G"),
    (1e6, "M"),
    (1e3, "K"),
    (1e0, ""),
    (1e-3, "m"),
    (1e-6, "u"),
    (1e-9, "n"),
    (1e-12, "p"),
    (1e-15, "f"),
];

/// Scale a rate to the first SI magnitude it exceeds, returning the
/// scaled value and the suffix. Rates at or below 1e-15 come back
/// unscaled with an empty suffix.
pub fn scale_rate(rate: f64) -> (f64, &'static str) {
    for &(magnitude, suffix) in SI_SUFFIXES {
        if rate > magnitude {
            return (rate / magnitude, suffix);
        }
    }
    (rate, "")
}

/// Format a throughput as a fixed-width `B/s` cell, e.g. ` 5210.2PB/s`.
pub fn format_rate(rate: f64) -> String {
    let (scaled, suffix) = scale_rate(rate);
    format!("{scaled:5.1}{suffix}B/s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_si_suffixes() {
        assert_eq!(parse_byte_size("500GB").unwrap(), 500_000_000_000);
        assert_eq!(parse_byte_size("500G").unwrap(), 500_000_000_000);
        assert_eq!(parse_byte_size("1K").unwrap(), 1_000);
        assert_eq!(parse_byte_size("1k").unwrap(), 1_000);
        assert_eq!(parse_byte_size("2M").unwrap(), 2_000_000);
        assert_eq!(parse_byte_size("3TB").unwrap(), 3_000_000_000_000);
        assert_eq!(parse_byte_size("1P").unwrap(), 1_000_000_000_000_000);
    }

    #[test]
    fn test_binary_suffixes() {
        assert_eq!(parse_byte_size("1Gi").unwrap(), 1_073_741_824);
        assert_eq!(parse_byte_size("10Ki").unwrap(), 10_240);
        assert_eq!(parse_byte_size("1MiB").unwrap(), 1_048_576);
        assert_eq!(parse_byte_size("2Ti").unwrap(), 2u64 << 40);
        assert_eq!(parse_byte_size("1Pi").unwrap(), 1u64 << 50);
    }

    #[test]
    fn test_plain_integer_fallback() {
        assert_eq!(parse_byte_size("42").unwrap(), 42);
        assert_eq!(parse_byte_size("0").unwrap(), 0);
    }

    #[test]
    fn test_malformed_sizes() {
        assert!(parse_byte_size("").is_err());
        assert!(parse_byte_size("GB").is_err());
        assert!(parse_byte_size("12QB").is_err());
        assert!(parse_byte_size("1.5GB").is_err());
        assert!(parse_byte_size("-1G").is_err());
        // Suffix must terminate the string
        assert!(parse_byte_size("1GBx").is_err());
    }

    #[test]
    fn test_scale_rate() {
        let (rate, suffix) = scale_rate(5_210_200_000_000_000.0);
        assert_eq!(suffix, "P");
        assert!((rate - 5.2102).abs() < 1e-6);

        let (rate, suffix) = scale_rate(1_500.0);
        assert_eq!(suffix, "K");
        assert!((rate - 1.5).abs() < 1e-9);

        let (_, suffix) = scale_rate(0.5);
        assert_eq!(suffix, "m");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(1_500.0), "  1.5KB/s");
        assert_eq!(format_rate(0.0), "  0.0B/s");
    }
}
