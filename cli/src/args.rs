//! Command-line arguments.
//!
//! Five positionals mirror the classic invocation
//! `pixcrypt <encrypt|decrypt> <ECB|CBC> <key> <input> <output>`; everything
//! else is an optional flag with an environment fallback where it makes sense.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pixcrypt_core::constants::{MAX_KEY_CHARS, MAX_WORKERS, MIN_KEY_CHARS};
use pixcrypt_core::crypto::{CipherMode, Operation, PaddingPolicy};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Parallel AES-256 encryption of BMP pixel data
///
/// The BMP header is copied verbatim; only the pixel payload is transformed.
#[derive(Parser, Debug)]
#[command(name = "pixcrypt")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// encrypt or decrypt
    pub operation: Operation,

    /// ECB or CBC
    pub mode: CipherMode,

    /// Passphrase, 16 to 32 bytes (zero-padded to a 256-bit key)
    #[arg(value_parser = parse_key)]
    pub key: String,

    /// Input BMP file
    pub input: PathBuf,

    /// Output BMP file (written only on success)
    pub output: PathBuf,

    /// Worker group size
    #[arg(short = 'w', long, env = "PIXCRYPT_WORKERS", value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Block threads per worker (defaults to available cores minus one, split across workers)
    #[arg(short = 't', long, env = "PIXCRYPT_THREADS", value_parser = parse_threads)]
    pub threads: Option<usize>,

    /// Fail on invalid padding instead of returning the decrypted payload as-is
    #[arg(long)]
    pub strict_padding: bool,

    /// Log filter directive (e.g. `info`, `pixcrypt_core=debug`)
    #[arg(long, env = "PIXCRYPT_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Write the telemetry snapshot as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl Args {
    pub fn padding_policy(&self) -> PaddingPolicy {
        if self.strict_padding {
            PaddingPolicy::Strict
        } else {
            PaddingPolicy::PassThroughOnInvalid
        }
    }
}

fn parse_key(s: &str) -> Result<String, String> {
    let len = s.len();
    if !(MIN_KEY_CHARS..=MAX_KEY_CHARS).contains(&len) {
        return Err(format!(
            "key must be {MIN_KEY_CHARS} to {MAX_KEY_CHARS} bytes long, got {len}"
        ));
    }
    Ok(s.to_string())
}

fn parse_count(s: &str, max: usize) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{s:?} is not a count: {e}"))?;
    if n == 0 || n > max {
        return Err(format!("must be within 1..={max}, got {n}"));
    }
    Ok(n)
}

fn parse_workers(s: &str) -> Result<usize, String> {
    parse_count(s, MAX_WORKERS)
}

fn parse_threads(s: &str) -> Result<usize, String> {
    parse_count(s, usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123456789ABCDEF";

    fn parse(extra: &[&str]) -> Result<Args, clap::Error> {
        let mut argv = vec!["pixcrypt", "encrypt", "CBC", KEY, "in.bmp", "out.bmp"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv)
    }

    #[test]
    fn positionals_parse() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.operation, Operation::Encrypt);
        assert_eq!(args.mode, CipherMode::Cbc);
        assert_eq!(args.key, KEY);
        assert_eq!(args.input, PathBuf::from("in.bmp"));
        assert_eq!(args.output, PathBuf::from("out.bmp"));
        assert_eq!(args.padding_policy(), PaddingPolicy::PassThroughOnInvalid);
        assert_eq!(args.log_format, LogFormat::Text);
    }

    #[test]
    fn missing_positional_is_rejected() {
        let err = Args::try_parse_from(["pixcrypt", "encrypt", "ECB", KEY, "in.bmp"]);
        assert!(err.is_err());
    }

    #[test]
    fn key_length_bounds() {
        let short = "a".repeat(MIN_KEY_CHARS - 1);
        let long = "a".repeat(MAX_KEY_CHARS + 1);
        let max = "a".repeat(MAX_KEY_CHARS);

        assert!(Args::try_parse_from(["pixcrypt", "encrypt", "ECB", &short, "i", "o"]).is_err());
        assert!(Args::try_parse_from(["pixcrypt", "encrypt", "ECB", &long, "i", "o"]).is_err());
        assert!(Args::try_parse_from(["pixcrypt", "encrypt", "ECB", &max, "i", "o"]).is_ok());
    }

    #[test]
    fn unknown_mode_and_operation_are_rejected() {
        assert!(Args::try_parse_from(["pixcrypt", "encrypt", "GCM", KEY, "i", "o"]).is_err());
        assert!(Args::try_parse_from(["pixcrypt", "shred", "ECB", KEY, "i", "o"]).is_err());
    }

    #[test]
    fn worker_count_must_be_positive_and_bounded() {
        assert!(parse(&["--workers", "0"]).is_err());
        assert!(parse(&["--workers", "257"]).is_err());
        assert_eq!(parse(&["--workers", "3"]).unwrap().workers, Some(3));
        assert!(parse(&["--threads", "0"]).is_err());
    }

    #[test]
    fn optional_flags() {
        let args = parse(&["--strict-padding", "--log-format", "json", "--report", "r.json"]).unwrap();
        assert_eq!(args.padding_policy(), PaddingPolicy::Strict);
        assert_eq!(args.log_format, LogFormat::Json);
        assert_eq!(args.report, Some(PathBuf::from("r.json")));
    }
}
