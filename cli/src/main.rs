//! pixcrypt CLI
//!
//! Encrypt or decrypt the pixel payload of a BMP image with AES-256 (ECB or CBC),
//! spreading the work over a group of workers, each with its own block pool.
//!
//! # Example
//!
//! ```bash
//! pixcrypt encrypt CBC 0123456789ABCDEF photo.bmp photo.enc.bmp
//! pixcrypt decrypt CBC 0123456789ABCDEF photo.enc.bmp photo.out.bmp --workers 4
//! PIXCRYPT_LOG=debug pixcrypt encrypt ECB 0123456789ABCDEF in.bmp out.bmp --report run.json
//! ```
//!
//! Exit status is 0 on success and 1 on any failure.

mod args;

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use pixcrypt_core::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroize;

use crate::args::{Args, LogFormat};

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help / --version are not failures
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    if let Err(e) = init_tracing(&args.log_level, args.log_format) {
        eprintln!("error: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "operation failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(directive: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .with_context(|| format!("invalid log filter {directive:?}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

fn run(mut args: Args) -> Result<()> {
    let key = Key::from_passphrase(args.key.as_bytes());
    args.key.zeroize();

    let request = OperationRequest::new(args.operation, args.mode, key)
        .with_padding(args.padding_policy());
    let profile = ParallelismProfile::dynamic(args.workers, args.threads);

    info!(
        operation = %request.operation,
        mode = %request.mode,
        input = %args.input.display(),
        output = %args.output.display(),
        workers = profile.workers,
        threads = profile.threads_per_worker,
        "starting"
    );

    let snapshot = process_file(&args.input, &args.output, &request, &profile)
        .with_context(|| format!("{} of {} failed", request.operation, args.input.display()))?;

    info!(
        blocks = snapshot.blocks,
        bytes_out = snapshot.bytes_out,
        elapsed_ms = snapshot.elapsed.as_secs_f64() * 1_000.0,
        throughput_mib_s = snapshot.throughput_bytes_per_sec / (1024.0 * 1024.0),
        "{} complete",
        request.operation
    );

    if let Some(path) = &args.report {
        let json = snapshot.to_json_pretty().context("failed to serialize telemetry")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixcrypt_core::container::{build_bmp, BmpHeader};
    use std::path::Path;

    const KEY: &str = "0123456789ABCDEF";

    fn args_for(op: &str, mode: &str, input: &Path, output: &Path, extra: &[&str]) -> Args {
        let mut argv = vec![
            "pixcrypt".to_string(),
            op.to_string(),
            mode.to_string(),
            KEY.to_string(),
            input.display().to_string(),
            output.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn encrypt_then_decrypt_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.bmp");
        let enc = dir.path().join("enc.bmp");
        let dec = dir.path().join("dec.bmp");
        let report = dir.path().join("report.json");

        let pixels: Vec<u8> = (0..4 * 3 * 3).map(|i| i as u8).collect();
        let original = build_bmp(&BmpHeader::new_rgb24(4, 3, pixels.len() as u32), &pixels);
        fs::write(&plain, &original).unwrap();

        let report_arg = report.display().to_string();
        run(args_for("encrypt", "CBC", &plain, &enc, &["--workers", "2", "--report", &report_arg]))
            .unwrap();
        run(args_for("decrypt", "CBC", &enc, &dec, &["--workers", "3"])).unwrap();

        assert_eq!(fs::read(&dec).unwrap(), original);

        let json: serde_json::Value = serde_json::from_slice(&fs::read(&report).unwrap()).unwrap();
        assert_eq!(json["workers"], 2);
    }

    #[test]
    fn failed_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("not-a-bmp.bmp");
        let output = dir.path().join("out.bmp");
        fs::write(&input, b"definitely not a bitmap, far too short").unwrap();

        assert!(run(args_for("encrypt", "ECB", &input, &output, &[])).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.bmp");
        let result = run(args_for("encrypt", "ECB", &dir.path().join("missing.bmp"), &output, &[]));
        assert!(result.is_err());
        assert!(!output.exists());
    }
}
