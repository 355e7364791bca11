//! Decompress command implementation.

use crate::cli::DecompressArgs;
use crate::error::add_archive_context;
use crate::error::convert_partial_extraction;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use arcguard_core::ExtractionReport;
use arcguard_core::ExtractionStrategy;
use arcguard_core::SecurityConfig;
use arcguard_core::extract_prechecked;
use arcguard_core::extract_streaming;
use arcguard_core::extract_tar_stream;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;

/// URL scheme of sources fetched through `gfcat`.
const GLFS_SCHEME: &str = "glfs://";

/// Program that writes a glfs object to stdout.
const GFCAT: &str = "gfcat";

fn is_glfs(source: &str) -> bool {
    source.starts_with(GLFS_SCHEME)
}

pub fn execute(args: &DecompressArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let config = SecurityConfig::default()
        .with_thresholds(args.thresholds.resolve())
        .with_overwrite(args.allow_overwrite);
    let dest = std::path::absolute(&args.dest)
        .with_context(|| format!("invalid destination '{}'", args.dest.display()))?;

    let report = if is_glfs(&args.source) {
        if !args.no_precheck {
            formatter.format_warning("glfs sources are extracted as a stream without a precheck");
        }
        decompress_glfs(&args.source, &dest, &config)?
    } else {
        let archive = std::path::absolute(&args.source)
            .with_context(|| format!("invalid source '{}'", args.source))?;
        let strategy = if args.no_precheck {
            ExtractionStrategy::Streaming
        } else {
            ExtractionStrategy::Precheck
        };
        decompress_file(&archive, &dest, &config, strategy)?
    };

    formatter.format_extraction_result(&dest, &report)?;

    Ok(())
}

fn decompress_file(
    archive: &Path,
    dest: &Path,
    config: &SecurityConfig,
    strategy: ExtractionStrategy,
) -> Result<ExtractionReport> {
    log::info!(
        "decompressing {} into {} ({strategy})",
        archive.display(),
        dest.display()
    );

    match strategy {
        ExtractionStrategy::Precheck => {
            add_archive_context(extract_prechecked(archive, dest, config), archive)
        }
        ExtractionStrategy::Streaming => extract_streaming(archive, dest, config)
            .map_err(|partial| convert_partial_extraction(partial, archive, dest)),
    }
}

fn decompress_glfs(
    source: &str,
    dest: &Path,
    config: &SecurityConfig,
) -> Result<ExtractionReport> {
    log::info!("streaming {source} through {GFCAT} into {}", dest.display());

    let mut child = Command::new(GFCAT)
        .arg(source)
        .stdout(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to run {GFCAT} for '{source}'"))?;
    let stdout = child
        .stdout
        .take()
        .with_context(|| format!("{GFCAT} produced no output stream"))?;

    let label = PathBuf::from(source);
    let outcome = extract_tar_stream(stdout, dest, config);
    let status = child
        .wait()
        .with_context(|| format!("failed to wait for {GFCAT}"))?;

    let report = outcome.map_err(|partial| convert_partial_extraction(partial, &label, dest))?;
    if !status.success() {
        bail!("{GFCAT} exited with {status} while reading '{source}'");
    }
    Ok(report)
}
