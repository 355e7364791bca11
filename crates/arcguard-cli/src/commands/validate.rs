//! Validate command implementation.

use crate::cli::ValidateArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use arcguard_core::SecurityConfig;
use arcguard_core::validate_archive;

pub fn execute(args: &ValidateArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let config = SecurityConfig::default()
        .with_thresholds(args.thresholds.resolve())
        .with_overwrite(args.allow_overwrite);

    let members = add_archive_context(
        validate_archive(&args.archive, args.dest.as_deref(), &config),
        &args.archive,
    )?;
    log::debug!("{} members accepted", members.len());

    formatter.format_validation_result(&args.archive, &members)?;

    Ok(())
}
