//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use arcguard_core::ExtractionReport;
use arcguard_core::MemberRecord;
use arcguard_core::security::classify;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct ExtractionOutput {
    destination: String,
    strategy: &'static str,
    files_extracted: usize,
    directories_created: usize,
    bytes_written: u64,
    duration_ms: u128,
}

#[derive(Debug, Serialize)]
struct MemberOutput {
    name: String,
    #[serde(rename = "type")]
    member_type: &'static str,
    size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    compressed_size: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ValidationOutput {
    archive: String,
    total_members: usize,
    total_size: u64,
    members: Vec<MemberOutput>,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn validation_output(archive: &Path, members: &[MemberRecord]) -> ValidationOutput {
        ValidationOutput {
            archive: archive.display().to_string(),
            total_members: members.len(),
            total_size: members.iter().map(MemberRecord::size).sum(),
            members: members
                .iter()
                .map(|member| MemberOutput {
                    name: member.name().to_string(),
                    member_type: classify(member).member_type.label(),
                    size: member.size(),
                    compressed_size: member.compressed_size(),
                })
                .collect(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_extraction_result(&self, dest: &Path, report: &ExtractionReport) -> Result<()> {
        let data = ExtractionOutput {
            destination: dest.display().to_string(),
            strategy: report.strategy.name(),
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
        };

        Self::output(&JsonOutput::success("decompress", data))
    }

    fn format_validation_result(&self, archive: &Path, members: &[MemberRecord]) -> Result<()> {
        Self::output(&JsonOutput::success(
            "validate",
            Self::validation_output(archive, members),
        ))
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}
