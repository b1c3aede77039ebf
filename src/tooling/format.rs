//! Text formatting for CLI output.

use crate::freshness::{StaleReason, Verdict};
use crate::path::AssetPath;
use crate::store::OutputRecord;
use crate::types::{FileType, Timestamp};
use crate::versions::{self, Versions};
use chrono::{DateTime, Utc};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Seconds since the epoch as RFC 3339, or the raw number if out of range.
pub fn format_timestamp(timestamp: Timestamp) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| timestamp.to_string())
}

pub fn format_verdict(output: AssetPath, verdict: &Verdict, details: bool) -> String {
    let mut out = match verdict {
        Verdict::UpToDate => format!("{} {}", "up to date".green(), output),
        Verdict::Stale(_) => format!("{} {}", "stale".red(), output),
    };
    if !details {
        return out;
    }
    if let Verdict::Stale(reason) = verdict {
        out.push('\n');
        out.push_str(&match reason {
            StaleReason::NoRecord => "  no record".to_string(),
            StaleReason::CookerVersion { recorded, current } => {
                format!("  cooker version {} (current {})", recorded, current)
            }
            StaleReason::DataVersion { recorded, current } => {
                format!("  data version {} (current {})", recorded, current)
            }
            StaleReason::OutputChanged { recorded, current } => format!(
                "  cooked file changed: recorded {}, now {}",
                format_timestamp(*recorded),
                current.map(format_timestamp).unwrap_or_else(|| "missing".to_string())
            ),
            StaleReason::Dependencies(paths) => paths
                .iter()
                .map(|p| format!("  changed: {}", p.yellow()))
                .collect::<Vec<_>>()
                .join("\n"),
        });
    }
    out
}

pub fn format_record(output: AssetPath, record: &OutputRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_section_heading(&output.to_string())));
    out.push_str(&format!("  Cooked:         {}\n", format_timestamp(record.cooked_timestamp)));
    out.push_str(&format!("  Recorded:       {}\n", format_timestamp(record.record_timestamp)));
    out.push_str(&format!("  Cooker version: {}\n", record.cooker_version));
    out.push_str(&format!("  Data version:   {}\n\n", record.data_version));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Kind", "Path", "Timestamp / Count"]);
    for source in &record.sources {
        table.add_row(vec![
            "source".to_string(),
            source.path.to_string(),
            format_timestamp(source.timestamp),
        ]);
    }
    for sibling in &record.siblings {
        table.add_row(vec![
            "sibling".to_string(),
            sibling.path.to_string(),
            format_timestamp(sibling.timestamp),
        ]);
    }
    for dir in &record.directories {
        table.add_row(vec![
            "directory".to_string(),
            dir.path.to_string(),
            dir.file_count.to_string(),
        ]);
    }
    out.push_str(&table.to_string());
    out
}

pub fn format_versions(versions: &Versions) -> String {
    let mut out = format!("Cooker version: {}\n\n", versions.cooker);
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Type", "Source", "Cooked", "Data version", "One-to-one"]);
    for file_type in FileType::all().iter().copied() {
        if file_type == FileType::Unknown {
            continue;
        }
        table.add_row(vec![
            format!("{:?}", file_type),
            file_type.source_extension().to_string(),
            file_type.cooked_extension().to_string(),
            versions.data_version(file_type).to_string(),
            if versions::is_one_to_one_type(file_type) { "yes" } else { "no" }.to_string(),
        ]);
    }
    out.push_str(&table.to_string());
    out
}

pub fn format_path_list(title: &str, paths: &[AssetPath]) -> String {
    if paths.is_empty() {
        return format!("{}: none", title);
    }
    let mut out = format!("{} ({}):", title, paths.len());
    for path in paths {
        out.push_str(&format!("\n  {}", path));
    }
    out
}
