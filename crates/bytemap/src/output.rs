use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// A command result that can be rendered in every [`OutputFormat`].
pub trait Report: Serialize {
    /// Field/value pairs for table output.
    fn rows(&self) -> Vec<(&'static str, String)>;

    /// Human-readable lines for pretty output.
    fn lines(&self) -> Vec<String>;
}

#[derive(Serialize)]
pub struct EncodeReport {
    pub schema_id: &'static str,
    pub input: String,
    pub output: String,
    pub profile: &'static str,
    pub magic: String,
    pub original_size: usize,
    pub stored_size: usize,
    pub width: u32,
    pub height: u32,
    pub channels: String,
}

impl EncodeReport {
    pub const SCHEMA_ID: &'static str =
        "https://schemas.3leaps.dev/bytemap/cli/v1/encode-report.schema.json";
}

impl Report for EncodeReport {
    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("INPUT", self.input.clone()),
            ("OUTPUT", self.output.clone()),
            ("PROFILE", self.profile.to_string()),
            ("MAGIC", self.magic.clone()),
            ("ORIGINAL", format!("{} bytes", self.original_size)),
            ("STORED", format!("{} bytes", self.stored_size)),
            ("RASTER", format!("{}x{} {}", self.width, self.height, self.channels)),
        ]
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "[SUCCESS] Encoded {} bytes into a {}x{} PNG: {}",
            self.original_size, self.width, self.height, self.output
        )];
        if self.stored_size != self.original_size {
            lines.push(format!(
                "[INFO] Payload stored as {} compressed bytes.",
                self.stored_size
            ));
        }
        lines.push(
            "[INFO] Note: This is not compression. PNG output may be larger than the original file."
                .to_string(),
        );
        lines
    }
}

#[derive(Serialize)]
pub struct DecodeReport {
    pub schema_id: &'static str,
    pub input: String,
    pub output: String,
    pub magic: String,
    pub compressed: bool,
    pub size: usize,
}

impl DecodeReport {
    pub const SCHEMA_ID: &'static str =
        "https://schemas.3leaps.dev/bytemap/cli/v1/decode-report.schema.json";
}

impl Report for DecodeReport {
    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("INPUT", self.input.clone()),
            ("OUTPUT", self.output.clone()),
            ("MAGIC", self.magic.clone()),
            ("COMPRESSED", self.compressed.to_string()),
            ("SIZE", format!("{} bytes", self.size)),
        ]
    }

    fn lines(&self) -> Vec<String> {
        vec![format!(
            "[SUCCESS] Decoded {} bytes to: {}",
            self.size, self.output
        )]
    }
}

#[derive(Serialize)]
pub struct InspectReport {
    pub schema_id: &'static str,
    pub input: String,
    pub width: u32,
    pub height: u32,
    pub channels: String,
    pub profile: Option<&'static str>,
    pub magic: Option<String>,
    pub stored_size: Option<u64>,
    pub capacity: usize,
}

impl InspectReport {
    pub const SCHEMA_ID: &'static str =
        "https://schemas.3leaps.dev/bytemap/cli/v1/inspect-report.schema.json";
}

impl Report for InspectReport {
    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("INPUT", self.input.clone()),
            ("RASTER", format!("{}x{} {}", self.width, self.height, self.channels)),
            ("PROFILE", self.profile.unwrap_or("unknown").to_string()),
            ("MAGIC", self.magic.clone().unwrap_or_else(|| "-".to_string())),
            ("STORED", optional_bytes(self.stored_size)),
            ("CAPACITY", format!("{} bytes", self.capacity)),
        ]
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "{}: {}x{} {} PNG, capacity {} bytes",
            self.input, self.width, self.height, self.channels, self.capacity
        )];
        match (self.profile, &self.magic, self.stored_size) {
            (Some(profile), Some(magic), Some(size)) => lines.push(format!(
                "profile={profile} magic={magic} stored={size} bytes"
            )),
            _ => lines.push("no bytemap header recognised".to_string()),
        }
        lines
    }
}

pub fn print_report<R: Report>(report: &R, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (field, value) in report.rows() {
                table.add_row(vec![field.to_string(), value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for line in report.lines() {
                println!("{line}");
            }
        }
    }
}

/// Write decoded bytes to stdout unchanged.
pub fn print_raw(data: &[u8]) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(data)?;
    out.flush()
}

fn optional_bytes(size: Option<u64>) -> String {
    size.map(|size| format!("{size} bytes"))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_encode() -> EncodeReport {
        EncodeReport {
            schema_id: EncodeReport::SCHEMA_ID,
            input: "in.bin".to_string(),
            output: "out.png".to_string(),
            profile: "rgb",
            magic: "BMR".to_string(),
            original_size: 10,
            stored_size: 10,
            width: 7,
            height: 1,
            channels: "RGB".to_string(),
        }
    }

    #[test]
    fn encode_lines_match_cli_wording() {
        let lines = sample_encode().lines();
        assert_eq!(lines[0], "[SUCCESS] Encoded 10 bytes into a 7x1 PNG: out.png");
        assert!(lines[1].starts_with("[INFO] Note: This is not compression."));
    }

    #[test]
    fn encode_json_has_schema_id() {
        let json = serde_json::to_value(sample_encode()).unwrap();
        assert_eq!(json["schema_id"], EncodeReport::SCHEMA_ID);
        assert_eq!(json["width"], 7);
    }

    #[test]
    fn inspect_lines_without_header() {
        let report = InspectReport {
            schema_id: InspectReport::SCHEMA_ID,
            input: "x.png".to_string(),
            width: 2,
            height: 2,
            channels: "RGBA".to_string(),
            profile: None,
            magic: None,
            stored_size: None,
            capacity: 8,
        };
        assert_eq!(report.lines()[1], "no bytemap header recognised");
        assert_eq!(report.rows()[4].1, "-");
    }
}
