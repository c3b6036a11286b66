//! Output format enums.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Report rendering format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable Markdown report.
    #[default]
    Markdown,
    /// Compact JSON report.
    Json,
}

impl OutputFormat {
    /// True for the Markdown format.
    #[must_use]
    pub const fn is_markdown(self) -> bool {
        matches!(self, Self::Markdown)
    }

    /// True for the JSON format.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Reference export format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// BibTeX entries.
    #[default]
    Bibtex,
    /// RIS records.
    Ris,
    /// Comma-separated values with a header row.
    Csv,
}

impl ExportFormat {
    /// Conventional file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Bibtex => "bib",
            Self::Ris => "ris",
            Self::Csv => "csv",
        }
    }

    /// MIME type for the exported content.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Bibtex => "application/x-bibtex",
            Self::Ris => "application/x-research-info-systems",
            Self::Csv => "text/csv",
        }
    }
}
