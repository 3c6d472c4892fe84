//! Report downloads
//!
//! The API renders audience-specific PDF reports at `/report/{kind}`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use reqwest::header::CONTENT_DISPOSITION;

use super::error::{api_error_message, FetchError, ReportError};
use super::source::ApiClient;

/// Which report to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Investor,
    Regulator,
    /// Static PDF for checking delivery end to end
    Test,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Investor => "investor",
            ReportKind::Regulator => "regulator",
            ReportKind::Test => "test",
        }
    }

    pub fn path(&self) -> String {
        format!("/report/{}", self.as_str())
    }

    /// Filename used when the server does not name the attachment
    pub fn default_filename(&self) -> &'static str {
        match self {
            ReportKind::Investor => "investor_report.pdf",
            ReportKind::Regulator => "regulator_report.pdf",
            ReportKind::Test => "test.pdf",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "investor" | "investors" => Ok(ReportKind::Investor),
            "regulator" | "regulators" => Ok(ReportKind::Regulator),
            "test" => Ok(ReportKind::Test),
            other => Err(format!(
                "Unknown report kind: {}. Use: investor, regulator, test",
                other
            )),
        }
    }
}

/// A downloaded report
#[derive(Debug, Clone)]
pub struct Report {
    pub kind: ReportKind,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Report {
    /// Write the report into `dir` under its filename
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

impl ApiClient {
    /// Download a generated report.
    ///
    /// The server may take a while to render reports; the configured
    /// request timeout applies.
    pub async fn download_report(&self, kind: ReportKind) -> Result<Report, ReportError> {
        let url = self.url(&kind.path());
        tracing::debug!(url = %url, "Downloading report");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(FetchError::from)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: api_error_message(&text),
            }
            .into());
        }

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_filename)
            .unwrap_or_else(|| kind.default_filename().to_string());

        let bytes = response.bytes().await.map_err(FetchError::from)?;
        if bytes.is_empty() {
            return Err(ReportError::Empty);
        }

        tracing::info!(kind = %kind, filename = %filename, size = bytes.len(), "Report downloaded");

        Ok(Report {
            kind,
            filename,
            bytes: bytes.to_vec(),
        })
    }
}

/// Filename from a `Content-Disposition` header, reduced to its final
/// path component.
fn attachment_filename(header: &str) -> Option<String> {
    let raw = header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))?
        .trim_matches('"');

    Path::new(raw)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
