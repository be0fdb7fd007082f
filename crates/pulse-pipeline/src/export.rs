//! Flat-file artifacts of the latest run: `reviews.csv` and `pulse.md`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use pulse_core::{PulseReport, Review};
use tokio::sync::Mutex;

use crate::error::ExportError;

pub const REVIEWS_FILE: &str = "reviews.csv";
pub const PULSE_FILE: &str = "pulse.md";

/// Where a finished export landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub reviews_csv: PathBuf,
    pub pulse_md: PathBuf,
}

/// Writes run artifacts into one directory.
///
/// Concurrent runs are serialized through an internal lock and every file is
/// written to a temporary sibling and renamed into place, so readers never
/// observe a half-written artifact.
#[derive(Debug)]
pub struct Exporter {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl Exporter {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    /// Write both artifacts, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] naming the path that could not be written.
    pub async fn export(
        &self,
        reviews: &[Review],
        report: &PulseReport,
    ) -> Result<ExportPaths, ExportError> {
        let _guard = self.lock.lock().await;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ExportError::Io {
                path: self.dir.display().to_string(),
                source,
            })?;

        let csv_path = self.dir.join(REVIEWS_FILE);
        let md_path = self.dir.join(PULSE_FILE);
        write_atomic(&csv_path, reviews_csv(reviews).as_bytes()).await?;
        write_atomic(&md_path, report.markdown_report.as_bytes()).await?;

        tracing::info!(
            dir = %self.dir.display(),
            reviews = reviews.len(),
            "exported run artifacts"
        );
        Ok(ExportPaths {
            reviews_csv: csv_path,
            pulse_md: md_path,
        })
    }
}

async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ExportError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    tokio::fs::write(&tmp, contents)
        .await
        .map_err(|source| ExportError::Io {
            path: tmp.display().to_string(),
            source,
        })?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|source| ExportError::Io {
            path: path.display().to_string(),
            source,
        })?;
    Ok(())
}

/// CSV with header `id,date,source,score,title,text`.
///
/// Every value is double-quoted, embedded quotes are doubled, and line
/// breaks inside a value are flattened to spaces so each review is one line.
#[must_use]
pub fn reviews_csv(reviews: &[Review]) -> String {
    let mut csv = String::from("id,date,source,score,title,text\n");
    for review in reviews {
        let date = review.date.to_rfc3339_opts(SecondsFormat::Secs, true);
        let score = review.score.to_string();
        let fields = [
            review.id.as_str(),
            date.as_str(),
            review.source.as_str(),
            score.as_str(),
            review.title.as_deref().unwrap_or(""),
            review.text.as_str(),
        ];
        let line = fields
            .iter()
            .map(|field| quote_field(field))
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(csv, "{line}");
    }
    csv
}

fn quote_field(value: &str) -> String {
    let flattened = value.replace("\r\n", " ").replace(['\r', '\n'], " ");
    format!("\"{}\"", flattened.replace('"', "\"\""))
}
