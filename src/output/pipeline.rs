//! Single-writer stage persisting page records to the output directory

use crate::extract::PageRecord;
use crate::output::index::{IndexEntry, IndexWriter};
use crate::output::naming::{create_unique_file, sanitize_filename, PAGE_EXTENSION};
use crate::output::OutputError;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// What the pipeline did by the time its queue closed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Files written, in completion order
    pub saved: Vec<PathBuf>,

    /// Records dropped because their file could not be written
    pub write_failures: u64,

    /// Saved records whose index line could not be appended
    pub index_failures: u64,
}

impl PipelineReport {
    /// Number of pages saved
    pub fn pages_saved(&self) -> usize {
        self.saved.len()
    }
}

/// Consumes page records and writes them as Markdown files
///
/// Exactly one pipeline owns an output directory. Collision handling relies
/// on that: nothing else creates files there while the pipeline runs.
#[derive(Debug)]
pub struct OutputPipeline {
    output_dir: PathBuf,
    index: Option<IndexWriter>,
    report: PipelineReport,
}

impl OutputPipeline {
    /// Creates a pipeline for an existing output directory
    ///
    /// `index.md` is created immediately. If that fails the pipeline logs a
    /// warning and keeps saving pages without an index.
    pub async fn new(output_dir: PathBuf) -> Self {
        let index = match IndexWriter::create(&output_dir).await {
            Ok(index) => Some(index),
            Err(e) => {
                tracing::warn!(
                    "Failed to create index file in {}: {}",
                    output_dir.display(),
                    e
                );
                None
            }
        };

        Self {
            output_dir,
            index,
            report: PipelineReport::default(),
        }
    }

    /// Spawns the pipeline as its own task reading from `pages`
    ///
    /// The task finishes when every sender of the queue is dropped and the
    /// queue is drained.
    pub fn spawn(
        output_dir: PathBuf,
        pages: mpsc::Receiver<PageRecord>,
    ) -> JoinHandle<PipelineReport> {
        tokio::spawn(async move {
            let pipeline = OutputPipeline::new(output_dir).await;
            pipeline.run(pages).await
        })
    }

    /// Drains the queue, persisting every record
    pub async fn run(mut self, mut pages: mpsc::Receiver<PageRecord>) -> PipelineReport {
        while let Some(record) = pages.recv().await {
            self.handle(record).await;
        }

        tracing::debug!(
            "Output queue closed after {} saved pages",
            self.report.pages_saved()
        );
        self.report
    }

    /// Persists one record and records the outcome, never failing the run
    pub async fn handle(&mut self, record: PageRecord) {
        let path = match self.persist(&record).await {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("Failed to save {}: {}", record.url, e);
                self.report.write_failures += 1;
                return;
            }
        };

        tracing::info!("Saved page to {}", path.display());

        if let Err(e) = self.append_index(&record, &path).await {
            tracing::warn!("Failed to update index for {}: {}", record.url, e);
            self.report.index_failures += 1;
        }

        self.report.saved.push(path);
    }

    /// Writes a record's content to a fresh, uniquely named file
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Write` if the file cannot be created or written.
    pub async fn persist(&self, record: &PageRecord) -> Result<PathBuf, OutputError> {
        let stem = sanitize_filename(&record.title);

        let (path, mut file) = create_unique_file(&self.output_dir, &stem, PAGE_EXTENSION)
            .await
            .map_err(|source| OutputError::Write {
                path: self.output_dir.join(&stem),
                source,
            })?;

        let written = async {
            file.write_all(record.content.as_bytes()).await?;
            file.flush().await
        }
        .await;

        if let Err(source) = written {
            // Do not leave a truncated page behind
            let _ = tokio::fs::remove_file(&path).await;
            return Err(OutputError::Write { path, source });
        }

        Ok(path)
    }

    async fn append_index(&mut self, record: &PageRecord, path: &Path) -> Result<(), OutputError> {
        let Some(index) = self.index.as_mut() else {
            return Ok(());
        };

        let relative = path
            .strip_prefix(&self.output_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();

        let entry = IndexEntry {
            title: record.title.clone(),
            relative_path: relative,
            source_url: record.url.clone(),
        };

        index.append(&entry).await.map_err(OutputError::Index)
    }

    /// Output directory this pipeline writes to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns true if `index.md` is being maintained
    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }
}
