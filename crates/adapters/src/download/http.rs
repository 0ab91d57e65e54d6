// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Downloader that streams artifacts to a local directory
//!
//! The artifact only appears under its final name once fully written.

use super::{DownloadAdapter, DownloadError};
use async_trait::async_trait;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

#[derive(Clone)]
pub struct HttpDownloader {
    agent: ureq::Agent,
    output_dir: PathBuf,
}

impl HttpDownloader {
    pub fn new(output_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Resolve the target path, refusing names that would leave the output directory
    pub(crate) fn target_path(&self, file_name: &str) -> Result<PathBuf, DownloadError> {
        let invalid = file_name.is_empty()
            || file_name == "."
            || file_name == ".."
            || file_name.contains(['/', '\\']);
        if invalid {
            return Err(DownloadError::InvalidFileName(file_name.to_string()));
        }
        Ok(self.output_dir.join(file_name))
    }
}

#[async_trait]
impl DownloadAdapter for HttpDownloader {
    async fn download(&self, url: &str, file_name: &str) -> Result<(), DownloadError> {
        let path = self.target_path(file_name)?;
        let agent = self.agent.clone();
        let url = url.to_string();

        tokio::task::spawn_blocking(move || {
            let mut response = agent
                .get(&url)
                .call()
                .map_err(|e| DownloadError::Request(e.to_string()))?;

            // Stream into a sibling temp file; it is removed on drop unless
            // the whole body made it to disk
            let write_err = |e: &dyn std::fmt::Display| {
                DownloadError::Write(format!("{}: {}", path.display(), e))
            };
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let partial = NamedTempFile::new_in(dir).map_err(|e| write_err(&e))?;

            let mut writer = BufWriter::new(partial);
            let mut reader = response.body_mut().as_reader();
            std::io::copy(&mut reader, &mut writer).map_err(|e| write_err(&e))?;
            let partial = writer
                .into_inner()
                .map_err(|e| write_err(&e.into_error()))?;
            partial.persist(&path).map_err(|e| write_err(&e.error))?;
            Ok(())
        })
        .await
        .map_err(|e| DownloadError::Request(format!("download task failed: {}", e)))?
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
