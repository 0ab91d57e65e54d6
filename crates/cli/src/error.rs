// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Each error carries:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use hcitrack_adapters::StoreError;
use hcitrack_core::{ConfigError, ResourceIdError};
use hcitrack_engine::TrackerError;
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set the source error that caused this error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Common error builders for typical failure scenarios.
impl CliError {
    /// The resource argument is not `<namespace>/<name>`.
    pub fn invalid_id(raw: &str, source: ResourceIdError) -> Self {
        CliError::new(format!("'{}' is not a resource reference", raw))
            .with_context("Resources are addressed as <namespace>/<name>")
            .with_suggestion("Example: hcitrack bundle harvester-system/bundle-abc12")
            .with_source(source)
    }

    /// No server was given.
    pub fn missing_server() -> Self {
        CliError::new("no server given")
            .with_suggestion("Pass the API origin: hcitrack --server https://harvester.example.com ...")
    }

    /// The config file could not be used.
    pub fn config(path: &Path, source: ConfigError) -> Self {
        CliError::new(format!("cannot use config file {}", path.display()))
            .with_context(source.to_string())
            .with_suggestion("Durations are written like \"1s\" or \"600ms\"")
            .with_suggestion("Run without --config to use the defaults")
            .with_source(source)
    }

    /// Starting the tracker failed.
    pub fn start(source: TrackerError) -> Self {
        let err = match &source {
            TrackerError::InvalidReference { kind, id } => {
                CliError::new(format!("{} {} not found", kind, id))
                    .with_context("The backend has no resource with that namespace and name")
                    .with_suggestion("Check the namespace and name, then try again")
            }
            TrackerError::AlreadyInProgress(kind) => {
                CliError::new(format!("a {} operation is already being tracked", kind))
                    .with_suggestion("Wait for it to finish or cancel it with Ctrl-C")
            }
            TrackerError::Store(StoreError::Transport(msg)) => {
                CliError::new("cannot reach the server")
                    .with_context(msg.clone())
                    .with_suggestion("Check --server and your network connection")
            }
            other => CliError::new(other.to_string()),
        };
        err.with_source(source)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
