// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for tracker events

use clap::ValueEnum;
use hcitrack_core::Event;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render an event as one line, or `None` if the format skips it
pub fn render(event: &Event, format: OutputFormat) -> Option<String> {
    match format {
        OutputFormat::Text => render_text(event),
        OutputFormat::Json => serde_json::to_string(event).ok(),
    }
}

/// Print an event in the specified format
pub fn print(event: &Event, format: OutputFormat) {
    if let Some(line) = render(event, format) {
        println!("{}", line);
    }
}

fn render_text(event: &Event) -> Option<String> {
    let line = match event {
        Event::Started { kind, id, run_id } => {
            format!("{} {}: started (run {})", kind.label(), id, run_id)
        }
        Event::Progress { kind, id, progress } => {
            format!("{} {}: {:.0}%", kind.label(), id, progress * 100.0)
        }
        Event::Ready { kind, id } => format!("{} {}: ready", kind.label(), id),
        Event::Completed { kind, id } => format!("{} {}: completed", kind.label(), id),
        Event::Failed {
            kind, id, message, ..
        } => format!("{} {}: failed: {}", kind.label(), id, message),
        Event::Cancelled { kind, id } => format!("{} {}: cancelled", kind.label(), id),
        Event::DialogClosed { .. } => return None,
    };
    Some(line)
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
