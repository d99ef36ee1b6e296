//! Diagnostics collector.
//!
//! Gathers a point-in-time snapshot of the process environment (working
//! directory listing, parent listing, platform, startup context) for
//! inclusion in tool responses. It runs inside failure paths, so it never
//! fails: anything that cannot be collected is reported as `null`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::core::context::ServerContext;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Snapshot of the process environment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsSnapshot {
    pub current_working_directory: Option<String>,
    pub current_directory_entries: Option<Vec<DirectoryEntry>>,
    pub parent_directory_entries: Option<Vec<DirectoryEntry>>,
    pub platform: String,
    pub credential_provided: bool,
    pub passthrough_parameters: BTreeMap<String, String>,
    pub collected_at: DateTime<Utc>,
}

/// Collect a diagnostics snapshot for the current process.
pub async fn collect_diagnostics(context: &ServerContext) -> DiagnosticsSnapshot {
    let cwd = match std::env::current_dir() {
        Ok(cwd) => Some(cwd),
        Err(e) => {
            debug!("Diagnostics: cannot resolve working directory: {}", e);
            None
        }
    };

    let (current_entries, parent_entries) = match &cwd {
        Some(cwd) => (list_entries(cwd).await, list_entries(&cwd.join("..")).await),
        None => (None, None),
    };

    DiagnosticsSnapshot {
        current_working_directory: cwd.map(|p| p.display().to_string()),
        current_directory_entries: current_entries,
        parent_directory_entries: parent_entries,
        platform: std::env::consts::OS.to_string(),
        credential_provided: context.api_key_provided(),
        passthrough_parameters: context.params().clone(),
        collected_at: Utc::now(),
    }
}

/// List one directory level, sorted by name. `None` if the listing fails.
async fn list_entries(dir: &Path) -> Option<Vec<DirectoryEntry>> {
    let mut read_dir = match tokio::fs::read_dir(dir).await {
        Ok(read_dir) => read_dir,
        Err(e) => {
            debug!("Diagnostics: cannot list {}: {}", dir.display(), e);
            return None;
        }
    };

    let mut entries = Vec::new();
    loop {
        match read_dir.next_entry().await {
            Ok(Some(entry)) => {
                let is_dir = entry
                    .file_type()
                    .await
                    .map(|t| t.is_dir())
                    .unwrap_or(false);
                entries.push(DirectoryEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    kind: if is_dir {
                        EntryKind::Directory
                    } else {
                        EntryKind::File
                    },
                });
            }
            Ok(None) => break,
            Err(e) => {
                // Keep what was listed so far.
                debug!("Diagnostics: listing {} interrupted: {}", dir.display(), e);
                break;
            }
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Some(entries)
}
