//! Shared types returned by the listing commands.
//!
//! These are serialized to JSON for the remote caller and are the agent's
//! only contract with it: field names follow the wire format, not Rust style.

use crate::imaging::{DimensionHypothesis, GeometryRule};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Directory,
}

/// Metadata for one file or directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileEntry {
    pub name: String,
    /// Absolute path
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub size: u64,
    /// Seconds since the Unix epoch
    pub modified: f64,
    /// `ls -l` style mode string, e.g. `-rw-r--r--`
    pub permissions: String,
    /// Lower-case with leading dot; files only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_image: Option<bool>,
    /// Geometry hypothesis; `.raw` files only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_info: Option<RawAnalysis>,
}

impl FileEntry {
    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }
}

/// One row of a listing: either full metadata or the reason it was unreadable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListedItem {
    Entry(FileEntry),
    Unreadable {
        name: String,
        path: String,
        error: String,
    },
}

impl ListedItem {
    pub fn name(&self) -> &str {
        match self {
            ListedItem::Entry(e) => &e.name,
            ListedItem::Unreadable { name, .. } => name,
        }
    }

    pub fn entry(&self) -> Option<&FileEntry> {
        match self {
            ListedItem::Entry(e) => Some(e),
            ListedItem::Unreadable { .. } => None,
        }
    }

    fn is_dir(&self) -> bool {
        self.entry().is_some_and(FileEntry::is_dir)
    }

    /// Directories first, then case-insensitive name.
    pub fn sort_key(&self) -> (bool, String) {
        (!self.is_dir(), self.name().to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryListing {
    /// Absolute directory path
    pub path: String,
    pub items: Vec<ListedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageListing {
    pub path: String,
    pub images: Vec<FileEntry>,
}

/// Geometry hypothesis for a `.raw` file, computed from its size alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawAnalysis {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub sample_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<GeometryRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<DimensionHypothesis> for RawAnalysis {
    fn from(hypothesis: DimensionHypothesis) -> Self {
        match hypothesis {
            DimensionHypothesis::Resolved {
                width,
                height,
                rule,
            } => RawAnalysis {
                valid: true,
                width: Some(width),
                height: Some(height),
                sample_type: Some("grayscale"),
                rule: Some(rule),
                reason: None,
            },
            DimensionHypothesis::Unresolved { reason } => RawAnalysis {
                valid: false,
                width: None,
                height: None,
                sample_type: None,
                rule: None,
                reason: Some(reason),
            },
        }
    }
}
