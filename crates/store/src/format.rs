//! Document file format

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File format version
pub const FORMAT_VERSION: u32 = 1;

/// File extension for the document format
pub const FILE_EXTENSION: &str = "fbj";

/// File header for format identification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileHeader {
    /// Magic string for format identification
    pub magic: String,
    /// Format version
    pub version: u32,
    /// Document ID
    pub document_id: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl FileHeader {
    pub const MAGIC: &'static str = "FINDBAR-DOC";

    pub fn new(document_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            magic: Self::MAGIC.to_string(),
            version: FORMAT_VERSION,
            document_id: document_id.into(),
            created: now,
            modified: now,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.magic == Self::MAGIC && self.version <= FORMAT_VERSION
    }

    /// Mark the header as modified now
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}

/// Complete file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFile {
    pub header: FileHeader,
    pub document: doc_model::DocumentTree,
}

impl DocumentFile {
    pub fn new(document: doc_model::DocumentTree) -> Self {
        Self {
            header: FileHeader::new(document.root_id().to_string()),
            document,
        }
    }
}
