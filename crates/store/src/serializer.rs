//! Document serialization

use crate::{DocumentFile, Result, StoreError};
use doc_model::DocumentTree;

/// Serialize a document tree to JSON
pub fn serialize(tree: &DocumentTree) -> Result<String> {
    let file = DocumentFile::new(tree.clone());
    let json = serde_json::to_string_pretty(&file)?;
    Ok(json)
}

/// Deserialize a document tree from JSON
pub fn deserialize(json: &str) -> Result<DocumentTree> {
    let file: DocumentFile = serde_json::from_str(json)?;

    if !file.header.is_valid() {
        return Err(StoreError::InvalidFormat(format!(
            "Invalid or unsupported format version: {}",
            file.header.version
        )));
    }

    Ok(file.document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_keeps_text_and_positions() {
        let tree = DocumentTree::from_plain_text("first line\nsecond line");
        let json = serialize(&tree).unwrap();
        let loaded = deserialize(&json).unwrap();

        assert_eq!(tree.root_id(), loaded.root_id());
        assert_eq!(loaded.to_plain_text(), "first line\nsecond line");
        assert_eq!(loaded.content_size(), tree.content_size());
    }

    #[test]
    fn test_rejects_foreign_magic() {
        let tree = DocumentTree::with_empty_paragraph();
        let json = serialize(&tree).unwrap().replace("FINDBAR-DOC", "OTHER");
        assert!(matches!(deserialize(&json), Err(StoreError::InvalidFormat(_))));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(deserialize("[]"), Err(StoreError::Serialization(_))));
    }
}
