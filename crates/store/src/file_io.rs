//! File I/O operations

use crate::{Result, StoreError};
use doc_model::DocumentTree;
use std::path::Path;

/// Save a document to a file
pub async fn save_document(tree: &DocumentTree, path: impl AsRef<Path>) -> Result<()> {
    let json = crate::serialize(tree)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Load a document from a file
pub async fn load_document(path: impl AsRef<Path>) -> Result<DocumentTree> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(StoreError::FileNotFound(path.display().to_string()));
    }

    let json = tokio::fs::read_to_string(path).await?;
    crate::deserialize(&json)
}

/// Save a document synchronously
pub fn save_document_sync(tree: &DocumentTree, path: impl AsRef<Path>) -> Result<()> {
    let json = crate::serialize(tree)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a document synchronously
pub fn load_document_sync(path: impl AsRef<Path>) -> Result<DocumentTree> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(StoreError::FileNotFound(path.display().to_string()));
    }

    let json = std::fs::read_to_string(path)?;
    crate::deserialize(&json)
}

/// Build a document from a plain text file, one paragraph per line
pub fn import_plain_text(path: impl AsRef<Path>) -> Result<DocumentTree> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(StoreError::FileNotFound(path.display().to_string()));
    }

    let text = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), lines = text.lines().count(), "imported plain text");
    Ok(DocumentTree::from_plain_text(&text))
}

/// Load `.txt` files as plain text, anything else as a document file
pub fn open_document(path: impl AsRef<Path>) -> Result<DocumentTree> {
    let path = path.as_ref();
    let is_text = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));

    if is_text {
        import_plain_text(path)
    } else {
        load_document_sync(path)
    }
}
