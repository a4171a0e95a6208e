//! Import and export of the whole board as a JSON array of note records.

use std::collections::HashSet;
use std::path::Path;

use canvas::doc::{NoteId, NoteRecord};

use super::repository::{NoteRepository, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid board document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("duplicate note id {0}")]
    DuplicateId(NoteId),
}

/// Pretty-printed JSON array of records.
///
/// # Errors
///
/// Returns [`TransferError::Parse`] if a record can't be encoded.
pub fn export_document(records: &[NoteRecord]) -> Result<String, TransferError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Parse a whole document. Nothing is returned unless every record is valid
/// and every id is unique.
///
/// # Errors
///
/// Returns [`TransferError::Parse`] or [`TransferError::DuplicateId`].
pub fn parse_document(raw: &str) -> Result<Vec<NoteRecord>, TransferError> {
    let records: Vec<NoteRecord> = serde_json::from_str(raw)?;
    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !seen.insert(record.id) {
            return Err(TransferError::DuplicateId(record.id));
        }
    }
    Ok(records)
}

/// Write the records to `path`.
///
/// # Errors
///
/// Returns a [`TransferError`] if encoding or the write fails.
pub async fn export_to(path: &Path, records: &[NoteRecord]) -> Result<(), TransferError> {
    let doc = export_document(records)?;
    tokio::fs::write(path, doc).await?;
    Ok(())
}

/// Read `path` and replace the stored collection with its records.
///
/// The store is only touched once the whole file has parsed.
///
/// # Errors
///
/// Returns a [`TransferError`]; on error the store is unchanged.
pub async fn import_from(path: &Path, repo: &dyn NoteRepository) -> Result<Vec<NoteRecord>, TransferError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let records = parse_document(&raw)?;
    repo.replace_all(&records).await?;
    Ok(records)
}

#[cfg(test)]
#[path = "transfer_test.rs"]
mod tests;
