//! Error types for storage operations

use thiserror::Error;

/// Storage error type
#[derive(Debug, Error)]
pub enum StorageError {
	#[error("Item not found: {id}")]
	NotFound { id: String },
	#[error("Duplicate entry: {key}")]
	Duplicate { key: String },
	#[error("Connection error: {message}")]
	Connection { message: String },
	#[error("Serialization error: {message}")]
	Serialization { message: String },
	#[error("Storage operation failed: {message}")]
	Operation { message: String },
}

impl StorageError {
	/// Whether this error only reports that the row already exists
	pub fn is_duplicate(&self) -> bool {
		matches!(self, StorageError::Duplicate { .. })
	}
}
