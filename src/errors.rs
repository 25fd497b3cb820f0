//! Unified error type for the inventory store, its adapters and the CLI.

use thiserror::Error;

/// Every failure the crate can surface.
///
/// `Validation`, `NotFound` and `Format` are user-correctable; the rest are
/// infrastructure failures that should be reported, not retried.
#[derive(Debug, Error)]
pub enum Error {
    /// A field value broke a product invariant (empty name, negative quantity, duplicate id...)
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// Human-readable reason
        message: String,
    },

    /// No product with the given id exists in the store
    #[error("Product '{id}' not found")]
    NotFound {
        /// The id that was looked up
        id: String,
    },

    /// An import file is malformed as a whole (missing columns, empty file)
    #[error("Malformed import file: {message}")]
    Format {
        /// What was wrong with the file
        message: String,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Details of the configuration failure
        message: String,
    },

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding failed outside of a single row
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A workbook could not be opened or decoded
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// Writing an `.xlsx` workbook failed
    #[error("Excel export error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] on `field`.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`] on `id`.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Shorthand for a [`Error::Format`].
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// True when the user can fix the problem by changing their input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::NotFound { .. } | Self::Format { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
