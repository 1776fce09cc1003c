//! FILENAME: export/src/error.rs

use thiserror::Error;

/// Failure of the repository boundary. The export surface folds this
/// into `ExportError::DataUnavailable`; persistence problems are never
/// core-internal errors.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("report not found: {0}")]
    ReportNotFound(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Export-surface failures, split so the caller can present different
/// user-facing messages for each.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The repository could not supply the report's data.
    #[error("report data unavailable: {0}")]
    DataUnavailable(#[from] RepositoryError),

    /// Entries exist but not one of them resolves in the current
    /// taxonomy version.
    #[error("no entry matches taxonomy version {version}: all {orphan_count} entries orphaned")]
    TaxonomyMismatch {
        version: String,
        orphan_count: usize,
    },

    /// The rendering backend failed while producing the document.
    #[error("export failed: {0}")]
    ExportFailed(String),
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::ExportFailed(err.to_string())
    }
}

impl From<printpdf::Error> for ExportError {
    fn from(err: printpdf::Error) -> Self {
        ExportError::ExportFailed(err.to_string())
    }
}
