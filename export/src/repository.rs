//! FILENAME: export/src/repository.rs
//! Entry repository boundary.
//!
//! The export surface treats persistence purely as a data source behind
//! this trait. Real deployments bind it to the portal's storage layer;
//! `InMemoryRepository` serves tests and embedding.

use std::collections::HashMap;

use report_engine::{ReportEntry, ReportMeta};

use crate::error::RepositoryError;

/// Supplies one report's stored entries and identifying metadata.
pub trait EntryRepository {
    fn fetch_entries(&self, report_id: &str) -> Result<Vec<ReportEntry>, RepositoryError>;
    fn fetch_report_meta(&self, report_id: &str) -> Result<ReportMeta, RepositoryError>;
}

/// Map-backed repository for tests and in-process embedding.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    reports: HashMap<String, (ReportMeta, Vec<ReportEntry>)>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        InMemoryRepository::default()
    }

    pub fn insert(
        &mut self,
        report_id: impl Into<String>,
        meta: ReportMeta,
        entries: Vec<ReportEntry>,
    ) {
        self.reports.insert(report_id.into(), (meta, entries));
    }
}

impl EntryRepository for InMemoryRepository {
    fn fetch_entries(&self, report_id: &str) -> Result<Vec<ReportEntry>, RepositoryError> {
        self.reports
            .get(report_id)
            .map(|(_, entries)| entries.clone())
            .ok_or_else(|| RepositoryError::ReportNotFound(report_id.to_string()))
    }

    fn fetch_report_meta(&self, report_id: &str) -> Result<ReportMeta, RepositoryError> {
        self.reports
            .get(report_id)
            .map(|(meta, _)| meta.clone())
            .ok_or_else(|| RepositoryError::ReportNotFound(report_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_meta() -> ReportMeta {
        ReportMeta {
            reporting_period: "January 2024".to_string(),
            reporting_office: "Provincial Office".to_string(),
            preparer_name: "A. Preparer".to_string(),
            approver_name: "B. Approver".to_string(),
        }
    }

    #[test]
    fn test_fetch_known_report() {
        let mut repo = InMemoryRepository::new();
        repo.insert(
            "r-1",
            create_test_meta(),
            vec![ReportEntry::new("JOB_VACANCIES", "SPES", None, None)],
        );
        assert_eq!(repo.fetch_entries("r-1").unwrap().len(), 1);
        assert_eq!(
            repo.fetch_report_meta("r-1").unwrap().reporting_office,
            "Provincial Office"
        );
    }

    #[test]
    fn test_fetch_missing_report_fails() {
        let repo = InMemoryRepository::new();
        assert!(matches!(
            repo.fetch_entries("nope"),
            Err(RepositoryError::ReportNotFound(_))
        ));
    }
}
