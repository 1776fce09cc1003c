//! FILENAME: export/src/lib.rs
//! Export surface for the employment-statistics report engine.
//!
//! Three entry points over one report id: "render HTML preview",
//! "export PDF", "export Excel". Each loads the report through the
//! `EntryRepository` boundary, derives the single canonical row
//! sequence, and hands that SAME sequence to its renderer - no surface
//! ever re-derives values from raw entries, which is what keeps the
//! three outputs in agreement.
//!
//! Orphaned entries (paths that no longer resolve in the current
//! taxonomy version) are diagnostics: logged, returned alongside the
//! output, and only escalated to an error when every entry orphans.

mod error;
mod html;
mod pdf;
mod repository;
mod xlsx;

pub use error::{ExportError, RepositoryError};
pub use html::render_html;
pub use pdf::layout::{paginate, PageGeometry, PageLayout, PlacedRow};
pub use pdf::render_pdf;
pub use repository::{EntryRepository, InMemoryRepository};
pub use xlsx::render_xlsx;

use serde::Serialize;

use report_engine::{sequence_rows, DisplayRow, Report, ReportEntry, ReportMeta, RowSet};
use taxonomy::TaxonomyRegistry;

// ============================================================================
// RESULTS
// ============================================================================

/// Output of the HTML preview entry point. Serializable so the portal
/// can send it to the browser as-is.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlPreview {
    pub html: String,
    /// The canonical row sequence the markup was rendered from.
    pub rows: Vec<DisplayRow>,
    pub orphaned: Vec<ReportEntry>,
}

/// Output of a file export entry point.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub orphaned: Vec<ReportEntry>,
}

// ============================================================================
// SERVICE
// ============================================================================

/// The export trigger surface bound to one taxonomy version and one
/// repository. Stateless across calls; every render is a pure function
/// of the loaded report.
pub struct ExportService<'a> {
    registry: &'a TaxonomyRegistry,
    repository: &'a dyn EntryRepository,
}

impl<'a> ExportService<'a> {
    pub fn new(registry: &'a TaxonomyRegistry, repository: &'a dyn EntryRepository) -> Self {
        ExportService {
            registry,
            repository,
        }
    }

    /// Renders the DOM-ready preview table.
    pub fn render_html_preview(&self, report_id: &str) -> Result<HtmlPreview, ExportError> {
        let (meta, row_set) = self.load(report_id)?;
        let html = html::render_html(&meta, &row_set.rows);
        Ok(HtmlPreview {
            html,
            rows: row_set.rows,
            orphaned: row_set.orphaned,
        })
    }

    /// Exports the paginated PDF as `<office>-<period>-<date>.pdf`.
    pub fn export_pdf(&self, report_id: &str) -> Result<ExportFile, ExportError> {
        let (meta, row_set) = self.load(report_id)?;
        let bytes = pdf::render_pdf(&meta, &row_set.rows)?;
        let filename = format!(
            "{}-{}-{}.pdf",
            filename_component(&meta.reporting_office),
            filename_component(&meta.reporting_period),
            chrono::Local::now().format("%Y-%m-%d"),
        );
        Ok(ExportFile {
            filename,
            bytes,
            orphaned: row_set.orphaned,
        })
    }

    /// Exports the workbook as `<period>-report.xlsx`.
    pub fn export_xlsx(&self, report_id: &str) -> Result<ExportFile, ExportError> {
        let (meta, row_set) = self.load(report_id)?;
        let bytes = xlsx::render_xlsx(&meta, &row_set.rows)?;
        let filename = format!("{}-report.xlsx", filename_component(&meta.reporting_period));
        Ok(ExportFile {
            filename,
            bytes,
            orphaned: row_set.orphaned,
        })
    }

    fn load(&self, report_id: &str) -> Result<(ReportMeta, RowSet), ExportError> {
        let meta = self.repository.fetch_report_meta(report_id)?;
        let entries = self.repository.fetch_entries(report_id)?;
        let entry_count = entries.len();

        let report = Report {
            reporting_period: meta.reporting_period.clone(),
            reporting_office: meta.reporting_office.clone(),
            entries,
        };
        let row_set = sequence_rows(self.registry, &report);

        if entry_count > 0 && row_set.orphan_count() == entry_count {
            return Err(ExportError::TaxonomyMismatch {
                version: self.registry.version().to_string(),
                orphan_count: entry_count,
            });
        }
        if row_set.orphan_count() > 0 {
            log::warn!(
                "report {}: {} of {} entries do not resolve in taxonomy {}",
                report_id,
                row_set.orphan_count(),
                entry_count,
                self.registry.version()
            );
        }
        Ok((meta, row_set))
    }
}

/// Filesystem-safe filename fragment: lowercase alphanumerics joined by
/// single dashes. Text with no usable characters falls back to a fixed
/// placeholder so no filename piece ever comes out empty.
fn filename_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() {
        out.push_str("report");
    }
    out
}
