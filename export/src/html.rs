//! FILENAME: export/src/html.rs
//! HTML table renderer.
//!
//! Consumes the shared display-row sequence unmodified and renders a
//! deterministic, asset-free table: `level` becomes a padding step,
//! total rows get a highlight class, and the female figure is a
//! visually distinct second line inside the same cell. All dynamic text
//! is escaped; values come only from the rows, never from raw entries.

use std::fmt::Write as _;

use report_engine::{DisplayRow, ReportMeta, RowKind};

/// Horizontal indent per taxonomy level, in pixels.
const INDENT_STEP_PX: u8 = 18;

/// Renders the preview table for one report.
pub fn render_html(meta: &ReportMeta, rows: &[DisplayRow]) -> String {
    let mut buf = String::with_capacity(16 * 1024);

    let _ = write!(
        buf,
        "<div class=\"report-preview\">\
         <style>\
         .report-preview table{{border-collapse:collapse;width:100%}}\
         .report-preview td,.report-preview th{{padding:4px 8px;border-bottom:1px solid #ddd;text-align:left}}\
         .report-preview td.num{{text-align:right;white-space:nowrap}}\
         .report-preview tr.row-section td{{font-weight:bold;background:#f0f0f0}}\
         .report-preview tr.row-total td{{font-weight:bold;background:#fff3cd}}\
         .report-preview .female{{display:block;font-size:0.85em;color:#b0367a}}\
         </style>\
         <h2>{}</h2><p class=\"period\">Reporting period: {}</p>",
        esc(&meta.reporting_office),
        esc(&meta.reporting_period),
    );

    buf.push_str(
        "<table class=\"indicator-table\"><thead><tr>\
         <th>Program / Indicator</th><th>Previous period</th><th>Current period</th>\
         </tr></thead><tbody>",
    );

    for row in rows {
        push_row(&mut buf, row);
    }

    let _ = write!(
        buf,
        "</tbody></table>\
         <p class=\"signatures\">Prepared by: {} &mdash; Approved by: {}</p>\
         </div>",
        esc(&meta.preparer_name),
        esc(&meta.approver_name),
    );

    buf
}

fn push_row(buf: &mut String, row: &DisplayRow) {
    match row.kind {
        RowKind::Section => {
            let _ = write!(
                buf,
                "<tr class=\"row-section\"><td colspan=\"3\">{}</td></tr>",
                esc(&row.label)
            );
        }
        RowKind::Category | RowKind::Total => {
            let class = if row.kind == RowKind::Total {
                "row-total"
            } else {
                "row-category"
            };
            let indent = u32::from(row.level) * u32::from(INDENT_STEP_PX);
            let _ = write!(
                buf,
                "<tr class=\"{}\"><td style=\"padding-left:{}px\">{}</td>",
                class,
                indent,
                esc(&row.label)
            );
            push_value_cell(buf, row.previous_total, row.previous_female);
            push_value_cell(buf, row.current_total, row.current_female);
            buf.push_str("</tr>");
        }
    }
}

/// One numeric cell; the female figure renders as a second line inside
/// the same cell, never as a separate table row.
fn push_value_cell(buf: &mut String, total: u64, female: Option<u64>) {
    let _ = write!(buf, "<td class=\"num\">{}", total);
    if let Some(female) = female {
        let _ = write!(buf, "<span class=\"female\">Female: {}</span>", female);
    }
    buf.push_str("</td>");
}

/// Escape text for HTML (minimal, deterministic).
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}
