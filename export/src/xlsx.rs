//! FILENAME: export/src/xlsx.rs
//! Excel workbook renderer.
//!
//! One worksheet row per display row, in exactly the sequence the Row
//! Sequencer produced, between a fixed merged-cell header block (office,
//! period, instructions banner) and a signature block. Column widths and
//! merge regions are static; nothing depends on report content except
//! the data rows themselves.

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook};

use report_engine::{DisplayRow, ReportMeta, RowKind};

use crate::error::ExportError;

const SHEET_NAME: &str = "Report";

const COL_LABEL: u16 = 0;
const COL_PREVIOUS: u16 = 1;
const COL_CURRENT: u16 = 2;
const LAST_COL: u16 = COL_CURRENT;

/// First worksheet row holding report data (0-based).
pub const DATA_START_ROW: u32 = 5;

const INSTRUCTIONS_BANNER: &str =
    "Report all figures for the reporting period only. Female counts are a subset of the \
     category figure and are reported in parallel, never deducted.";

/// Renders the full workbook to an in-memory `.xlsx` byte stream.
pub fn render_xlsx(meta: &ReportMeta, rows: &[DisplayRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    worksheet.set_column_width(COL_LABEL, 58.0)?;
    worksheet.set_column_width(COL_PREVIOUS, 17.0)?;
    worksheet.set_column_width(COL_CURRENT, 17.0)?;

    write_header_block(worksheet, meta)?;

    let formats = RowFormats::new();
    let mut row_index = DATA_START_ROW;
    for row in rows {
        write_display_row(worksheet, row_index, row, &formats)?;
        row_index += 1;
    }

    write_signature_block(worksheet, row_index + 1, meta)?;

    Ok(workbook.save_to_buffer()?)
}

// ============================================================================
// FIXED BLOCKS
// ============================================================================

fn write_header_block(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    meta: &ReportMeta,
) -> Result<(), ExportError> {
    let office = Format::new()
        .set_bold()
        .set_font_size(14.0)
        .set_align(FormatAlign::Center);
    let period = Format::new().set_align(FormatAlign::Center);
    let banner = Format::new()
        .set_italic()
        .set_text_wrap()
        .set_align(FormatAlign::Center)
        .set_font_size(9.0);
    let column_header = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_background_color(Color::RGB(0xD9E1F2));

    worksheet.merge_range(0, COL_LABEL, 0, LAST_COL, &meta.reporting_office, &office)?;
    worksheet.merge_range(
        1,
        COL_LABEL,
        1,
        LAST_COL,
        &format!("Reporting period: {}", meta.reporting_period),
        &period,
    )?;
    worksheet.merge_range(2, COL_LABEL, 2, LAST_COL, INSTRUCTIONS_BANNER, &banner)?;
    worksheet.set_row_height(2, 28.0)?;

    worksheet.write_string_with_format(4, COL_LABEL, "PROGRAM / INDICATOR", &column_header)?;
    worksheet.write_string_with_format(4, COL_PREVIOUS, "PREVIOUS PERIOD", &column_header)?;
    worksheet.write_string_with_format(4, COL_CURRENT, "CURRENT PERIOD", &column_header)?;
    Ok(())
}

fn write_signature_block(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    start_row: u32,
    meta: &ReportMeta,
) -> Result<(), ExportError> {
    let caption = Format::new().set_italic();
    let name = Format::new().set_bold();

    worksheet.write_string_with_format(start_row, COL_LABEL, "Prepared by:", &caption)?;
    worksheet.write_string_with_format(start_row + 1, COL_LABEL, &meta.preparer_name, &name)?;
    worksheet.write_string_with_format(start_row, COL_CURRENT, "Approved by:", &caption)?;
    worksheet.write_string_with_format(start_row + 1, COL_CURRENT, &meta.approver_name, &name)?;
    Ok(())
}

// ============================================================================
// DATA ROWS
// ============================================================================

/// Cell formats shared across data rows, one per concern.
struct RowFormats {
    section: Format,
    total_label: Format,
    total_value: Format,
    value: Format,
    value_with_female: Format,
    labels_by_level: Vec<Format>,
}

impl RowFormats {
    fn new() -> Self {
        let labels_by_level = (0u8..4)
            .map(|level| Format::new().set_indent(level))
            .collect();
        RowFormats {
            section: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(0xF0F0F0)),
            total_label: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(0xFFF3CD)),
            total_value: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(0xFFF3CD))
                .set_num_format("#,##0"),
            value: Format::new().set_num_format("#,##0"),
            value_with_female: Format::new()
                .set_text_wrap()
                .set_align(FormatAlign::Right),
            labels_by_level,
        }
    }
}

fn write_display_row(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row_index: u32,
    row: &DisplayRow,
    formats: &RowFormats,
) -> Result<(), ExportError> {
    match row.kind {
        RowKind::Section => {
            worksheet.merge_range(
                row_index,
                COL_LABEL,
                row_index,
                LAST_COL,
                &row.label,
                &formats.section,
            )?;
        }
        RowKind::Category => {
            let label_format = &formats.labels_by_level[usize::from(row.level.min(3))];
            worksheet.write_string_with_format(row_index, COL_LABEL, &row.label, label_format)?;
            write_value_cell(
                worksheet,
                row_index,
                COL_PREVIOUS,
                row.previous_total,
                row.previous_female,
                &formats.value,
                &formats.value_with_female,
            )?;
            write_value_cell(
                worksheet,
                row_index,
                COL_CURRENT,
                row.current_total,
                row.current_female,
                &formats.value,
                &formats.value_with_female,
            )?;
        }
        RowKind::Total => {
            worksheet.write_string_with_format(
                row_index,
                COL_LABEL,
                &row.label,
                &formats.total_label,
            )?;
            write_value_cell(
                worksheet,
                row_index,
                COL_PREVIOUS,
                row.previous_total,
                row.previous_female,
                &formats.total_value,
                &formats.value_with_female,
            )?;
            write_value_cell(
                worksheet,
                row_index,
                COL_CURRENT,
                row.current_total,
                row.current_female,
                &formats.total_value,
                &formats.value_with_female,
            )?;
        }
    }
    Ok(())
}

/// A figure cell. With a female split present the cell wraps onto a
/// second line inside the SAME cell, keeping one worksheet row per
/// display row.
fn write_value_cell(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row_index: u32,
    col: u16,
    total: u64,
    female: Option<u64>,
    plain: &Format,
    with_female: &Format,
) -> Result<(), ExportError> {
    match female {
        Some(female) => {
            worksheet.write_string_with_format(
                row_index,
                col,
                &format!("{}\nFemale: {}", total, female),
                with_female,
            )?;
        }
        None => {
            worksheet.write_number_with_format(row_index, col, total as f64, plain)?;
        }
    }
    Ok(())
}
