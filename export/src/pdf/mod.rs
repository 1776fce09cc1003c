//! FILENAME: export/src/pdf/mod.rs
//! PDF renderer.
//!
//! Two passes over the shared display-row sequence: `layout` assigns
//! every row to a page purely (so the page count exists before any ink),
//! then this module draws each page with the printpdf backend,
//! repeating the header band (title, office, period, "Page X of Y") on
//! every page. Indentation is left padding proportional to `level`.

pub mod layout;

use printpdf::{BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb};

use report_engine::{DisplayRow, ReportMeta, RowKind};

use crate::error::ExportError;
use layout::{paginate, PageGeometry, PageLayout};

const TITLE: &str = "Monthly Employment Statistics Report";

const LABEL_X_MM: f32 = 14.0;
const PREVIOUS_X_MM: f32 = 128.0;
const CURRENT_X_MM: f32 = 168.0;

const BODY_SIZE: f32 = 9.0;
const FEMALE_SIZE: f32 = 7.5;

/// Renders the paginated report to an in-memory PDF byte stream.
pub fn render_pdf(meta: &ReportMeta, rows: &[DisplayRow]) -> Result<Vec<u8>, ExportError> {
    let geometry = PageGeometry::default();
    let pages = paginate(rows, &geometry);
    let page_count = pages.len();

    let (doc, first_page, first_layer) = PdfDocument::new(
        TITLE,
        Mm(geometry.width_mm),
        Mm(geometry.height_mm),
        "Layer 1",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    for (page_number, page) in pages.iter().enumerate() {
        let layer = if page_number == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(Mm(geometry.width_mm), Mm(geometry.height_mm), "Layer 1");
            doc.get_page(page_index).get_layer(layer_index)
        };

        draw_header(
            &layer,
            meta,
            &geometry,
            &regular,
            &bold,
            page_number + 1,
            page_count,
        );
        draw_rows(&layer, page, &geometry, &regular, &bold);
    }

    Ok(doc.save_to_bytes()?)
}

// ============================================================================
// DRAWING
// ============================================================================

fn draw_header(
    layer: &PdfLayerReference,
    meta: &ReportMeta,
    geometry: &PageGeometry,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
    page_number: usize,
    page_count: usize,
) {
    set_black(layer);
    layer.use_text(
        TITLE,
        12.0,
        Mm(LABEL_X_MM),
        from_top(geometry, 14.0),
        bold,
    );
    layer.use_text(
        meta.reporting_office.as_str(),
        10.0,
        Mm(LABEL_X_MM),
        from_top(geometry, 20.0),
        regular,
    );
    layer.use_text(
        format!("Reporting period: {}", meta.reporting_period),
        9.0,
        Mm(LABEL_X_MM),
        from_top(geometry, 25.0),
        regular,
    );
    layer.use_text(
        format!("Page {} of {}", page_number, page_count),
        9.0,
        Mm(CURRENT_X_MM),
        from_top(geometry, 14.0),
        regular,
    );

    // Column captions with a rule underneath.
    layer.use_text(
        "Previous",
        8.0,
        Mm(PREVIOUS_X_MM),
        from_top(geometry, 29.0),
        bold,
    );
    layer.use_text(
        "Current",
        8.0,
        Mm(CURRENT_X_MM),
        from_top(geometry, 29.0),
        bold,
    );
    let rule_y = from_top(geometry, 30.5);
    layer.set_outline_thickness(0.4);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(LABEL_X_MM), rule_y), false),
            (
                Point::new(Mm(geometry.width_mm - geometry.margin_mm), rule_y),
                false,
            ),
        ],
        is_closed: false,
    });
}

fn draw_rows(
    layer: &PdfLayerReference,
    page: &PageLayout<'_>,
    geometry: &PageGeometry,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    for placed in &page.rows {
        let row = placed.row;
        let baseline = from_top(geometry, placed.y_mm + 4.6);
        let font = match row.kind {
            RowKind::Section | RowKind::Total => bold,
            RowKind::Category => regular,
        };
        let indent = f32::from(row.level) * geometry.indent_step_mm;

        set_black(layer);
        layer.use_text(
            row.label.as_str(),
            BODY_SIZE,
            Mm(LABEL_X_MM + indent),
            baseline,
            font,
        );
        if row.kind != RowKind::Section {
            layer.use_text(
                row.previous_total.to_string(),
                BODY_SIZE,
                Mm(PREVIOUS_X_MM),
                baseline,
                font,
            );
            layer.use_text(
                row.current_total.to_string(),
                BODY_SIZE,
                Mm(CURRENT_X_MM),
                baseline,
                font,
            );
        }

        // The female pair stays inside this row's band; pagination
        // already reserved the extra line.
        if row.previous_female.is_some() || row.current_female.is_some() {
            let female_baseline = from_top(geometry, placed.y_mm + 4.6 + geometry.female_extra_mm);
            layer.set_fill_color(Color::Rgb(Rgb::new(0.69, 0.21, 0.48, None)));
            if let Some(previous) = row.previous_female {
                layer.use_text(
                    format!("Female: {}", previous),
                    FEMALE_SIZE,
                    Mm(PREVIOUS_X_MM),
                    female_baseline,
                    regular,
                );
            }
            if let Some(current) = row.current_female {
                layer.use_text(
                    format!("Female: {}", current),
                    FEMALE_SIZE,
                    Mm(CURRENT_X_MM),
                    female_baseline,
                    regular,
                );
            }
        }
    }
}

/// Converts a from-top offset to printpdf's bottom-left coordinates.
fn from_top(geometry: &PageGeometry, y_mm: f32) -> Mm {
    Mm(geometry.height_mm - y_mm)
}

fn set_black(layer: &PdfLayerReference) {
    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
}
