//! FILENAME: export/src/pdf/layout.rs
//! PDF pagination - the pure layout pass.
//!
//! Simulates row heights onto fixed-size pages BEFORE anything is
//! drawn, so the total page count is known when the first page header
//! ("Page X of Y") is rendered. A display row with a female split is
//! one indivisible layout unit: its second line can never land on the
//! next page.

use report_engine::DisplayRow;

/// Fixed page metrics, in millimeters. A4 portrait.
#[derive(Debug, Clone)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    /// Vertical space reserved for the repeated page header.
    pub header_height_mm: f32,
    pub row_height_mm: f32,
    /// Extra height when the female figure adds a second line.
    pub female_extra_mm: f32,
    /// Horizontal indent per taxonomy level.
    pub indent_step_mm: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 14.0,
            header_height_mm: 32.0,
            row_height_mm: 6.4,
            female_extra_mm: 4.4,
            indent_step_mm: 4.0,
        }
    }
}

impl PageGeometry {
    /// Height of one display row: the `(total, female)` pair shares the
    /// row and grows it; it is never split off.
    pub fn row_height(&self, row: &DisplayRow) -> f32 {
        if row.previous_female.is_some() || row.current_female.is_some() {
            self.row_height_mm + self.female_extra_mm
        } else {
            self.row_height_mm
        }
    }

    /// Vertical space available for data rows on every page.
    pub fn usable_height(&self) -> f32 {
        self.height_mm - self.margin_mm - self.header_height_mm
    }
}

/// One row placed on a page. `y_mm` is measured from the page top.
#[derive(Debug)]
pub struct PlacedRow<'a> {
    pub row: &'a DisplayRow,
    pub y_mm: f32,
    pub height_mm: f32,
}

/// All rows assigned to one page.
#[derive(Debug, Default)]
pub struct PageLayout<'a> {
    pub rows: Vec<PlacedRow<'a>>,
}

/// Assigns every display row to a page, preserving sequence order.
pub fn paginate<'a>(rows: &'a [DisplayRow], geometry: &PageGeometry) -> Vec<PageLayout<'a>> {
    let bottom = geometry.height_mm - geometry.margin_mm;
    let mut pages: Vec<PageLayout<'a>> = vec![PageLayout::default()];
    let mut cursor = geometry.header_height_mm;

    for row in rows {
        let height = geometry.row_height(row);
        if cursor + height > bottom {
            pages.push(PageLayout::default());
            cursor = geometry.header_height_mm;
        }
        pages
            .last_mut()
            .expect("at least one page")
            .rows
            .push(PlacedRow {
                row,
                y_mm: cursor,
                height_mm: height,
            });
        cursor += height;
    }

    pages
}
