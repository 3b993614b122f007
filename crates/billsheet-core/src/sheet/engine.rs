//! Renders invoice records into the summary template with umya-spreadsheet.

use std::io::Cursor;
use std::ops::Range;
use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, info};
use umya_spreadsheet::{Cell, Spreadsheet, Worksheet};

use super::geometry::{CellAddress, MergeRegion, DATA_COLUMNS, FOOTER_ROWS};
use super::plan::{CellMove, LayoutPlan, RowSpan};
use super::Result;
use crate::error::LayoutError;
use crate::models::record::InvoiceRecord;

/// Layout engine for one conversion run.
///
/// Owns a freshly loaded template and is consumed by [`render`](Self::render),
/// so no workbook state outlives the run.
pub struct TemplateLayoutEngine {
    book: Spreadsheet,
}

/// A rendered workbook together with the layout that produced it.
pub struct RenderedWorkbook {
    book: Spreadsheet,
    plan: LayoutPlan,
}

impl TemplateLayoutEngine {
    /// Load the template workbook from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| LayoutError::Template(format!("{}: {}", path.display(), e)))?;

        debug!("Loaded template {}", path.display());
        Ok(Self { book })
    }

    /// Use an already loaded template workbook.
    pub fn from_workbook(book: Spreadsheet) -> Self {
        Self { book }
    }

    /// Write `records` into the template's active sheet and move the footer
    /// block under them.
    pub fn render(mut self, records: &[InvoiceRecord]) -> Result<RenderedWorkbook> {
        let plan = LayoutPlan::for_record_count(records.len())?;
        info!(
            "Rendering {} records, footer moves to row {} (shift {})",
            plan.record_count(),
            plan.table_end(),
            plan.row_shift()
        );

        let sheet = self.book.get_active_sheet_mut();
        let residual = plan.residual();

        // Read the whole footer before anything is written, data rows included.
        let footer = snapshot_footer(sheet, plan.relocations());
        clear_cells(sheet, plan.relocations().iter().map(|m| m.from));
        drop_template_merges(sheet, &[FOOTER_ROWS, residual.rows()]);

        remove_rows(sheet, residual);
        debug!("Removed {} rows from row {}", residual.count, residual.start);

        write_records(sheet, &plan, records)?;
        // The footer's last row falls on the first deleted row.
        place_footer(sheet, footer, residual.start);

        for region in plan.merges() {
            sheet.add_merge_cells(region.to_string());
        }

        for formula in plan.formulas() {
            sheet
                .get_cell_mut(formula.cell.coordinate())
                .set_formula(formula.formula.as_str());
        }

        debug!(
            "Applied {} merges and {} formulas",
            plan.merges().len(),
            plan.formulas().len()
        );

        Ok(RenderedWorkbook {
            book: self.book,
            plan,
        })
    }
}

impl RenderedWorkbook {
    pub fn plan(&self) -> &LayoutPlan {
        &self.plan
    }

    /// The sheet the records were rendered into.
    pub fn worksheet(&self) -> &Worksheet {
        self.book.get_active_sheet()
    }

    /// Write the workbook to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        umya_spreadsheet::writer::xlsx::write(&self.book, path)
            .map_err(|e| LayoutError::Save(format!("{}: {}", path.display(), e)))?;

        info!("Saved workbook to {}", path.display());
        Ok(())
    }

    /// Serialize the workbook as xlsx bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        umya_spreadsheet::writer::xlsx::write_writer(&self.book, &mut buffer)
            .map_err(|e| LayoutError::Save(e.to_string()))?;
        Ok(buffer.into_inner())
    }
}

/// Copy every footer cell (value, style with its number format, hyperlink)
/// keyed by its destination. Absent cells are carried as blanks.
fn snapshot_footer(sheet: &Worksheet, moves: &[CellMove]) -> Vec<(CellAddress, Cell)> {
    moves
        .iter()
        .map(|m| {
            let cell = sheet.get_cell(m.from.coordinate()).cloned().unwrap_or_default();
            (m.to, cell)
        })
        .collect()
}

fn clear_cells(sheet: &mut Worksheet, cells: impl Iterator<Item = CellAddress>) {
    for address in cells {
        put_cell(sheet, address, Cell::default());
    }
}

fn place_footer(sheet: &mut Worksheet, footer: Vec<(CellAddress, Cell)>, first_removed_row: u32) {
    for (address, cell) in footer {
        if address.row < first_removed_row {
            put_cell(sheet, address, cell);
        }
    }
}

/// Remove template merges touching any of `bands`.
///
/// umya keeps a merge inside a removed row span and shifts it by the span
/// length, which underflows for rows below the span length.
fn drop_template_merges(sheet: &mut Worksheet, bands: &[Range<u32>]) {
    let before = sheet.get_merge_cells().len();
    sheet.get_merge_cells_mut().retain(|range| {
        MergeRegion::parse(&range.get_range())
            .is_some_and(|region| !bands.iter().any(|band| region.intersects_rows(band)))
    });
    debug!("Dropped {} template merges", before - sheet.get_merge_cells().len());
}

/// Delete `span` and shift the rows below it up.
///
/// Formula cells are lifted out first and put back at their shifted rows with
/// their text unchanged; umya would otherwise rewrite every reference past
/// the span start and underflow on rows above the span length.
fn remove_rows(sheet: &mut Worksheet, span: RowSpan) {
    let removed = span.rows();
    let formula_cells: Vec<Cell> = sheet
        .get_cell_collection()
        .into_iter()
        .filter(|cell| cell.is_formula())
        .cloned()
        .collect();

    for cell in &formula_cells {
        let coordinate = cell.get_coordinate();
        sheet.remove_cell((*coordinate.get_col_num(), *coordinate.get_row_num()));
    }

    sheet.remove_row(&span.start, &span.count);

    for cell in formula_cells {
        let coordinate = cell.get_coordinate();
        let (column, row) = (*coordinate.get_col_num(), *coordinate.get_row_num());
        if removed.contains(&row) {
            continue;
        }
        let row = if row >= removed.end { row - span.count } else { row };
        put_cell(sheet, CellAddress::new(column, row), cell);
    }
}

fn put_cell(sheet: &mut Worksheet, address: CellAddress, mut cell: Cell) {
    let coordinate = cell.get_coordinate_mut();
    coordinate.set_col_num(address.column);
    coordinate.set_row_num(address.row);
    sheet.set_cell(cell);
}

fn write_records(sheet: &mut Worksheet, plan: &LayoutPlan, records: &[InvoiceRecord]) -> Result<()> {
    let [number_col, reference_col, debtor_col, amount_col] = DATA_COLUMNS;

    for (row, record) in plan.data_rows().zip(records) {
        for (column, value) in [number_col, reference_col, debtor_col].into_iter().zip(record.text_fields()) {
            sheet.get_cell_mut((column, row)).set_value_string(value);
        }

        let amount = record
            .amount
            .to_f64()
            .ok_or_else(|| LayoutError::Amount(record.amount.to_string()))?;
        sheet.get_cell_mut((amount_col, row)).set_value_number(amount);
    }

    Ok(())
}
