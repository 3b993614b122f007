//! Fixed geometry of the invoice summary template.
//!
//! Rows and columns are 1-indexed. Column ranges are half-open.

use std::fmt;
use std::ops::Range;

/// Last row of a worksheet.
pub const SHEET_MAX_ROW: u32 = 1_048_576;

/// First row of the data table.
pub const DATA_START_ROW: u32 = 9;

/// Data table columns B, C, D, E: invoice number, reference, debtor, amount.
pub const DATA_COLUMNS: [u32; 4] = [2, 3, 4, 5];

/// Column holding amounts and the two aggregate formulas.
pub const AMOUNT_COLUMN: u32 = 5;

/// Footer block rows in the unmodified template (383 through 397).
pub const FOOTER_ROWS: Range<u32> = 383..398;

/// Footer block columns (A through E).
pub const FOOTER_COLUMNS: Range<u32> = 1..6;

/// Offset from the footer start to the net formula row.
pub const NET_ROW_OFFSET: u32 = 6;

/// Rows between the total and the net row whose sum is deducted from the total.
pub const DEDUCTION_ROWS: Range<u32> = 1..6;

/// Offset from the footer start to the first residual row deleted.
pub const RESIDUAL_ROW_OFFSET: u32 = 14;

/// Number of residual template rows deleted.
pub const RESIDUAL_ROW_COUNT: u32 = 500;

/// One merge of the summary block, relative to the footer start row.
///
/// With `per_row` set, each row of `rows` gets its own merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRule {
    pub rows: Range<u32>,
    pub columns: (u32, u32),
    pub per_row: bool,
}

/// Summary block merges applied after the footer moved.
pub const FOOTER_MERGES: [MergeRule; 6] = [
    MergeRule { rows: 1..7, columns: (1, 3), per_row: true },
    MergeRule { rows: 7..8, columns: (1, 2), per_row: true },
    MergeRule { rows: 8..9, columns: (1, 5), per_row: true },
    MergeRule { rows: 9..10, columns: (1, 3), per_row: true },
    MergeRule { rows: 10..16, columns: (1, 2), per_row: true },
    MergeRule { rows: 11..14, columns: (4, 5), per_row: false },
];

/// Column letters for a 1-indexed column number.
pub fn column_name(mut column: u32) -> String {
    let mut name = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        name.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

/// A cell position in A1 terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub column: u32,
    pub row: u32,
}

impl CellAddress {
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// `(column, row)` as the spreadsheet API expects it.
    pub fn coordinate(&self) -> (u32, u32) {
        (self.column, self.row)
    }

    /// Parse an A1 reference such as `C17` or `$C$17`.
    pub fn parse(reference: &str) -> Option<Self> {
        let reference = reference.replace('$', "");
        let split = reference.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = reference.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }

        let column = letters.chars().try_fold(0u32, |acc, c| {
            acc.checked_mul(26)?
                .checked_add(u32::from(c.to_ascii_uppercase() as u8 - b'A') + 1)
        })?;
        let row = digits.parse().ok().filter(|row| *row > 0)?;
        Some(Self::new(column, row))
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.column), self.row)
    }
}

/// A rectangular range merged into one logical cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRegion {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl MergeRegion {
    pub const fn new(start: CellAddress, end: CellAddress) -> Self {
        Self { start, end }
    }

    /// Parse a range such as `A384:C389`; a single cell is a 1x1 region.
    pub fn parse(range: &str) -> Option<Self> {
        match range.split_once(':') {
            Some((start, end)) => Some(Self::new(CellAddress::parse(start)?, CellAddress::parse(end)?)),
            None => CellAddress::parse(range).map(|cell| Self::new(cell, cell)),
        }
    }

    /// Whether any row of the region lies in `rows`.
    pub fn intersects_rows(&self, rows: &Range<u32>) -> bool {
        let (top, bottom) = if self.start.row <= self.end.row {
            (self.start.row, self.end.row)
        } else {
            (self.end.row, self.start.row)
        };
        top < rows.end && bottom >= rows.start
    }
}

impl fmt::Display for MergeRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}
