//! Row arithmetic for placing the footer block after the data table.

use std::ops::Range;

use super::geometry::*;
use super::Result;
use crate::error::LayoutError;

/// One footer cell copied from its template position to its new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMove {
    pub from: CellAddress,
    pub to: CellAddress,
}

/// A formula written into the relocated footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaCell {
    pub cell: CellAddress,
    /// Formula text without the leading `=`.
    pub formula: String,
}

/// Contiguous rows deleted from the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub start: u32,
    pub count: u32,
}

impl RowSpan {
    pub fn rows(&self) -> Range<u32> {
        self.start..self.start.saturating_add(self.count)
    }
}

/// Every position the layout engine touches for a given record count.
///
/// The plan depends on nothing but the record count and the fixed template
/// geometry, so two plans for the same count are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    record_count: usize,
    table_end: u32,
    relocations: Vec<CellMove>,
    merges: Vec<MergeRegion>,
    formulas: Vec<FormulaCell>,
    residual: RowSpan,
}

impl LayoutPlan {
    /// Compute the layout for `count` records.
    pub fn for_record_count(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(LayoutError::EmptyRecords);
        }

        let footer_len = FOOTER_ROWS.end - FOOTER_ROWS.start;
        let table_end = u32::try_from(count)
            .ok()
            .and_then(|n| DATA_START_ROW.checked_add(n))
            .filter(|end| end.saturating_add(footer_len) <= SHEET_MAX_ROW)
            .ok_or(LayoutError::TooManyRecords(count))?;

        Ok(Self {
            record_count: count,
            table_end,
            relocations: relocations(table_end),
            merges: merges(table_end),
            formulas: formulas(table_end),
            residual: RowSpan {
                start: table_end + RESIDUAL_ROW_OFFSET,
                count: RESIDUAL_ROW_COUNT,
            },
        })
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// First row after the data table; the footer starts here.
    pub fn table_end(&self) -> u32 {
        self.table_end
    }

    /// Rows the records are written to.
    pub fn data_rows(&self) -> Range<u32> {
        DATA_START_ROW..self.table_end
    }

    /// Signed row translation applied to the footer block.
    pub fn row_shift(&self) -> i64 {
        i64::from(self.table_end) - i64::from(FOOTER_ROWS.start)
    }

    pub fn relocations(&self) -> &[CellMove] {
        &self.relocations
    }

    pub fn merges(&self) -> &[MergeRegion] {
        &self.merges
    }

    pub fn formulas(&self) -> &[FormulaCell] {
        &self.formulas
    }

    pub fn residual(&self) -> RowSpan {
        self.residual
    }
}

fn relocations(table_end: u32) -> Vec<CellMove> {
    FOOTER_ROWS
        .flat_map(|row| {
            FOOTER_COLUMNS.map(move |column| CellMove {
                from: CellAddress::new(column, row),
                to: CellAddress::new(column, table_end + (row - FOOTER_ROWS.start)),
            })
        })
        .collect()
}

fn merges(table_end: u32) -> Vec<MergeRegion> {
    let mut regions = Vec::new();

    for rule in FOOTER_MERGES {
        let (first_col, last_col) = rule.columns;
        if rule.per_row {
            for offset in rule.rows {
                let row = table_end + offset;
                regions.push(MergeRegion::new(
                    CellAddress::new(first_col, row),
                    CellAddress::new(last_col, row),
                ));
            }
        } else {
            regions.push(MergeRegion::new(
                CellAddress::new(first_col, table_end + rule.rows.start),
                CellAddress::new(last_col, table_end + rule.rows.end - 1),
            ));
        }
    }

    regions
}

fn formulas(table_end: u32) -> Vec<FormulaCell> {
    let amount = |row: u32| CellAddress::new(AMOUNT_COLUMN, row);
    let total = amount(table_end);

    vec![
        FormulaCell {
            cell: total,
            formula: format!("SUM({}:{})", amount(DATA_START_ROW), amount(table_end - 1)),
        },
        FormulaCell {
            cell: amount(table_end + NET_ROW_OFFSET),
            formula: format!(
                "{}-SUM({}:{})",
                total,
                amount(table_end + DEDUCTION_ROWS.start),
                amount(table_end + DEDUCTION_ROWS.end - 1)
            ),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn merge_names(plan: &LayoutPlan) -> Vec<String> {
        plan.merges().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_three_record_layout() {
        let plan = LayoutPlan::for_record_count(3).unwrap();

        assert_eq!(plan.table_end(), 12);
        assert_eq!(plan.data_rows(), 9..12);
        assert_eq!(plan.row_shift(), -371);

        let first = plan.relocations().first().unwrap();
        let last = plan.relocations().last().unwrap();
        assert_eq!((first.from.to_string(), first.to.to_string()), ("A383".to_string(), "A12".to_string()));
        assert_eq!((last.from.to_string(), last.to.to_string()), ("E397".to_string(), "E26".to_string()));
        assert_eq!(plan.relocations().len(), 75);

        assert_eq!(
            plan.formulas(),
            &[
                FormulaCell {
                    cell: CellAddress::new(5, 12),
                    formula: "SUM(E9:E11)".to_string(),
                },
                FormulaCell {
                    cell: CellAddress::new(5, 18),
                    formula: "E12-SUM(E13:E17)".to_string(),
                },
            ]
        );

        assert_eq!(plan.residual(), RowSpan { start: 26, count: 500 });
        assert_eq!(plan.residual().rows(), 26..526);
    }

    #[test]
    fn test_merge_pattern() {
        let plan = LayoutPlan::for_record_count(3).unwrap();

        assert_eq!(
            merge_names(&plan),
            vec![
                "A13:C13", "A14:C14", "A15:C15", "A16:C16", "A17:C17", "A18:C18",
                "A19:B19",
                "A20:E20",
                "A21:C21",
                "A22:B22", "A23:B23", "A24:B24", "A25:B25", "A26:B26", "A27:B27",
                "D23:E25",
            ]
        );
    }

    #[test]
    fn test_table_end_follows_record_count() {
        for count in [1usize, 2, 17, 373, 374, 375, 2000] {
            let plan = LayoutPlan::for_record_count(count).unwrap();
            let table_end = count as u32 + 9;

            assert_eq!(plan.table_end(), table_end);
            assert_eq!(plan.data_rows().len(), count);
            assert_eq!(plan.relocations()[0].to, CellAddress::new(1, table_end));
            assert_eq!(plan.merges()[0].start, CellAddress::new(1, table_end + 1));
            assert_eq!(plan.formulas()[0].cell.row, table_end);
            assert_eq!(plan.residual().start, table_end + 14);
        }
    }

    #[test]
    fn test_single_record_sums_one_row() {
        let plan = LayoutPlan::for_record_count(1).unwrap();
        assert_eq!(plan.formulas()[0].formula, "SUM(E9:E9)");
        assert_eq!(plan.formulas()[1].formula, "E10-SUM(E11:E15)");
    }

    #[test]
    fn test_plan_is_deterministic() {
        let a = LayoutPlan::for_record_count(42).unwrap();
        let b = LayoutPlan::for_record_count(42).unwrap();

        assert_eq!(a, b);
        assert_eq!(merge_names(&a), merge_names(&b));
    }

    #[test]
    fn test_zero_records_rejected() {
        assert!(matches!(
            LayoutPlan::for_record_count(0),
            Err(LayoutError::EmptyRecords)
        ));
    }

    #[test]
    fn test_record_count_beyond_sheet_rejected() {
        assert!(matches!(
            LayoutPlan::for_record_count(SHEET_MAX_ROW as usize),
            Err(LayoutError::TooManyRecords(_))
        ));
    }
}
