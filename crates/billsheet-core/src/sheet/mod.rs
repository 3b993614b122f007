//! Spreadsheet template layout.
//!
//! [`plan`] computes every row position from the record count alone;
//! [`engine`] applies that plan to a loaded template.

pub mod engine;
pub mod geometry;
pub mod plan;

pub use engine::{RenderedWorkbook, TemplateLayoutEngine};
pub use geometry::{CellAddress, MergeRegion};
pub use plan::{CellMove, FormulaCell, LayoutPlan, RowSpan};

use crate::error::LayoutError;

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
