pub mod columns;
pub mod record;
pub mod report;
pub mod table;

pub use record::{FilteredTable, Record};
pub use report::{
    BatchOutcome, DetailReport, FileOutcome, ReportKind, ReportPeriod, SummaryReport, SummaryRow,
};
pub use table::{Cell, ProjectedTable, RawTable};
