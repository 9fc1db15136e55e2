pub mod aggregator;
pub mod filter;
pub mod grouper;
pub mod projector;
pub mod report_service;
pub mod title;

pub use report_service::ReportService;
