//! pomoplan-store: CSV files behind the core persistence traits.

pub mod sessions_csv;
pub mod tasks_csv;

pub use sessions_csv::CsvSessionLog;
pub use tasks_csv::CsvTaskFile;
