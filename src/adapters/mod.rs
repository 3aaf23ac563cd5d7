//! Concrete adapter implementations for ports.

pub mod credentials;
pub mod csv_report_adapter;
pub mod file_config_adapter;
pub mod http_fetch;
pub mod moex_adapter;
pub mod tinkoff_adapter;
pub mod xlsx_report_adapter;

use crate::ports::report_port::ReportPort;
use std::path::Path;

/// Writer for `path`, chosen by extension: `.csv` gets CSV, anything else xlsx.
pub fn report_writer_for(path: &Path) -> Box<dyn ReportPort> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Box::new(csv_report_adapter::CsvReportAdapter)
    } else {
        Box::new(xlsx_report_adapter::XlsxReportAdapter)
    }
}
