//! CSV report adapter implementing ReportPort.

use crate::domain::error::BondExportError;
use crate::domain::merge::MergedBondRow;
use crate::domain::report::{REPORT_HEADERS, row_cells};
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct CsvReportAdapter;

impl ReportPort for CsvReportAdapter {
    fn write(&self, rows: &[MergedBondRow], output_path: &Path) -> Result<(), BondExportError> {
        let report_err = |reason: String| BondExportError::Report {
            path: output_path.display().to_string(),
            reason,
        };

        let mut writer = csv::Writer::from_path(output_path).map_err(|e| report_err(e.to_string()))?;
        writer
            .write_record(REPORT_HEADERS)
            .map_err(|e| report_err(e.to_string()))?;

        for row in rows {
            let record: Vec<String> = row_cells(row).iter().map(|c| c.render()).collect();
            writer
                .write_record(&record)
                .map_err(|e| report_err(e.to_string()))?;
        }

        writer.flush().map_err(|e| report_err(e.to_string()))?;
        Ok(())
    }
}
