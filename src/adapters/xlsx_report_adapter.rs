//! Excel report adapter implementing ReportPort.

use crate::domain::error::BondExportError;
use crate::domain::merge::MergedBondRow;
use crate::domain::report::{REPORT_HEADERS, ReportCell, row_cells};
use crate::ports::report_port::ReportPort;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::Path;

pub struct XlsxReportAdapter;

impl XlsxReportAdapter {
    fn build(rows: &[MergedBondRow], output_path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let header = Format::new().set_bold();

        for (col, title) in REPORT_HEADERS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &header)?;
        }

        for (i, row) in rows.iter().enumerate() {
            let r = (i + 1) as u32;
            for (col, cell) in row_cells(row).into_iter().enumerate() {
                let c = col as u16;
                match cell {
                    ReportCell::Text(s) => {
                        sheet.write_string(r, c, s)?;
                    }
                    ReportCell::Number(n) => {
                        sheet.write_number(r, c, n)?;
                    }
                    ReportCell::Bool(b) => {
                        sheet.write_boolean(r, c, b)?;
                    }
                    ReportCell::Empty => {}
                }
            }
        }

        sheet.set_freeze_panes(1, 0)?;
        sheet.autofit();
        workbook.save(output_path)
    }
}

impl ReportPort for XlsxReportAdapter {
    fn write(&self, rows: &[MergedBondRow], output_path: &Path) -> Result<(), BondExportError> {
        Self::build(rows, output_path).map_err(|e| BondExportError::Report {
            path: output_path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
