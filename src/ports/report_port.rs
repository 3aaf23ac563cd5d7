//! Report output port.

use crate::domain::error::BondExportError;
use crate::domain::merge::MergedBondRow;
use std::path::Path;

/// Port for writing the bond table.
pub trait ReportPort {
    fn write(&self, rows: &[MergedBondRow], output_path: &Path) -> Result<(), BondExportError>;
}
