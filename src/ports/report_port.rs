//! Signal report port.

use std::path::Path;

use crate::domain::error::SignalError;
use crate::domain::scan::ScanResult;

/// Port for writing scan results. `None` means standard output.
pub trait ReportPort {
    fn write(&self, result: &ScanResult, output_path: Option<&Path>) -> Result<(), SignalError>;
}
