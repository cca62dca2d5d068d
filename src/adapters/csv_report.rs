//! Machine-readable signal report: `date,code,kind,price` rows.

use std::io::{self, Write};
use std::path::Path;

use crate::adapters::open_output;
use crate::domain::error::SignalError;
use crate::domain::scan::ScanResult;
use crate::domain::signal::SignalEvent;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn render<W: Write>(&self, events: &[SignalEvent], out: W) -> io::Result<()> {
        let mut wtr = csv::Writer::from_writer(out);
        if events.is_empty() {
            wtr.write_record(["date", "code", "kind", "price"])?;
        }
        for event in events {
            wtr.serialize(event).map_err(io::Error::from)?;
        }
        wtr.flush()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &ScanResult, output_path: Option<&Path>) -> Result<(), SignalError> {
        let out = open_output(output_path)?;
        self.render(&result.events, out)?;
        Ok(())
    }
}
