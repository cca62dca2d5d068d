//! Plain-text signal report, one aligned line per event:
//!
//! ```text
//! 2025-07-24 | BTC-USD    | BUY                  | Price: 118754.96
//! ```

use std::io::Write;
use std::path::Path;

use crate::adapters::open_output;
use crate::domain::error::SignalError;
use crate::domain::scan::ScanResult;
use crate::domain::signal::SignalEvent;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn format_event(event: &SignalEvent) -> String {
        format!(
            "{} | {:10} | {:20} | Price: {:.2}",
            event.date, event.code, event.kind, event.price
        )
    }

    pub fn render(&self, events: &[SignalEvent], out: &mut dyn Write) -> std::io::Result<()> {
        for event in events {
            writeln!(out, "{}", Self::format_event(event))?;
        }
        out.flush()
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, result: &ScanResult, output_path: Option<&Path>) -> Result<(), SignalError> {
        let mut out = open_output(output_path)?;
        self.render(&result.events, &mut out)?;
        Ok(())
    }
}
