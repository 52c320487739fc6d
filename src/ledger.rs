//! Append-only xlsx timestamp ledger.
//!
//! One workbook, one sheet named "Timestamps", one header row and one
//! hardware timestamp per captured frame. The workbook is assembled in memory
//! and only reaches disk in [`TimestampLedger::close`]; an abnormal exit
//! before close loses the document, which is the accepted trade-off here.

use std::path::PathBuf;

use rust_xlsxwriter::Workbook;

use crate::error::Result;

const SHEET_NAME: &str = "Timestamps";
const HEADER: &str = "Timestamps (ns)";

pub struct TimestampLedger {
    workbook: Workbook,
    path: PathBuf,
    rows: u32,
}

impl TimestampLedger {
    /// Start a new ledger destined for `path`. Pre-existing content at that
    /// path is never read; close overwrites it.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name(SHEET_NAME)?;

        Ok(Self {
            workbook,
            path: path.into(),
            rows: 0,
        })
    }

    /// Write the header label into row 0, column 0.
    pub fn write_header(&mut self) -> Result<()> {
        self.workbook
            .worksheet_from_index(0)?
            .write_string(0, 0, HEADER)?;
        Ok(())
    }

    /// Record a frame's hardware timestamp at `row`, which must be the frame's
    /// 1-based sequence number (row 0 is the header).
    pub fn append_row(&mut self, row: u32, timestamp_ns: u64) -> Result<()> {
        // xlsx cells are IEEE doubles; nanosecond precision holds to 2^53 ns.
        self.workbook
            .worksheet_from_index(0)?
            .write_number(row, 0, timestamp_ns as f64)?;
        self.rows += 1;
        Ok(())
    }

    /// Number of timestamp rows recorded so far, excluding the header.
    pub fn rows_written(&self) -> u32 {
        self.rows
    }

    /// Finalize and save the document. Must be called exactly once on the
    /// normal exit path.
    pub fn close(mut self) -> Result<()> {
        self.workbook.save(&self.path)?;
        Ok(())
    }
}
