//! Append-only CSV observation journal.
//!
//! Backing format (consumed downstream; bit-exact, do not change):
//!
//! ```text
//! Index,Date,Time,Temperature,Status
//! 0,07/03/2026,09:05:03,21.5,0
//! 1,07/03/2026,11:40:19,N/A,1
//! ```
//!
//! Rows are only ever appended and each append is synced, so the index
//! column stays monotonic across power loss between any two appends.
//! Recovery reads the index of the last newline-terminated row; a crash
//! mid-append can leave a partial final record, which recovery skips (its
//! index field may itself be truncated) and the next append terminates
//! with a newline before writing. A complete tail line that does not
//! parse is treated as untrustworthy: recovery restarts at 0 and logs at
//! error level so an operator can inspect the file before the indices
//! collide.

use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use log::{error, info, warn};

use crate::app::events::JournalEntry;
use crate::app::ports::JournalPort;
use crate::error::PersistenceError;

/// Header row written exactly once, when the file is created.
const HEADER: &str = "Index,Date,Time,Temperature,Status";

/// File-backed journal. Exclusively owns its backing file; nothing else
/// in the process touches it.
pub struct CsvJournal {
    path: PathBuf,
}

impl CsvJournal {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl JournalPort for CsvJournal {
    fn ensure_initialized(&mut self) -> Result<(), PersistenceError> {
        if self.path.exists() {
            // Never rewrite an existing store, not even its header.
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| PersistenceError::Create(e.to_string()))?;
            }
        }
        fs::write(&self.path, format!("{HEADER}\n"))
            .map_err(|e| PersistenceError::Create(e.to_string()))?;
        info!("journal created at {}", self.path.display());
        Ok(())
    }

    fn recover_next_index(&mut self) -> u64 {
        let Ok(text) = fs::read_to_string(&self.path) else {
            return 0;
        };
        // A partial final record (no trailing newline) may carry a
        // truncated index field; only complete rows are trusted.
        let complete = if text.is_empty() || text.ends_with('\n') {
            text.as_str()
        } else {
            warn!(
                "journal {} ends mid-record; recovering from the last complete row",
                self.path.display()
            );
            text.rfind('\n').map_or("", |pos| &text[..=pos])
        };
        let Some(last_line) = complete.lines().rev().find(|l| !l.trim().is_empty()) else {
            return 0;
        };
        if last_line == HEADER {
            return 0;
        }
        match last_line.split(',').next().and_then(|s| s.parse::<u64>().ok()) {
            Some(last_index) => last_index + 1,
            None => {
                // Cannot trust the tail; restart at 0 and flag the file
                // for operator review instead of guessing an index.
                error!(
                    "journal {} has an unreadable tail ({last_line:?}); restarting index at 0, \
                     operator review recommended",
                    self.path.display()
                );
                0
            }
        }
    }

    fn append(&mut self, entry: &JournalEntry) -> Result<(), PersistenceError> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| PersistenceError::Append(e.to_string()))?;
        // Terminate a partial record left by a crash mid-append, so the
        // new row starts on its own line.
        let len = file
            .metadata()
            .map_err(|e| PersistenceError::Append(e.to_string()))?
            .len();
        if len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::Start(len - 1))
                .map_err(|e| PersistenceError::Append(e.to_string()))?;
            file.read_exact(&mut last)
                .map_err(|e| PersistenceError::Append(e.to_string()))?;
            if last[0] != b'\n' {
                writeln!(file).map_err(|e| PersistenceError::Append(e.to_string()))?;
            }
        }
        writeln!(file, "{}", entry.csv_row()).map_err(|e| PersistenceError::Append(e.to_string()))?;
        // The device runs from a powerbank; sync so a dying battery loses
        // at most the row being written.
        file.sync_data().map_err(|e| PersistenceError::Append(e.to_string()))?;
        Ok(())
    }
}
