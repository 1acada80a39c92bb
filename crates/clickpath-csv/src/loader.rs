use std::fs::File;
use std::io::Read;
use std::path::Path;

use clickpath_core::session::LINK_COLUMNS;
use clickpath_core::{CoreError, RawRow, SessionStore};
use csv::StringRecord;
use tracing::{info, warn};

use crate::error::LoadError;

/// `Source, Device, Link 1 .. Link 16`.
pub const EXPECTED_COLUMNS: usize = 2 + LINK_COLUMNS;

/// Result of loading one clickstream file.
#[derive(Debug)]
pub struct LoadOutcome {
    pub store: SessionStore,
    /// Rows dropped because they carried more fields than the layout allows.
    pub skipped_rows: usize,
}

/// Reader for the clickstream CSV layout.
///
/// Rows longer than [`EXPECTED_COLUMNS`] are skipped and counted. Shorter rows
/// are padded with absent links. Blank or whitespace-only cells are absent
/// values; other cells are passed through untrimmed. A blank source or
/// device is rejected with [`LoadError::Malformed`] naming the input line.
#[derive(Debug, Clone, Default)]
pub struct CsvLoader {
    has_headers: bool,
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat the first line as a header row instead of data.
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<LoadOutcome, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let outcome = self.load_reader(file)?;
        info!(
            path = %path.display(),
            sessions = outcome.store.len(),
            skipped_rows = outcome.skipped_rows,
            "Clickstream data loaded"
        );
        Ok(outcome)
    }

    pub fn load_reader<R: Read>(&self, reader: R) -> Result<LoadOutcome, LoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(self.has_headers)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        // Input line of each accepted row, for reporting store rejections.
        let mut lines = Vec::new();
        let mut skipped_rows = 0usize;
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            if record.len() > EXPECTED_COLUMNS {
                skipped_rows += 1;
                warn!(line, fields = record.len(), "Skipping row with too many fields");
                continue;
            }
            rows.push(to_raw_row(&record));
            lines.push(line);
        }

        let store = SessionStore::from_rows(rows).map_err(|err| match err {
            CoreError::MalformedInput { row, field } => LoadError::Malformed {
                line: lines.get(row).copied().unwrap_or_default(),
                field,
            },
            other => LoadError::Core(other),
        })?;
        Ok(LoadOutcome {
            store,
            skipped_rows,
        })
    }
}

/// A whitespace-only cell is absent; any other value is kept verbatim.
fn cell(record: &StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

fn to_raw_row(record: &StringRecord) -> RawRow {
    let mut row = RawRow {
        source: cell(record, 0),
        device: cell(record, 1),
        links: Default::default(),
    };
    for (offset, slot) in row.links.iter_mut().enumerate() {
        *slot = cell(record, 2 + offset);
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cells_become_absent_links() {
        let record = StringRecord::from(vec!["direct", "mobile", "home", "", " ", "cart"]);
        let row = to_raw_row(&record);
        assert_eq!(row.source.as_deref(), Some("direct"));
        assert_eq!(row.device.as_deref(), Some("mobile"));
        assert_eq!(row.links[0].as_deref(), Some("home"));
        assert_eq!(row.links[1], None);
        assert_eq!(row.links[2], None);
        assert_eq!(row.links[3].as_deref(), Some("cart"));
        assert!(row.links[4..].iter().all(Option::is_none));
    }

    #[test]
    fn blank_source_is_passed_through_as_absent() {
        let record = StringRecord::from(vec!["", "mobile"]);
        assert_eq!(to_raw_row(&record).source, None);
    }

    #[test]
    fn non_blank_cells_are_kept_verbatim() {
        let record = StringRecord::from(vec!["direct", "mobile", " home", "cart "]);
        let row = to_raw_row(&record);
        assert_eq!(row.links[0].as_deref(), Some(" home"));
        assert_eq!(row.links[1].as_deref(), Some("cart "));
    }

    #[test]
    fn header_row_can_be_skipped() {
        let data = "Source,Device,Link 1\ndirect,mobile,home\n";
        let outcome = CsvLoader::new()
            .has_headers(true)
            .load_reader(data.as_bytes())
            .expect("load");
        assert_eq!(outcome.store.len(), 1);
        assert_eq!(outcome.store.sessions()[0].source(), "direct");
    }
}
