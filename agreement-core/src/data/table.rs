//! In-memory annotation table: delimited loading and slice selection.

use crate::data::record::{AnnotationRecord, RecordType, Task};
use crate::error::{AgreementError, Result};
use std::io::Read;
use std::path::Path;

/// Columns that must appear in the input header.
pub const REQUIRED_COLUMNS: [&str; 5] = ["type", "batch", "team_name", "task", "label"];

/// Optional annotator-role column.
pub const SHEET_TYPE_COLUMN: &str = "sheet_type";

/// Header positions resolved once per file.
struct ColumnIndex {
    record_type: usize,
    batch: usize,
    team_name: usize,
    task: usize,
    label: usize,
    sheet_type: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| find(name).ok_or_else(|| AgreementError::missing_column(name));

        Ok(Self {
            record_type: require(REQUIRED_COLUMNS[0])?,
            batch: require(REQUIRED_COLUMNS[1])?,
            team_name: require(REQUIRED_COLUMNS[2])?,
            task: require(REQUIRED_COLUMNS[3])?,
            label: require(REQUIRED_COLUMNS[4])?,
            sheet_type: find(SHEET_TYPE_COLUMN),
        })
    }
}

/// The full set of loaded annotation rows, in file order.
#[derive(Debug, Clone, Default)]
pub struct AnnotationTable {
    records: Vec<AnnotationRecord>,
}

impl AnnotationTable {
    pub fn new(records: Vec<AnnotationRecord>) -> Self {
        Self { records }
    }

    /// Load a headered delimited table from a file.
    pub fn from_path(path: impl AsRef<Path>, delimiter: char) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file, delimiter)?;
        tracing::info!(
            path = %path.display(),
            rows = table.len(),
            "Loaded annotation table"
        );
        Ok(table)
    }

    /// Load a headered delimited table from any reader.
    ///
    /// Rows with an unknown `type` are skipped. Rows with an unknown `task` are
    /// kept with no task: they still define group keys, but no slice selects them.
    pub fn from_reader<R: Read>(reader: R, delimiter: char) -> Result<Self> {
        let delimiter = u8::try_from(delimiter).map_err(|_| {
            AgreementError::config(format!("delimiter {delimiter:?} is not a single byte"))
        })?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);

        let columns = ColumnIndex::resolve(rdr.headers()?)?;
        let mut records = Vec::new();
        let mut skipped = 0usize;
        let mut unknown_task = 0usize;

        for result in rdr.records() {
            let row = result?;
            let cell = |idx: usize| row.get(idx).unwrap_or("");

            let Ok(record_type) = cell(columns.record_type).parse::<RecordType>() else {
                skipped += 1;
                continue;
            };
            let task = cell(columns.task).parse::<Task>().ok();
            if task.is_none() {
                unknown_task += 1;
            }

            let sheet_type = columns
                .sheet_type
                .map(cell)
                .filter(|s| !s.is_empty())
                .map(str::to_string);

            records.push(AnnotationRecord {
                record_type,
                batch: cell(columns.batch).to_string(),
                team_name: cell(columns.team_name).to_string(),
                task,
                sheet_type,
                label: cell(columns.label).to_string(),
            });
        }

        if skipped > 0 {
            tracing::warn!(skipped, "Skipped rows with unrecognised type");
        }
        if unknown_task > 0 {
            tracing::warn!(rows = unknown_task, "Rows with unrecognised task are never scored");
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[AnnotationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Labels of the rows matching every given key, in table order.
    ///
    /// Without an annotator every role in the slice is returned. An empty result
    /// means insufficient data, not a failure.
    pub fn select(
        &self,
        record_type: RecordType,
        batch: &str,
        team: &str,
        task: Task,
        annotator: Option<&str>,
    ) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| {
                r.record_type == record_type
                    && r.batch == batch
                    && r.team_name == team
                    && r.task == Some(task)
                    && annotator.is_none_or(|a| r.sheet_type.as_deref() == Some(a))
            })
            .map(|r| r.label.as_str())
            .collect()
    }
}
