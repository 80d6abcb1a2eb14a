//! The concatenated metrics table and its delimited writer.

use crate::aggregate::MetricRow;
use crate::data::record::RecordType;
use crate::error::{AgreementError, Result};
use crate::metrics::Metric;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Identifying columns written before the metric columns.
pub const ID_COLUMNS: [&str; 7] = [
    "s_type", "metrics", "batch", "team_1", "annot_1", "team_2", "annot_2",
];

/// Output rows in their final order.
#[derive(Debug, Clone, Default)]
pub struct MetricsReport {
    rows: Vec<MetricRow>,
}

impl MetricsReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section of rows after everything already in the report.
    pub fn extend(&mut self, section: impl IntoIterator<Item = MetricRow>) {
        self.rows.extend(section);
    }

    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of pairwise (non-average) rows of one record type.
    pub fn pair_count(&self, s_type: RecordType) -> usize {
        self.rows
            .iter()
            .filter(|r| r.s_type == s_type && !r.kind.is_average())
            .count()
    }

    /// Full header: identifying columns, then metrics in column order.
    pub fn header() -> Vec<&'static str> {
        ID_COLUMNS
            .iter()
            .copied()
            .chain(Metric::ALL.iter().map(Metric::column))
            .collect()
    }

    /// Write the report as a headered delimited table.
    ///
    /// Missing values and NaN become empty cells.
    pub fn write_to<W: Write>(&self, writer: W, delimiter: char) -> Result<()> {
        let delimiter = u8::try_from(delimiter).map_err(|_| {
            AgreementError::config(format!("delimiter {delimiter:?} is not a single byte"))
        })?;
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        wtr.write_record(Self::header())?;
        for row in &self.rows {
            wtr.write_record(record_cells(row))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write the report to `dir/file_name`, creating `dir` if needed.
    pub fn write_to_dir(&self, dir: &Path, file_name: &str, delimiter: char) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(file_name);
        let file = std::fs::File::create(&path)?;
        self.write_to(std::io::BufWriter::new(file), delimiter)?;
        tracing::info!(path = %path.display(), rows = self.len(), "Wrote metrics report");
        Ok(path)
    }
}

fn record_cells(row: &MetricRow) -> Vec<String> {
    let opt = |value: &Option<String>| value.clone().unwrap_or_default();

    let mut cells = vec![
        row.s_type.to_string(),
        row.kind.to_string(),
        opt(&row.batch),
        row.team_1.clone(),
        opt(&row.annot_1),
        opt(&row.team_2),
        opt(&row.annot_2),
    ];
    cells.extend(Metric::ALL.iter().map(|metric| match row.scores.get(metric) {
        Some(v) if !v.is_nan() => format_value(*v),
        _ => String::new(),
    }));
    cells
}

/// Shortest round-trip text for a metric value. Scientific form carries a signed
/// exponent of at least two digits (`1e-05`, `2.5e+16`).
fn format_value(value: f64) -> String {
    let text = format!("{value:?}");
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}
