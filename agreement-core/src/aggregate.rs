//! Metric rows and the per-team averaging passes.

use crate::data::record::RecordType;
use crate::metrics::{Metric, Scores};
use crate::pairs::{Pair, PairScope};
use std::collections::BTreeMap;
use std::fmt;

/// Value of a row's `metrics` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    WithinTeam,
    AcrossTeam,
    WithinTeamAvg,
    AcrossTeamAvg,
}

impl RowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WithinTeam => "within_team",
            Self::AcrossTeam => "across_team",
            Self::WithinTeamAvg => "within_team_avg",
            Self::AcrossTeamAvg => "across_team_avg",
        }
    }

    pub fn is_average(&self) -> bool {
        matches!(self, Self::WithinTeamAvg | Self::AcrossTeamAvg)
    }
}

impl From<PairScope> for RowKind {
    fn from(scope: PairScope) -> Self {
        match scope {
            PairScope::WithinTeam => Self::WithinTeam,
            PairScope::AcrossTeam => Self::AcrossTeam,
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output row: identifying columns plus whatever metrics were computed.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub s_type: RecordType,
    pub kind: RowKind,
    pub batch: Option<String>,
    pub team_1: String,
    pub annot_1: Option<String>,
    pub team_2: Option<String>,
    pub annot_2: Option<String>,
    pub scores: Scores,
}

impl MetricRow {
    /// Row for a scored pair.
    ///
    /// MAIN rows are always labelled `across_team`; IAA rows follow the pair scope.
    pub fn from_pair(s_type: RecordType, pair: &Pair, scores: Scores) -> Self {
        let kind = match s_type {
            RecordType::Main => RowKind::AcrossTeam,
            RecordType::Iaa => pair.scope().into(),
        };
        Self {
            s_type,
            kind,
            batch: Some(pair.batch().to_string()),
            team_1: pair.first.team_name.clone(),
            annot_1: pair.first.annotator.clone(),
            team_2: Some(pair.second.team_name.clone()),
            annot_2: pair.second.annotator.clone(),
            scores,
        }
    }

    pub fn is_same_team(&self) -> bool {
        self.team_2.as_deref() == Some(self.team_1.as_str())
    }
}

/// Mean of every metric column per `(s_type, team_1)` over the rows that pass `filter`.
///
/// Groups come out sorted by key. Missing and NaN values are skipped; a column
/// with nothing left is absent from the averaged row.
pub fn team_averages<F>(rows: &[MetricRow], filter: F, kind: RowKind) -> Vec<MetricRow>
where
    F: Fn(&MetricRow) -> bool,
{
    let mut groups: BTreeMap<(RecordType, &str), Vec<&MetricRow>> = BTreeMap::new();
    for row in rows.iter().filter(|&r| filter(r)) {
        groups
            .entry((row.s_type, row.team_1.as_str()))
            .or_default()
            .push(row);
    }

    groups
        .into_iter()
        .map(|((s_type, team), members)| MetricRow {
            s_type,
            kind,
            batch: None,
            team_1: team.to_string(),
            annot_1: None,
            team_2: None,
            annot_2: None,
            scores: mean_scores(&members),
        })
        .collect()
}

fn mean_scores(rows: &[&MetricRow]) -> Scores {
    let mut means = Scores::new();
    for metric in Metric::ALL {
        let values: Vec<f64> = rows
            .iter()
            .filter_map(|r| r.scores.get(&metric).copied())
            .filter(|v| !v.is_nan())
            .collect();
        if !values.is_empty() {
            means.insert(metric, values.iter().sum::<f64>() / values.len() as f64);
        }
    }
    means
}

/// Team-level averages over MAIN pair rows.
pub fn main_team_averages(rows: &[MetricRow]) -> Vec<MetricRow> {
    team_averages(rows, |_| true, RowKind::AcrossTeamAvg)
}

/// Averages over IAA pairs whose two sides belong to the same team.
pub fn within_team_averages(rows: &[MetricRow]) -> Vec<MetricRow> {
    team_averages(rows, MetricRow::is_same_team, RowKind::WithinTeamAvg)
}

/// Averages over IAA pairs whose two sides belong to different teams.
pub fn across_team_averages(rows: &[MetricRow]) -> Vec<MetricRow> {
    team_averages(rows, |r| !r.is_same_team(), RowKind::AcrossTeamAvg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn iaa_row(team_1: &str, team_2: &str, kappa: Option<f64>) -> MetricRow {
        let mut scores = Scores::new();
        if let Some(k) = kappa {
            scores.insert(Metric::BiasCohenKappa, k);
            scores.insert(Metric::BiasAccuracy, 0.5);
        }
        MetricRow {
            s_type: RecordType::Iaa,
            kind: if team_1 == team_2 {
                RowKind::WithinTeam
            } else {
                RowKind::AcrossTeam
            },
            batch: Some("b1".into()),
            team_1: team_1.into(),
            annot_1: Some("a1".into()),
            team_2: Some(team_2.into()),
            annot_2: Some("a2".into()),
            scores,
        }
    }

    #[test]
    fn test_within_team_average() {
        let rows = vec![
            iaa_row("beta", "beta", Some(0.2)),
            iaa_row("alpha", "alpha", Some(0.4)),
            iaa_row("alpha", "alpha", Some(0.8)),
            iaa_row("alpha", "beta", Some(0.0)),
        ];
        let avgs = within_team_averages(&rows);

        assert_eq!(avgs.len(), 2);
        assert_eq!(avgs[0].team_1, "alpha");
        assert_eq!(avgs[0].kind, RowKind::WithinTeamAvg);
        assert!((avgs[0].scores[&Metric::BiasCohenKappa] - 0.6).abs() < 1e-9);
        assert_eq!(avgs[0].batch, None);
        assert_eq!(avgs[0].team_2, None);
        assert_eq!(avgs[1].team_1, "beta");
    }

    #[test]
    fn test_across_team_average_skips_nan_and_missing() {
        let rows = vec![
            iaa_row("alpha", "beta", Some(f64::NAN)),
            iaa_row("alpha", "gamma", Some(0.3)),
            iaa_row("alpha", "delta", None),
            iaa_row("alpha", "alpha", Some(1.0)),
        ];
        let avgs = across_team_averages(&rows);

        assert_eq!(avgs.len(), 1);
        assert!((avgs[0].scores[&Metric::BiasCohenKappa] - 0.3).abs() < 1e-9);
        assert!((avgs[0].scores[&Metric::BiasAccuracy] - 0.5).abs() < 1e-9);
        assert!(!avgs[0].scores.contains_key(&Metric::PropagandaAccuracy));
    }

    #[test]
    fn test_all_missing_column_is_absent() {
        let rows = vec![iaa_row("alpha", "beta", None)];
        let avgs = across_team_averages(&rows);
        assert_eq!(avgs.len(), 1);
        assert!(avgs[0].scores.is_empty());
    }

    #[test]
    fn test_averages_of_no_rows() {
        assert!(main_team_averages(&[]).is_empty());
    }
}
