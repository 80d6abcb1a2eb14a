//! End-to-end metrics run: load, pair, score, aggregate, write.

use crate::aggregate::{
    MetricRow, across_team_averages, main_team_averages, within_team_averages,
};
use crate::config::AgreementConfig;
use crate::data::record::{RecordType, Task};
use crate::data::table::AnnotationTable;
use crate::error::Result;
use crate::metrics::{Scores, score_pair};
use crate::pairs::{Pair, iaa_pairs, main_pairs};
use crate::report::MetricsReport;
use std::path::PathBuf;

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub main_pairs: usize,
    pub iaa_pairs: usize,
    pub total_rows: usize,
}

/// Score every pair on both tasks and merge the results into one row each.
pub fn score_pairs(
    table: &AnnotationTable,
    record_type: RecordType,
    pairs: &[Pair],
) -> Result<Vec<MetricRow>> {
    pairs
        .iter()
        .map(|pair| {
            tracing::debug!(
                %record_type,
                batch = pair.batch(),
                team_1 = %pair.first.team_name,
                annot_1 = ?pair.first.annotator,
                team_2 = %pair.second.team_name,
                annot_2 = ?pair.second.annotator,
                "Scoring pair"
            );
            let mut scores = Scores::new();
            for task in Task::ALL {
                scores.extend(score_pair(table, record_type, pair, task)?);
            }
            Ok(MetricRow::from_pair(record_type, pair, scores))
        })
        .collect()
}

/// Build the full report in output order: MAIN pairs, MAIN team averages,
/// IAA pairs, IAA within-team averages, IAA across-team averages.
pub fn build_report(table: &AnnotationTable) -> Result<MetricsReport> {
    let main = main_pairs(table);
    let main_rows = score_pairs(table, RecordType::Main, &main)?;
    let main_avgs = main_team_averages(&main_rows);

    let iaa = iaa_pairs(table);
    let iaa_rows = score_pairs(table, RecordType::Iaa, &iaa)?;
    let within_avgs = within_team_averages(&iaa_rows);
    let across_avgs = across_team_averages(&iaa_rows);

    tracing::info!(
        main_rows = main_rows.len(),
        main_averages = main_avgs.len(),
        iaa_rows = iaa_rows.len(),
        within_team_averages = within_avgs.len(),
        across_team_averages = across_avgs.len(),
        "Aggregated agreement metrics"
    );

    let mut report = MetricsReport::new();
    report.extend(main_rows);
    report.extend(main_avgs);
    report.extend(iaa_rows);
    report.extend(within_avgs);
    report.extend(across_avgs);

    Ok(report)
}

/// Run the pipeline described by `config` and write the report.
pub fn run(config: &AgreementConfig) -> Result<RunSummary> {
    let input = config.input_path()?;
    let table = AnnotationTable::from_path(input, config.delimiter)?;

    let report = build_report(&table)?;
    let output_path =
        report.write_to_dir(&config.output_dir, &config.output_file, config.delimiter)?;

    Ok(RunSummary {
        output_path,
        main_pairs: report.pair_count(RecordType::Main),
        iaa_pairs: report.pair_count(RecordType::Iaa),
        total_rows: report.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::RowKind;
    use crate::metrics::Metric;
    use pretty_assertions::assert_eq;

    const TABLE: &str = "\
type\tbatch\tteam_name\ttask\tsheet_type\tlabel
MAIN\tb1\talpha\tBias\t\tUnbiased
MAIN\tb1\talpha\tBias\t\tBiased against Israel
MAIN\tb1\tbeta\tBias\t\tUnbiased
MAIN\tb1\tbeta\tBias\t\tBiased against Palestine
MAIN\tb1\talpha\tPropaganda\t\tPropaganda
MAIN\tb1\talpha\tPropaganda\t\tNot Propaganda
IAA\tb1\talpha\tBias\tannot_1\tUnbiased
IAA\tb1\talpha\tBias\tannot_2\tUnclear
IAA\tb1\tbeta\tBias\tannot_1\tUnbiased
";

    #[test]
    fn test_build_report_sections_in_order() {
        let table = AnnotationTable::from_reader(TABLE.as_bytes(), '\t').unwrap();
        let report = build_report(&table).unwrap();

        let kinds: Vec<(RecordType, RowKind)> =
            report.rows().iter().map(|r| (r.s_type, r.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (RecordType::Main, RowKind::AcrossTeam),
                (RecordType::Main, RowKind::AcrossTeam),
                (RecordType::Main, RowKind::AcrossTeamAvg),
                (RecordType::Main, RowKind::AcrossTeamAvg),
                (RecordType::Iaa, RowKind::WithinTeam),
                (RecordType::Iaa, RowKind::AcrossTeam),
                (RecordType::Iaa, RowKind::WithinTeam),
                (RecordType::Iaa, RowKind::AcrossTeam),
                (RecordType::Iaa, RowKind::AcrossTeam),
                (RecordType::Iaa, RowKind::AcrossTeam),
                (RecordType::Iaa, RowKind::WithinTeamAvg),
                (RecordType::Iaa, RowKind::AcrossTeamAvg),
                (RecordType::Iaa, RowKind::AcrossTeamAvg),
            ]
        );
        assert_eq!(report.pair_count(RecordType::Main), 2);
        assert_eq!(report.pair_count(RecordType::Iaa), 6);
    }

    #[test]
    fn test_pair_missing_one_task_keeps_other() {
        let table = AnnotationTable::from_reader(TABLE.as_bytes(), '\t').unwrap();
        let report = build_report(&table).unwrap();
        let first = &report.rows()[0];

        assert_eq!(first.team_1, "alpha");
        assert_eq!(first.team_2.as_deref(), Some("beta"));
        // beta has no Propaganda labels in b1
        assert!(first.scores.keys().all(|m| m.task() == Task::Bias));
        assert!((first.scores[&Metric::BiasAccuracy] - 0.5).abs() < 1e-9);
        assert!((first.scores[&Metric::BiasGroupedF1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_iaa_rows_without_role_give_identifier_rows() {
        let input = "\
type\tbatch\tteam_name\ttask\tsheet_type\tlabel
IAA\tb1\talpha\tBias\ts1\tUnbiased
IAA\tb1\talpha\tBias\ts1\tUnclear
IAA\tb1\talpha\tBias\t\tUnbiased
IAA\tb1\talpha\tBias\t\tBiased against Israel
";
        let table = AnnotationTable::from_reader(input.as_bytes(), '\t').unwrap();
        let report = build_report(&table).unwrap();

        assert_eq!(report.pair_count(RecordType::Iaa), 2);
        let pairs: Vec<_> = report.rows().iter().filter(|r| !r.kind.is_average()).collect();
        assert_eq!(pairs[0].annot_1.as_deref(), Some("s1"));
        assert_eq!(pairs[0].annot_2, None);
        assert_eq!(pairs[1].annot_1, None);
        assert!(pairs.iter().all(|r| r.kind == RowKind::WithinTeam && r.scores.is_empty()));
    }

    #[test]
    fn test_unknown_task_rows_still_form_pairs() {
        let input = "\
type\tbatch\tteam_name\ttask\tsheet_type\tlabel
MAIN\tb1\talpha\tBias\t\tUnbiased
MAIN\tb1\tbeta\tSentiment\t\tPositive
";
        let table = AnnotationTable::from_reader(input.as_bytes(), '\t').unwrap();
        let report = build_report(&table).unwrap();

        assert_eq!(report.pair_count(RecordType::Main), 2);
        assert!(report.rows().iter().all(|r| r.scores.is_empty()));
    }

    #[test]
    fn test_empty_table_yields_empty_report() {
        let report = build_report(&AnnotationTable::default()).unwrap();
        assert!(report.is_empty());
    }
}
