//! Per-pair, per-task score computation.

use crate::data::record::{PROPAGANDA_LABEL, RecordType, Task};
use crate::data::table::AnnotationTable;
use crate::error::Result;
use crate::metrics::Metric;
use crate::metrics::agreement::{accuracy, class_f1, cohens_kappa, macro_f1};
use crate::metrics::normalize::{BIASED_LABEL, bias_group_normalize, else_normalize};
use crate::pairs::{GroupKey, Pair};
use std::collections::BTreeMap;

/// Metric values keyed by column, iterated in output order.
pub type Scores = BTreeMap<Metric, f64>;

/// Score one task for a pair.
///
/// Returns empty scores when either side has no labels for the task.
pub fn score_pair(
    table: &AnnotationTable,
    record_type: RecordType,
    pair: &Pair,
    task: Task,
) -> Result<Scores> {
    let first = key_labels(table, record_type, &pair.first, task);
    let second = key_labels(table, record_type, &pair.second, task);

    if first.is_empty() || second.is_empty() {
        tracing::debug!(
            %record_type,
            %task,
            batch = pair.batch(),
            team_1 = %pair.first.team_name,
            team_2 = %pair.second.team_name,
            "Insufficient data, skipping task scores"
        );
        return Ok(Scores::new());
    }

    score_labels(&first, &second, task)
}

/// Labels for one side of a pair.
///
/// MAIN keys take every role. IAA keys match their role exactly, so an IAA key
/// without a role selects nothing.
fn key_labels<'t>(
    table: &'t AnnotationTable,
    record_type: RecordType,
    key: &GroupKey,
    task: Task,
) -> Vec<&'t str> {
    match (record_type, key.annotator.as_deref()) {
        (RecordType::Iaa, None) => Vec::new(),
        (_, annotator) => table.select(record_type, &key.batch, &key.team_name, task, annotator),
    }
}

/// Compute the four task metrics for two aligned label sequences.
pub fn score_labels<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B], task: Task) -> Result<Scores> {
    let mut scores = Scores::new();

    match task {
        Task::Bias => {
            scores.insert(Metric::BiasCohenKappa, cohens_kappa(a, b)?);
            scores.insert(Metric::BiasAccuracy, accuracy(a, b)?);
            scores.insert(Metric::BiasMacroF1, macro_f1(a, b)?);
            scores.insert(
                Metric::BiasGroupedF1,
                class_f1(&bias_group_normalize(a), &bias_group_normalize(b), BIASED_LABEL)?,
            );
        }
        Task::Propaganda => {
            scores.insert(Metric::PropagandaCohenKappa, cohens_kappa(a, b)?);
            scores.insert(Metric::PropagandaAccuracy, accuracy(a, b)?);
            scores.insert(Metric::PropagandaMacroF1, macro_f1(a, b)?);
            scores.insert(
                Metric::PropagandaF1,
                class_f1(&else_normalize(a), &else_normalize(b), PROPAGANDA_LABEL)?,
            );
        }
    }

    Ok(scores)
}
