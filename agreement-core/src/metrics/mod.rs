//! Metric engine: agreement statistics, label normalization, and per-pair task scores.

pub mod agreement;
pub mod normalize;
pub mod scores;

pub use agreement::{
    accuracy, accuracy_bias_grouped, accuracy_else, class_f1, cohens_kappa, macro_f1,
};
pub use normalize::{BIASED_LABEL, ELSE_LABEL, bias_group_normalize, else_normalize};
pub use scores::{Scores, score_pair};

use crate::data::record::Task;
use std::fmt;

/// A named output metric column.
///
/// Declaration order is the output column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    BiasCohenKappa,
    BiasAccuracy,
    BiasMacroF1,
    /// F1 on the grouped "Biased" class.
    BiasGroupedF1,
    PropagandaCohenKappa,
    PropagandaAccuracy,
    PropagandaMacroF1,
    /// F1 on the "Propaganda" class.
    PropagandaF1,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::BiasCohenKappa,
        Metric::BiasAccuracy,
        Metric::BiasMacroF1,
        Metric::BiasGroupedF1,
        Metric::PropagandaCohenKappa,
        Metric::PropagandaAccuracy,
        Metric::PropagandaMacroF1,
        Metric::PropagandaF1,
    ];

    /// Output column name.
    pub fn column(&self) -> &'static str {
        match self {
            Self::BiasCohenKappa => "bias_cohen_kappa",
            Self::BiasAccuracy => "bias_accuracy",
            Self::BiasMacroF1 => "bias_macro_f1",
            Self::BiasGroupedF1 => "bias*_f1",
            Self::PropagandaCohenKappa => "propaganda_cohen_kappa",
            Self::PropagandaAccuracy => "propaganda_accuracy",
            Self::PropagandaMacroF1 => "propaganda_macro_f1",
            Self::PropagandaF1 => "propaganda_f1",
        }
    }

    /// The task this metric belongs to.
    pub fn task(&self) -> Task {
        match self {
            Self::BiasCohenKappa | Self::BiasAccuracy | Self::BiasMacroF1 | Self::BiasGroupedF1 => {
                Task::Bias
            }
            _ => Task::Propaganda,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_columns_carry_task_prefix() {
        for metric in Metric::ALL {
            assert!(metric.column().starts_with(metric.task().column_prefix()));
        }
    }

    #[test]
    fn test_metric_order_is_column_order() {
        let mut sorted = Metric::ALL;
        sorted.sort();
        assert_eq!(sorted, Metric::ALL);
    }
}
