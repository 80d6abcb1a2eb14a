//! # agreement-core: inter-annotator and inter-team agreement metrics
//!
//! Reads a cleaned annotation table for the Bias and Propaganda tasks, pairs up
//! team sheets (MAIN rows) and annotator sheets (IAA rows) that share a batch,
//! scores every pair with Cohen's kappa, accuracy, macro F1 and a single-class
//! F1, and averages the pairwise scores per team.
//!
//! ```no_run
//! use agreement_core::{AgreementConfig, pipeline};
//!
//! let config = AgreementConfig {
//!     input: Some("team_data.tsv".into()),
//!     ..Default::default()
//! };
//! let summary = pipeline::run(&config)?;
//! println!("wrote {}", summary.output_path.display());
//! # Ok::<(), agreement_core::AgreementError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod pairs;
pub mod pipeline;
pub mod report;

pub use aggregate::{MetricRow, RowKind};
pub use config::{AgreementConfig, ConfigOverrides, load_config};
pub use data::{AnnotationRecord, AnnotationTable, BIAS_VALUES, RecordType, Task};
pub use error::{AgreementError, Result};
pub use metrics::{Metric, Scores};
pub use pairs::{GroupKey, Pair, PairScope};
pub use pipeline::RunSummary;
pub use report::MetricsReport;
