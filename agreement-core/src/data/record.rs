//! Annotation record types and the fixed label vocabulary.

use std::fmt;
use std::str::FromStr;

/// The seven labels allowed for the Bias task.
///
/// The first four are the "biased" family collapsed by bias grouping.
pub const BIAS_VALUES: [&str; 7] = [
    "Biased against Palestine",
    "Biased against Israel",
    "Biased against both Palestine and Israel",
    "Biased against others",
    "Unbiased",
    "Unclear",
    "Not Applicable",
];

/// Distinguished positive class of the Propaganda task.
pub const PROPAGANDA_LABEL: &str = "Propaganda";

/// Which annotation round a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordType {
    /// Team-level labels, one sheet per team and batch.
    Main,
    /// Inter-annotator rows, one sheet per annotator role.
    Iaa,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "MAIN",
            Self::Iaa => "IAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "MAIN" => Ok(Self::Main),
            "IAA" => Ok(Self::Iaa),
            other => Err(format!("unknown record type '{other}'")),
        }
    }
}

/// Annotation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Bias,
    Propaganda,
}

impl Task {
    pub const ALL: [Task; 2] = [Task::Bias, Task::Propaganda];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bias => "Bias",
            Self::Propaganda => "Propaganda",
        }
    }

    /// Prefix used for this task's output metric columns.
    pub fn column_prefix(&self) -> &'static str {
        match self {
            Self::Bias => "bias",
            Self::Propaganda => "propaganda",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Bias" => Ok(Self::Bias),
            "Propaganda" => Ok(Self::Propaganda),
            other => Err(format!("unknown task '{other}'")),
        }
    }
}

/// One row of the cleaned annotation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub record_type: RecordType,
    pub batch: String,
    pub team_name: String,
    /// `None` when the task cell is not a known task. Such rows still define
    /// group keys but are never selected for scoring.
    pub task: Option<Task>,
    /// Annotator role (sheet), populated for IAA rows.
    pub sheet_type: Option<String>,
    pub label: String,
}
