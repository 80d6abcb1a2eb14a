//! Comparison units and same-batch pair enumeration.

use crate::data::record::RecordType;
use crate::data::table::AnnotationTable;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// One comparison unit: a team's sheet for a batch, optionally narrowed to an
/// annotator role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub team_name: String,
    pub batch: String,
    pub annotator: Option<String>,
}

/// Whether a pair compares a team with itself or with another team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairScope {
    WithinTeam,
    AcrossTeam,
}

impl PairScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WithinTeam => "within_team",
            Self::AcrossTeam => "across_team",
        }
    }
}

impl fmt::Display for PairScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered pair of group keys from the same batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub first: GroupKey,
    pub second: GroupKey,
}

impl Pair {
    pub fn batch(&self) -> &str {
        &self.first.batch
    }

    pub fn scope(&self) -> PairScope {
        if self.first.team_name == self.second.team_name {
            PairScope::WithinTeam
        } else {
            PairScope::AcrossTeam
        }
    }
}

/// Distinct group keys of one record type, in first-appearance order.
///
/// MAIN keys ignore the annotator role; IAA keys include it.
pub fn unique_keys(table: &AnnotationTable, record_type: RecordType) -> Vec<GroupKey> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();

    for record in table.records().iter().filter(|r| r.record_type == record_type) {
        let key = GroupKey {
            team_name: record.team_name.clone(),
            batch: record.batch.clone(),
            annotator: match record_type {
                RecordType::Main => None,
                RecordType::Iaa => record.sheet_type.clone(),
            },
        };
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }

    keys
}

/// All ordered pairs of distinct keys that share a batch.
///
/// Keys are indexed by batch first, so cross-batch pairs are never built. The
/// result follows the order a full permutation of `keys` would produce.
pub fn same_batch_pairs(keys: &[GroupKey]) -> Vec<Pair> {
    let mut by_batch: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, key) in keys.iter().enumerate() {
        by_batch.entry(key.batch.as_str()).or_default().push(idx);
    }

    let mut pairs = Vec::new();
    for (i, key) in keys.iter().enumerate() {
        for &j in &by_batch[key.batch.as_str()] {
            if i != j {
                pairs.push(Pair {
                    first: key.clone(),
                    second: keys[j].clone(),
                });
            }
        }
    }
    pairs
}

/// Team pairs over MAIN rows.
pub fn main_pairs(table: &AnnotationTable) -> Vec<Pair> {
    let pairs = same_batch_pairs(&unique_keys(table, RecordType::Main));
    tracing::info!(pairs = pairs.len(), "Enumerated MAIN team pairs");
    pairs
}

/// Annotator pairs over IAA rows.
pub fn iaa_pairs(table: &AnnotationTable) -> Vec<Pair> {
    let pairs = same_batch_pairs(&unique_keys(table, RecordType::Iaa));
    tracing::info!(pairs = pairs.len(), "Enumerated IAA annotator pairs");
    pairs
}
