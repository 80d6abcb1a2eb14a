//! Label normalization schemes applied before the grouped metrics.
//!
//! Every function returns a fresh vector; inputs are never modified.

use crate::data::record::BIAS_VALUES;

/// Replacement for "Unclear" and "Not Applicable".
pub const ELSE_LABEL: &str = "Un/NA";

/// Replacement for the four "Biased against ..." labels.
pub const BIASED_LABEL: &str = "Biased";

const ELSE_SOURCES: [&str; 2] = ["Unclear", "Not Applicable"];

/// Replace every label in `from` with `to`.
pub fn replace_labels<S: AsRef<str>>(labels: &[S], from: &[&str], to: &str) -> Vec<String> {
    labels
        .iter()
        .map(|label| {
            let label = label.as_ref();
            if from.contains(&label) {
                to.to_string()
            } else {
                label.to_string()
            }
        })
        .collect()
}

/// Collapse "Unclear" and "Not Applicable" into [`ELSE_LABEL`].
pub fn else_normalize<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    replace_labels(labels, &ELSE_SOURCES, ELSE_LABEL)
}

/// Else-normalize, then collapse the biased family into [`BIASED_LABEL`].
pub fn bias_group_normalize<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    replace_labels(&else_normalize(labels), &BIAS_VALUES[..4], BIASED_LABEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_else_normalize() {
        let labels = ["Unclear", "Propaganda", "Not Applicable", "Not Propaganda"];
        assert_eq!(
            else_normalize(&labels),
            vec!["Un/NA", "Propaganda", "Un/NA", "Not Propaganda"]
        );
    }

    #[test]
    fn test_bias_group_normalize() {
        let labels = [
            "Biased against both Palestine and Israel",
            "Unbiased",
            "Unclear",
            "Biased against others",
        ];
        assert_eq!(
            bias_group_normalize(&labels),
            vec!["Biased", "Unbiased", "Un/NA", "Biased"]
        );
    }

    #[test]
    fn test_normalize_leaves_input_untouched() {
        let labels = vec!["Unclear".to_string()];
        let normalized = else_normalize(&labels);
        assert_eq!(labels[0], "Unclear");
        assert_eq!(normalized[0], ELSE_LABEL);
    }
}
