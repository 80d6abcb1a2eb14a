//! Pairwise agreement statistics over categorical label sequences.
//!
//! The first sequence plays the role of the reference and the second the
//! prediction. Both must be the same length.

use crate::error::{AgreementError, Result};
use crate::metrics::normalize::{bias_group_normalize, else_normalize};
use std::collections::{BTreeMap, BTreeSet};

fn check_lengths<A, B>(a: &[A], b: &[B]) -> Result<()> {
    if a.len() != b.len() {
        return Err(AgreementError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

/// Sorted union of the labels in both sequences.
fn label_set<'a, A: AsRef<str>, B: AsRef<str>>(a: &'a [A], b: &'a [B]) -> BTreeSet<&'a str> {
    a.iter()
        .map(|l| l.as_ref())
        .chain(b.iter().map(|l| l.as_ref()))
        .collect()
}

/// Calculate Cohen's Kappa for two annotators.
///
/// Returns `NaN` when chance disagreement is zero, i.e. both annotators used
/// one and the same label throughout, or when the sequences are empty.
pub fn cohens_kappa<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> Result<f64> {
    check_lengths(a, b)?;
    if a.is_empty() {
        return Ok(f64::NAN);
    }
    let n = a.len() as f64;

    let labels = label_set(a, b);
    let index: BTreeMap<&str, usize> = labels.iter().enumerate().map(|(i, l)| (*l, i)).collect();
    let k = labels.len();

    let mut confusion = vec![vec![0usize; k]; k];
    for (x, y) in a.iter().zip(b.iter()) {
        confusion[index[x.as_ref()]][index[y.as_ref()]] += 1;
    }

    let row_totals: Vec<f64> = confusion
        .iter()
        .map(|row| row.iter().sum::<usize>() as f64)
        .collect();
    let col_totals: Vec<f64> = (0..k)
        .map(|j| confusion.iter().map(|row| row[j]).sum::<usize>() as f64)
        .collect();

    let mut observed = 0.0;
    let mut expected = 0.0;
    for i in 0..k {
        for j in 0..k {
            if i != j {
                observed += confusion[i][j] as f64;
                expected += row_totals[i] * col_totals[j] / n;
            }
        }
    }

    if expected == 0.0 {
        return Ok(f64::NAN);
    }
    Ok(1.0 - observed / expected)
}

/// Fraction of positions where both sequences carry the same label.
pub fn accuracy<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> Result<f64> {
    check_lengths(a, b)?;
    if a.is_empty() {
        return Ok(f64::NAN);
    }
    let agree = a
        .iter()
        .zip(b.iter())
        .filter(|(x, y)| x.as_ref() == y.as_ref())
        .count();
    Ok(agree as f64 / a.len() as f64)
}

/// Accuracy after collapsing "Unclear" and "Not Applicable".
pub fn accuracy_else<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> Result<f64> {
    accuracy(&else_normalize(a), &else_normalize(b))
}

/// Accuracy after bias grouping.
pub fn accuracy_bias_grouped<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> Result<f64> {
    accuracy(&bias_group_normalize(a), &bias_group_normalize(b))
}

/// Per-class counts against the reference sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ClassCounts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

impl ClassCounts {
    fn tally<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B], class: &str) -> Self {
        let mut counts = Self::default();
        for (truth, pred) in a.iter().zip(b.iter()) {
            match (truth.as_ref() == class, pred.as_ref() == class) {
                (true, true) => counts.tp += 1,
                (false, true) => counts.fp += 1,
                (true, false) => counts.fn_ += 1,
                (false, false) => {}
            }
        }
        counts
    }

    /// `2tp / (2tp + fp + fn)`, zero when the class never occurs.
    fn f1(&self) -> f64 {
        let denom = 2 * self.tp + self.fp + self.fn_;
        if denom == 0 {
            0.0
        } else {
            (2 * self.tp) as f64 / denom as f64
        }
    }
}

/// Unweighted mean of per-class F1 over every label seen in either sequence.
pub fn macro_f1<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> Result<f64> {
    check_lengths(a, b)?;
    let labels = label_set(a, b);
    if labels.is_empty() {
        return Ok(0.0);
    }
    let total: f64 = labels
        .iter()
        .map(|class| ClassCounts::tally(a, b, class).f1())
        .sum();
    Ok(total / labels.len() as f64)
}

/// Micro-averaged F1 restricted to a single class.
pub fn class_f1<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B], class: &str) -> Result<f64> {
    check_lengths(a, b)?;
    Ok(ClassCounts::tally(a, b, class).f1())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_cohens_kappa_perfect() {
        let a = ["x", "y", "z", "x", "y"];
        assert!(approx(cohens_kappa(&a, &a).unwrap(), 1.0));
    }

    #[test]
    fn test_cohens_kappa_known_value() {
        // po = 0.5, pe = 0.5 -> kappa 0
        let a = ["yes", "yes", "no", "no"];
        let b = ["yes", "no", "yes", "no"];
        assert!(approx(cohens_kappa(&a, &b).unwrap(), 0.0));

        // po = 0.75, pe = 0.5 -> kappa 0.5
        let b = ["yes", "yes", "no", "yes"];
        let kappa = cohens_kappa(&a, &b).unwrap();
        // pe = (2*3 + 2*1) / 16 = 0.5
        assert!(approx(kappa, 0.5), "kappa = {kappa}");
    }

    #[test]
    fn test_cohens_kappa_single_label_is_nan() {
        let a = ["Unbiased", "Unbiased"];
        assert!(cohens_kappa(&a, &a).unwrap().is_nan());
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let a = ["x", "y"];
        let b = ["x"];
        assert!(matches!(
            cohens_kappa(&a, &b),
            Err(AgreementError::LengthMismatch { left: 2, right: 1 })
        ));
        assert!(accuracy(&a, &b).is_err());
        assert!(macro_f1(&a, &b).is_err());
        assert!(class_f1(&a, &b, "x").is_err());
    }

    #[test]
    fn test_accuracy() {
        let a = ["Unbiased", "Biased against Israel", "Unclear"];
        let b = ["Unbiased", "Biased against Palestine", "Not Applicable"];
        assert!(approx(accuracy(&a, &b).unwrap(), 1.0 / 3.0));
        assert!(approx(accuracy_else(&a, &b).unwrap(), 2.0 / 3.0));
        assert!(approx(accuracy_bias_grouped(&a, &b).unwrap(), 1.0));
    }

    #[test]
    fn test_macro_f1() {
        let a = ["p", "p", "n", "n"];
        let b = ["p", "n", "n", "n"];
        // p: tp=1 fp=0 fn=1 -> 2/3; n: tp=2 fp=1 fn=0 -> 4/5
        let expected = (2.0 / 3.0 + 4.0 / 5.0) / 2.0;
        assert!(approx(macro_f1(&a, &b).unwrap(), expected));
    }

    #[test]
    fn test_macro_f1_counts_labels_from_either_side() {
        let a = ["p", "p"];
        let b = ["p", "q"];
        // p: tp=1 fn=1 -> 2/3; q: fp=1 -> 0
        assert!(approx(macro_f1(&a, &b).unwrap(), 1.0 / 3.0));
    }

    #[test]
    fn test_class_f1_absent_class_is_zero() {
        let a = ["Not Propaganda", "Unclear"];
        let b = ["Not Propaganda", "Not Applicable"];
        assert!(approx(class_f1(&a, &b, "Propaganda").unwrap(), 0.0));
    }

    #[test]
    fn test_class_f1() {
        let a = ["Propaganda", "Propaganda", "Not Propaganda", "Not Propaganda"];
        let b = ["Propaganda", "Not Propaganda", "Propaganda", "Not Propaganda"];
        // tp=1 fp=1 fn=1 -> 0.5
        assert!(approx(class_f1(&a, &b, "Propaganda").unwrap(), 0.5));
    }
}
