use std::fmt;

use crate::types::labels::LabelTable;

/// Index and score of the winning class in a probability vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub class: usize,
    pub score: f32,
}

impl Prediction {
    pub fn describe(&self, labels: &LabelTable, class_index_limit: Option<usize>) -> Classification {
        Classification {
            label: labels.describe(self.class, class_index_limit).to_string(),
            score: self.score,
        }
    }
}

/// A resolved prediction: human-readable label plus confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub score: f32,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "description: {}, maxVal: {}", self.label, self.score)
    }
}

/// Index and value of the maximum entry. Ties keep the first occurrence;
/// NaN entries never win. Empty input yields `None`.
pub fn arg_max(probs: &[f32]) -> Option<Prediction> {
    let mut best: Option<Prediction> = None;
    for (class, &score) in probs.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match &best {
            Some(b) if score <= b.score => {}
            _ => best = Some(Prediction { class, score }),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arg_max_picks_maximum() {
        let p = arg_max(&[0.1, 0.9, 0.3]).unwrap();
        assert_eq!(p.class, 1);
        assert_eq!(p.score, 0.9);
    }

    #[test]
    fn arg_max_ties_keep_first() {
        let p = arg_max(&[0.2, 0.7, 0.7]).unwrap();
        assert_eq!(p.class, 1);
    }

    #[test]
    fn arg_max_empty_is_none() {
        assert!(arg_max(&[]).is_none());
    }

    #[test]
    fn arg_max_skips_nan() {
        let p = arg_max(&[0.4, f32::NAN, 0.2]).unwrap();
        assert_eq!(p.class, 0);
    }

    #[test]
    fn status_contains_label_and_score() {
        let labels: LabelTable = ["cat", "dog"].iter().map(|s| s.to_string()).collect();
        let status = Prediction { class: 1, score: 0.75 }
            .describe(&labels, None)
            .to_string();
        assert_eq!(status, "description: dog, maxVal: 0.75");
    }

    #[test]
    fn limited_index_describes_unknown() {
        let labels: LabelTable = ["cat", "dog"].iter().map(|s| s.to_string()).collect();
        let c = Prediction { class: 1, score: 0.5 }.describe(&labels, Some(1));
        assert_eq!(c.label, "Unknown");
    }
}
