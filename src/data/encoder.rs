// ============================================================
// Layer 4 - One-Hot Label Encoder
// ============================================================
// Maps an Activity to a one-hot target vector and back.
//
// Two column orderings are available:
//
//   declared()  - one column per Activity in declaration order,
//                 always 6 columns. Column meaning never depends
//                 on which labels a dataset happens to contain.
//
//   observed()  - one column per DISTINCT label present, sorted.
//                 This reproduces the column layout of a
//                 get_dummies-style encoder and exists for parity
//                 runs. It shifts columns when a label is absent.
//
// Because Activity is declared in sorted order, both layouts are
// identical whenever all six labels are present.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::domain::activity::Activity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// classes[i] is the activity represented by column i
    classes: Vec<Activity>,
}

impl LabelEncoder {
    /// Fixed layout over the full declared vocabulary
    pub fn declared() -> Self {
        Self { classes: Activity::ALL.to_vec() }
    }

    /// Layout inferred from the sorted set of labels actually seen
    pub fn observed(labels: impl IntoIterator<Item = Activity>) -> Self {
        let mut classes: Vec<Activity> = labels.into_iter().collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn classes(&self) -> &[Activity] {
        &self.classes
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Column assigned to `label`, if it is part of this layout
    pub fn index_of(&self, label: Activity) -> Option<usize> {
        self.classes.iter().position(|&c| c == label)
    }

    pub fn encode(&self, label: Activity) -> Result<Vec<f32>> {
        let Some(index) = self.index_of(label) else {
            bail!("activity '{label}' is not one of the encoder's {} classes", self.num_classes());
        };
        let mut one_hot = vec![0.0; self.num_classes()];
        one_hot[index] = 1.0;
        Ok(one_hot)
    }

    /// Decode a one-hot (or score) vector by taking its argmax.
    /// The first column wins ties.
    pub fn decode(&self, vector: &[f32]) -> Result<Activity> {
        if vector.is_empty() || vector.len() != self.num_classes() {
            bail!(
                "expected a vector of length {}, got {}",
                self.num_classes(),
                vector.len()
            );
        }
        let mut best = 0;
        for (i, &v) in vector.iter().enumerate() {
            if v > vector[best] {
                best = i;
            }
        }
        Ok(self.classes[best])
    }
}
