use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::RoadClass;

/// Per-road-class totals. All six classes are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassTotals(BTreeMap<RoadClass, f64>);

impl ClassTotals {
    pub fn zero() -> Self {
        Self(RoadClass::ALL.into_iter().map(|class| (class, 0.0)).collect())
    }

    /// Totals with `value` attributed entirely to `class`.
    pub fn single(class: RoadClass, value: f64) -> Self {
        let mut totals = Self::zero();
        totals.add(class, value);
        totals
    }

    pub fn add(&mut self, class: RoadClass, value: f64) {
        *self.0.entry(class).or_insert(0.0) += value;
    }

    pub fn merge(&mut self, other: &ClassTotals) {
        for (class, value) in other.iter() {
            self.add(class, value);
        }
    }

    pub fn get(&self, class: RoadClass) -> f64 {
        self.0.get(&class).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoadClass, f64)> + '_ {
        self.0.iter().map(|(class, value)| (*class, *value))
    }
}

impl Default for ClassTotals {
    fn default() -> Self {
        Self::zero()
    }
}
