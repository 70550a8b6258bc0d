//! Anomalous vs normal comparison statistics
//!
//! Partitions the passengers by one method's flags and compares the two
//! groups: averages of the numeric fields, survival rate, and value
//! counts of the categorical fields.
//!
//! Every aggregate degrades to zero / empty on an empty group; nothing
//! here divides by zero or yields NaN.

use crate::error::{VoyageError, VoyageResult};
use crate::models::{ScoreMethod, ScoredPassenger};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Value → occurrence count, absent values omitted
pub type Distribution = BTreeMap<String, usize>;

/// The same measure for the anomalous and the normal group
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Comparison<T> {
    pub anomalies: T,
    pub normal: T,
}

/// Numeric fields that can be averaged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Age,
    Fare,
    FamilySize,
    /// 1.0 for survivors, 0.0 otherwise
    Survived,
}

impl NumericField {
    pub fn value(&self, record: &ScoredPassenger) -> Option<f64> {
        match self {
            NumericField::Age => record.passenger.age,
            NumericField::Fare => record.passenger.fare,
            NumericField::FamilySize => record.derived.family_size.map(f64::from),
            NumericField::Survived => record
                .passenger
                .survived
                .map(|s| if s { 1.0 } else { 0.0 }),
        }
    }
}

/// Categorical fields that can be counted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalField {
    Pclass,
    Sex,
    Embarked,
    Title,
}

impl CategoricalField {
    pub fn all() -> &'static [CategoricalField] {
        &[
            CategoricalField::Pclass,
            CategoricalField::Sex,
            CategoricalField::Embarked,
            CategoricalField::Title,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CategoricalField::Pclass => "Class",
            CategoricalField::Sex => "Sex",
            CategoricalField::Embarked => "Embarked",
            CategoricalField::Title => "Title",
        }
    }

    pub fn value(&self, record: &ScoredPassenger) -> Option<String> {
        match self {
            CategoricalField::Pclass => Some(record.passenger.pclass.to_string()),
            CategoricalField::Sex => Some(record.passenger.sex.clone()),
            CategoricalField::Embarked => record.passenger.embarked.clone(),
            CategoricalField::Title => Some(record.derived.title.clone()),
        }
    }
}

/// Mean of `field` over the records where it is present; 0 when none are
pub fn average(subset: &[&ScoredPassenger], field: NumericField) -> f64 {
    let (sum, n) = subset
        .iter()
        .filter_map(|r| field.value(r))
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Occurrence count of every present value of `field`
pub fn distribution(subset: &[&ScoredPassenger], field: CategoricalField) -> Distribution {
    let mut counts = Distribution::new();
    for value in subset.iter().filter_map(|r| field.value(r)) {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// One row of a side-by-side distribution table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionRow {
    pub value: String,
    pub anomalies: usize,
    pub normal: usize,
}

/// Comparison summary for one scoring method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub method: ScoreMethod,
    pub total: usize,
    /// Number of anomalous passengers
    pub count: usize,
    /// Anomalous share of all passengers, 0-100
    pub percentage: f64,
    pub avg_age: Comparison<f64>,
    pub avg_fare: Comparison<f64>,
    pub avg_family_size: Comparison<f64>,
    /// Survivors as a percentage of passengers with a known outcome
    pub survival_rate: Comparison<f64>,
    pub pclass_distribution: Comparison<Distribution>,
    pub sex_distribution: Comparison<Distribution>,
    pub embarked_distribution: Comparison<Distribution>,
    pub title_distribution: Comparison<Distribution>,
}

impl Statistics {
    pub fn distribution(&self, field: CategoricalField) -> &Comparison<Distribution> {
        match field {
            CategoricalField::Pclass => &self.pclass_distribution,
            CategoricalField::Sex => &self.sex_distribution,
            CategoricalField::Embarked => &self.embarked_distribution,
            CategoricalField::Title => &self.title_distribution,
        }
    }

    /// Side-by-side counts over every value seen in either group
    pub fn distribution_rows(&self, field: CategoricalField) -> Vec<DistributionRow> {
        let dist = self.distribution(field);
        let values: BTreeSet<&String> = dist.anomalies.keys().chain(dist.normal.keys()).collect();
        values
            .into_iter()
            .map(|value| DistributionRow {
                value: value.clone(),
                anomalies: dist.anomalies.get(value).copied().unwrap_or(0),
                normal: dist.normal.get(value).copied().unwrap_or(0),
            })
            .collect()
    }

    /// Anomalous minus normal survival rate, in percentage points
    pub fn survival_delta(&self) -> f64 {
        self.survival_rate.anomalies - self.survival_rate.normal
    }
}

/// Compare the passengers flagged under `method` with the rest.
///
/// `flags` must be index-aligned with `records`.
pub fn summarize(
    records: &[ScoredPassenger],
    flags: &[bool],
    method: ScoreMethod,
) -> VoyageResult<Statistics> {
    if flags.len() != records.len() {
        return Err(VoyageError::invalid(
            "flags",
            format!(
                "expected one flag per record ({}), got {}",
                records.len(),
                flags.len()
            ),
        ));
    }
    Ok(compare(records, flags, method))
}

/// Comparison over already-aligned flags; the session keeps them aligned
pub(crate) fn compare(records: &[ScoredPassenger], flags: &[bool], method: ScoreMethod) -> Statistics {
    let (anomalies, normal): (Vec<_>, Vec<_>) = records
        .iter()
        .zip(flags)
        .partition(|(_, flagged)| **flagged);
    let anomalies: Vec<&ScoredPassenger> = anomalies.into_iter().map(|(r, _)| r).collect();
    let normal: Vec<&ScoredPassenger> = normal.into_iter().map(|(r, _)| r).collect();

    let averages = |field: NumericField| Comparison {
        anomalies: average(&anomalies, field),
        normal: average(&normal, field),
    };
    let distributions = |field: CategoricalField| Comparison {
        anomalies: distribution(&anomalies, field),
        normal: distribution(&normal, field),
    };

    let count = anomalies.len();
    let percentage = if records.is_empty() {
        0.0
    } else {
        count as f64 / records.len() as f64 * 100.0
    };
    let survived = averages(NumericField::Survived);

    Statistics {
        method,
        total: records.len(),
        count,
        percentage,
        avg_age: averages(NumericField::Age),
        avg_fare: averages(NumericField::Fare),
        avg_family_size: averages(NumericField::FamilySize),
        survival_rate: Comparison {
            anomalies: survived.anomalies * 100.0,
            normal: survived.normal * 100.0,
        },
        pclass_distribution: distributions(CategoricalField::Pclass),
        sex_distribution: distributions(CategoricalField::Sex),
        embarked_distribution: distributions(CategoricalField::Embarked),
        title_distribution: distributions(CategoricalField::Title),
    }
}
