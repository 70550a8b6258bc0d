//! Core data models for anomaly-voyage
//!
//! These models are used throughout the crate for representing
//! passengers, their engineered features, and their anomaly scores.

use crate::error::{VoyageError, VoyageResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A passenger record exactly as tokenized from the source.
///
/// Every field is optional here; [`Passenger::try_from`] decides which
/// ones are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPassenger {
    pub id: Option<u32>,
    pub survived: Option<bool>,
    pub pclass: Option<u8>,
    pub name: Option<String>,
    pub sex: Option<String>,
    pub age: Option<f64>,
    pub sib_sp: Option<u32>,
    pub parch: Option<u32>,
    pub ticket: Option<String>,
    pub fare: Option<f64>,
    pub cabin: Option<String>,
    pub embarked: Option<String>,
}

/// A validated passenger.
///
/// Identifier, class and sex are always present. Everything else may be
/// unknown and is never imputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: u32,
    pub survived: Option<bool>,
    pub pclass: u8,
    pub name: Option<String>,
    pub sex: String,
    pub age: Option<f64>,
    pub sib_sp: Option<u32>,
    pub parch: Option<u32>,
    pub ticket: Option<String>,
    pub fare: Option<f64>,
    pub cabin: Option<String>,
    pub embarked: Option<String>,
}

impl Passenger {
    /// Minimal passenger with only the required fields set
    pub fn new(id: u32, pclass: u8, sex: impl Into<String>) -> Self {
        Self {
            id,
            survived: None,
            pclass,
            name: None,
            sex: sex.into(),
            age: None,
            sib_sp: None,
            parch: None,
            ticket: None,
            fare: None,
            cabin: None,
            embarked: None,
        }
    }
}

impl TryFrom<RawPassenger> for Passenger {
    type Error = VoyageError;

    fn try_from(raw: RawPassenger) -> VoyageResult<Self> {
        let record = match raw.id {
            Some(id) => format!("PassengerId={id}"),
            None => "<no id>".to_string(),
        };
        let id = raw
            .id
            .ok_or_else(|| VoyageError::malformed(&record, "missing PassengerId"))?;
        let pclass = raw
            .pclass
            .ok_or_else(|| VoyageError::malformed(&record, "missing Pclass"))?;
        if !(1..=3).contains(&pclass) {
            return Err(VoyageError::malformed(
                &record,
                format!("Pclass must be 1, 2 or 3, got {pclass}"),
            ));
        }
        let sex = raw
            .sex
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| VoyageError::malformed(&record, "missing Sex"))?;

        Ok(Self {
            id,
            survived: raw.survived,
            pclass,
            name: raw.name,
            sex,
            age: raw.age,
            sib_sp: raw.sib_sp,
            parch: raw.parch,
            ticket: raw.ticket,
            fare: raw.fare,
            cabin: raw.cabin,
            embarked: raw.embarked,
        })
    }
}

/// Features engineered from a passenger's raw fields at load time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedAttributes {
    /// Honorific bucket (Mr, Mrs, Miss, Master, Officer, Royalty, Unknown, ...)
    pub title: String,
    /// Siblings/spouses + parents/children + 1, when both counts are known
    pub family_size: Option<u32>,
    pub is_alone: bool,
    pub has_cabin: bool,
}

/// The two anomaly scoring heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMethod {
    /// "scoreA": isolation-style weighting, rewards pricey first-class tickets
    Isolation,
    /// "scoreB": local-outlier-style weighting, leans on fare and family size
    LocalOutlier,
}

impl ScoreMethod {
    pub fn all() -> &'static [ScoreMethod] {
        &[ScoreMethod::Isolation, ScoreMethod::LocalOutlier]
    }

    /// Human-readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            ScoreMethod::Isolation => "Isolation (scoreA)",
            ScoreMethod::LocalOutlier => "Local outlier (scoreB)",
        }
    }
}

impl std::fmt::Display for ScoreMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreMethod::Isolation => write!(f, "isolation"),
            ScoreMethod::LocalOutlier => write!(f, "lof"),
        }
    }
}

impl FromStr for ScoreMethod {
    type Err = VoyageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "scoreA" | "isolation" | "iforest" => Ok(ScoreMethod::Isolation),
            "scoreB" | "lof" | "local-outlier" | "local_outlier" => Ok(ScoreMethod::LocalOutlier),
            other => Err(VoyageError::invalid(
                "method",
                format!("unknown score method '{other}', expected scoreA/isolation or scoreB/lof"),
            )),
        }
    }
}

/// Both anomaly scores of one passenger. Higher = more unusual.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScorePair {
    pub isolation: f64,
    pub local_outlier: f64,
}

impl ScorePair {
    pub fn get(&self, method: ScoreMethod) -> f64 {
        match method {
            ScoreMethod::Isolation => self.isolation,
            ScoreMethod::LocalOutlier => self.local_outlier,
        }
    }
}

/// A passenger together with its derived attributes and scores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPassenger {
    #[serde(flatten)]
    pub passenger: Passenger,
    #[serde(flatten)]
    pub derived: DerivedAttributes,
    pub scores: ScorePair,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawPassenger {
        RawPassenger {
            id: Some(7),
            pclass: Some(1),
            sex: Some("male".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_try_from_keeps_optional_fields_absent() {
        let p = Passenger::try_from(raw()).expect("valid passenger");
        assert_eq!(p.id, 7);
        assert_eq!(p.age, None);
        assert_eq!(p.fare, None);
        assert_eq!(p.survived, None);
    }

    #[test]
    fn test_try_from_rejects_missing_required_fields() {
        for broken in [
            RawPassenger { id: None, ..raw() },
            RawPassenger { pclass: None, ..raw() },
            RawPassenger { sex: None, ..raw() },
            RawPassenger { sex: Some("  ".into()), ..raw() },
            RawPassenger { pclass: Some(4), ..raw() },
        ] {
            let err = Passenger::try_from(broken).unwrap_err();
            assert!(matches!(err, VoyageError::MalformedInput { .. }), "{err}");
        }
    }

    #[test]
    fn test_score_method_parsing() {
        assert_eq!("scoreA".parse::<ScoreMethod>().unwrap(), ScoreMethod::Isolation);
        assert_eq!("isolation".parse::<ScoreMethod>().unwrap(), ScoreMethod::Isolation);
        assert_eq!("scoreB".parse::<ScoreMethod>().unwrap(), ScoreMethod::LocalOutlier);
        assert_eq!("lof".parse::<ScoreMethod>().unwrap(), ScoreMethod::LocalOutlier);
        assert!(matches!(
            "scoreC".parse::<ScoreMethod>(),
            Err(VoyageError::InvalidParameter { name: "method", .. })
        ));
    }

    #[test]
    fn test_score_pair_get() {
        let pair = ScorePair {
            isolation: 1.5,
            local_outlier: 0.5,
        };
        assert_eq!(pair.get(ScoreMethod::Isolation), 1.5);
        assert_eq!(pair.get(ScoreMethod::LocalOutlier), 0.5);
    }
}
