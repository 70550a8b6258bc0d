//! Fixed-weight heuristic scorer

use crate::features;
use crate::models::{DerivedAttributes, Passenger, ScorePair, ScoredPassenger};
use tracing::debug;

const REFERENCE_FARE: f64 = 33.0;
const FARE_SCALE: f64 = 50.0;
const REFERENCE_AGE: f64 = 30.0;
const AGE_SCALE: f64 = 30.0;
const HIGH_FARE: f64 = 200.0;
const LARGE_FAMILY: u32 = 5;

/// Isolation-style weights: fare, age, high fare first class, large family
const ISOLATION_WEIGHTS: [f64; 4] = [0.4, 0.3, 0.2, 0.1];
/// Local-outlier-style weights: fare, age, large family
const LOCAL_OUTLIER_WEIGHTS: [f64; 3] = [0.5, 0.2, 0.3];

/// The four normalized deviations both scores are built from
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreComponents {
    pub fare_dev: f64,
    pub age_dev: f64,
    /// 1.0 for a first-class ticket above 200, else 0.0
    pub high_fare_first_class: f64,
    /// 1.0 for a family of more than 5, else 0.0
    pub large_family: f64,
}

impl ScoreComponents {
    pub fn from_passenger(passenger: &Passenger, derived: &DerivedAttributes) -> Self {
        let fare_dev = passenger
            .fare
            .map(|fare| (fare - REFERENCE_FARE).abs() / FARE_SCALE)
            .unwrap_or(0.0);
        let age_dev = passenger
            .age
            .map(|age| (age - REFERENCE_AGE).abs() / AGE_SCALE)
            .unwrap_or(0.0);
        let high_fare_first_class = match passenger.fare {
            Some(fare) if passenger.pclass == 1 && fare > HIGH_FARE => 1.0,
            _ => 0.0,
        };
        let large_family = match derived.family_size {
            Some(size) if size > LARGE_FAMILY => 1.0,
            _ => 0.0,
        };

        Self {
            fare_dev,
            age_dev,
            high_fare_first_class,
            large_family,
        }
    }

    /// Isolation-style score ("scoreA")
    pub fn isolation(&self) -> f64 {
        let [w_fare, w_age, w_class, w_family] = ISOLATION_WEIGHTS;
        w_fare * self.fare_dev
            + w_age * self.age_dev
            + w_class * self.high_fare_first_class
            + w_family * self.large_family
    }

    /// Local-outlier-style score ("scoreB")
    pub fn local_outlier(&self) -> f64 {
        let [w_fare, w_age, w_family] = LOCAL_OUTLIER_WEIGHTS;
        w_fare * self.fare_dev + w_age * self.age_dev + w_family * self.large_family
    }

    pub fn pair(&self) -> ScorePair {
        ScorePair {
            isolation: self.isolation(),
            local_outlier: self.local_outlier(),
        }
    }
}

/// Score one passenger under both methods
pub fn score(passenger: &Passenger, derived: &DerivedAttributes) -> ScorePair {
    ScoreComponents::from_passenger(passenger, derived).pair()
}

/// Derive features for and score every passenger, preserving order
pub fn score_all(passengers: Vec<Passenger>) -> Vec<ScoredPassenger> {
    let scored: Vec<ScoredPassenger> = passengers
        .into_iter()
        .map(|passenger| {
            let derived = features::derive(&passenger);
            let scores = score(&passenger, &derived);
            ScoredPassenger {
                passenger,
                derived,
                scores,
            }
        })
        .collect();

    debug!("Scored {} passengers under both methods", scored.len());
    scored
}

/// Human-readable breakdown of how a passenger's scores were reached
pub fn explain(record: &ScoredPassenger) -> String {
    let c = ScoreComponents::from_passenger(&record.passenger, &record.derived);
    let [iw_fare, iw_age, iw_class, iw_family] = ISOLATION_WEIGHTS;
    let [lw_fare, lw_age, lw_family] = LOCAL_OUTLIER_WEIGHTS;
    let mut lines = Vec::new();

    let name = record.passenger.name.as_deref().unwrap_or("<unnamed>");
    lines.push(format!("# Passenger {}: {}\n", record.passenger.id, name));

    lines.push("## Components\n".to_string());
    lines.push(format!(
        "- fare_dev: {:.4} (fare {})",
        c.fare_dev,
        fmt_opt(record.passenger.fare)
    ));
    lines.push(format!(
        "- age_dev: {:.4} (age {})",
        c.age_dev,
        fmt_opt(record.passenger.age)
    ));
    lines.push(format!(
        "- high_fare_first_class: {} (class {})",
        c.high_fare_first_class, record.passenger.pclass
    ));
    lines.push(format!(
        "- large_family: {} (family size {})\n",
        c.large_family,
        record
            .derived
            .family_size
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    ));

    lines.push(format!("## Isolation score: {:.4}\n", c.isolation()));
    lines.push(format!("- {iw_fare} × fare_dev = {:.4}", iw_fare * c.fare_dev));
    lines.push(format!("- {iw_age} × age_dev = {:.4}", iw_age * c.age_dev));
    lines.push(format!(
        "- {iw_class} × high_fare_first_class = {:.4}",
        iw_class * c.high_fare_first_class
    ));
    lines.push(format!(
        "- {iw_family} × large_family = {:.4}\n",
        iw_family * c.large_family
    ));

    lines.push(format!("## Local outlier score: {:.4}\n", c.local_outlier()));
    lines.push(format!("- {lw_fare} × fare_dev = {:.4}", lw_fare * c.fare_dev));
    lines.push(format!("- {lw_age} × age_dev = {:.4}", lw_age * c.age_dev));
    lines.push(format!(
        "- {lw_family} × large_family = {:.4}",
        lw_family * c.large_family
    ));

    lines.join("\n")
}

fn fmt_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passenger(pclass: u8, age: Option<f64>, fare: Option<f64>) -> Passenger {
        Passenger {
            age,
            fare,
            sib_sp: Some(0),
            parch: Some(0),
            ..Passenger::new(1, pclass, "female")
        }
    }

    fn score_of(p: &Passenger) -> ScorePair {
        score(p, &features::derive(p))
    }

    #[test]
    fn test_expensive_first_class_ticket() {
        let p = passenger(1, Some(30.0), Some(500.0));
        let c = ScoreComponents::from_passenger(&p, &features::derive(&p));

        assert_eq!(c.high_fare_first_class, 1.0);
        assert_eq!(c.age_dev, 0.0);
        assert!((c.fare_dev - 9.34).abs() < 1e-12);
        assert!((c.isolation() - 3.936).abs() < 1e-9, "isolation={}", c.isolation());
        assert!((c.local_outlier() - 4.67).abs() < 1e-9);
    }

    #[test]
    fn test_missing_fare_and_age_contribute_nothing() {
        let s = score_of(&passenger(3, None, None));
        assert_eq!(s.isolation, 0.0);
        assert_eq!(s.local_outlier, 0.0);
    }

    #[test]
    fn test_zero_fare_and_age_are_values_not_gaps() {
        let c = {
            let p = passenger(3, Some(0.0), Some(0.0));
            ScoreComponents::from_passenger(&p, &features::derive(&p))
        };
        assert!((c.fare_dev - 0.66).abs() < 1e-12);
        assert_eq!(c.age_dev, 1.0);
        assert!((c.isolation() - (0.4 * 0.66 + 0.3)).abs() < 1e-12);
    }

    #[test]
    fn test_high_fare_only_counts_in_first_class() {
        let p = passenger(2, None, Some(250.0));
        let c = ScoreComponents::from_passenger(&p, &features::derive(&p));
        assert_eq!(c.high_fare_first_class, 0.0);

        let p = passenger(1, None, Some(200.0));
        let c = ScoreComponents::from_passenger(&p, &features::derive(&p));
        assert_eq!(c.high_fare_first_class, 0.0, "threshold is strictly above 200");
    }

    #[test]
    fn test_large_family() {
        let mut p = passenger(3, None, None);
        p.sib_sp = Some(3);
        p.parch = Some(2);
        let s = score_of(&p);
        // family size 6
        assert!((s.isolation - 0.1).abs() < 1e-12);
        assert!((s.local_outlier - 0.3).abs() < 1e-12);

        p.parch = Some(1);
        let s = score_of(&p);
        assert_eq!(s.isolation, 0.0, "family of 5 is not large");
    }

    #[test]
    fn test_unknown_family_size_is_not_large() {
        let mut p = passenger(3, None, None);
        p.sib_sp = Some(8);
        p.parch = None;
        assert_eq!(score_of(&p).local_outlier, 0.0);
    }

    #[test]
    fn test_scores_are_non_negative_and_unclamped() {
        let s = score_of(&passenger(1, Some(80.0), Some(512.3292)));
        assert!(s.isolation > 1.0);
        assert!(s.local_outlier > 1.0);

        let s = score_of(&passenger(3, Some(0.42), Some(0.0)));
        assert!(s.isolation >= 0.0 && s.local_outlier >= 0.0);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let p = passenger(1, Some(58.0), Some(146.5208));
        let first = score_of(&p);
        let second = score_of(&p);
        assert_eq!(first.isolation.to_bits(), second.isolation.to_bits());
        assert_eq!(first.local_outlier.to_bits(), second.local_outlier.to_bits());
    }

    #[test]
    fn test_score_all_preserves_order() {
        let scored = score_all(vec![
            Passenger::new(3, 3, "male"),
            Passenger::new(1, 1, "female"),
            Passenger::new(2, 2, "male"),
        ]);
        let ids: Vec<u32> = scored.iter().map(|s| s.passenger.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_explain_mentions_both_scores() {
        let scored = score_all(vec![passenger(1, Some(30.0), Some(500.0))]);
        let text = explain(&scored[0]);
        assert!(text.contains("Isolation score: 3.9360"));
        assert!(text.contains("Local outlier score: 4.6700"));
        assert!(text.contains("age_dev: 0.0000"));
    }
}
