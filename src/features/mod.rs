//! Feature engineering
//!
//! Derives the per-passenger attributes the scorers and the summaries
//! rely on: an honorific title bucket, family size, whether the
//! passenger travelled alone, and whether a cabin was recorded.
//!
//! Derivation is pure and total: absent optional fields fall back to
//! "Unknown" / absent rather than failing.

use crate::models::{DerivedAttributes, Passenger};
use regex::Regex;
use std::sync::OnceLock;

/// Title used when no `", <title>."` segment is found in the name
pub const UNKNOWN_TITLE: &str = "Unknown";

const OFFICER_TITLES: &[&str] = &["Capt", "Col", "Major", "Dr", "Rev"];
const ROYALTY_TITLES: &[&str] = &["Dona", "Lady", "the Countess", "Sir", "Don", "Jonkheer"];
const MISS_TITLES: &[&str] = &["Mlle", "Ms"];
const MRS_TITLES: &[&str] = &["Mme"];

fn title_pattern() -> &'static Regex {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    TITLE.get_or_init(|| Regex::new(r",\s([^.]+)\.").expect("title regex is valid"))
}

/// Compute the derived attributes of a passenger
pub fn derive(passenger: &Passenger) -> DerivedAttributes {
    let family_size = match (passenger.sib_sp, passenger.parch) {
        // counts too large to add up leave the family size unknown
        (Some(sib_sp), Some(parch)) => sib_sp.checked_add(parch).and_then(|n| n.checked_add(1)),
        _ => None,
    };

    DerivedAttributes {
        title: passenger
            .name
            .as_deref()
            .map(extract_title)
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        family_size,
        is_alone: family_size == Some(1),
        has_cabin: passenger.cabin.is_some(),
    }
}

/// Extract and normalize the title from a `"Surname, Title. Given names"` name
pub fn extract_title(name: &str) -> String {
    title_pattern()
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| normalize_title(m.as_str().trim()).to_string())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Fold rare honorifics into their bucket; anything unlisted passes through
pub fn normalize_title(title: &str) -> &str {
    if OFFICER_TITLES.contains(&title) {
        "Officer"
    } else if ROYALTY_TITLES.contains(&title) {
        "Royalty"
    } else if MISS_TITLES.contains(&title) {
        "Miss"
    } else if MRS_TITLES.contains(&title) {
        "Mrs"
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Passenger {
        Passenger {
            name: Some(name.to_string()),
            ..Passenger::new(1, 3, "male")
        }
    }

    #[test]
    fn test_title_examples() {
        assert_eq!(extract_title("Braund, Mr. Owen Harris"), "Mr");
        assert_eq!(extract_title("Futrelle, Mrs. Jacques Heath (Lily May Peel)"), "Mrs");
        assert_eq!(extract_title("Minahan, Dr. William Edward"), "Officer");
        assert_eq!(extract_title("Aubart, Mme. Leontine Pauline"), "Mrs");
        assert_eq!(
            extract_title("Rothes, the Countess. of (Lucy Noel Martha Dyer-Edwards)"),
            "Royalty"
        );
        assert_eq!(extract_title("Palsson, Master. Gosta Leonard"), "Master");
        assert_eq!(extract_title("Reynaldo, Ms. Encarnacion"), "Miss");
        assert_eq!(extract_title("Sagesser, Mlle. Emma"), "Miss");
    }

    #[test]
    fn test_unbucketed_title_passes_through() {
        assert_eq!(extract_title("Somebody, Captain. Jack"), "Captain");
    }

    #[test]
    fn test_normalization_is_case_sensitive() {
        assert_eq!(normalize_title("dr"), "dr");
        assert_eq!(normalize_title("The Countess"), "The Countess");
    }

    #[test]
    fn test_unknown_title() {
        assert_eq!(extract_title("No comma here"), UNKNOWN_TITLE);
        assert_eq!(extract_title("Comma, but no period"), UNKNOWN_TITLE);
        assert_eq!(extract_title("Tight,Mr. NoSpace"), UNKNOWN_TITLE);
    }

    #[test]
    fn test_derive_family_features() {
        let mut p = named("Andersson, Mr. Anders Johan");
        p.sib_sp = Some(1);
        p.parch = Some(5);
        p.cabin = Some("C85".into());

        let d = derive(&p);
        assert_eq!(d.title, "Mr");
        assert_eq!(d.family_size, Some(7));
        assert!(!d.is_alone);
        assert!(d.has_cabin);
    }

    #[test]
    fn test_derive_alone() {
        let mut p = named("Braund, Mr. Owen Harris");
        p.sib_sp = Some(0);
        p.parch = Some(0);

        let d = derive(&p);
        assert_eq!(d.family_size, Some(1));
        assert!(d.is_alone);
        assert!(!d.has_cabin);
    }

    #[test]
    fn test_derive_family_size_overflow_is_unknown() {
        let mut p = named("Sage, Master. Thomas Henry");
        p.sib_sp = Some(u32::MAX);
        p.parch = Some(0);
        let d = derive(&p);
        assert_eq!(d.family_size, None);
        assert!(!d.is_alone);

        p.sib_sp = Some(u32::MAX - 1);
        assert_eq!(derive(&p).family_size, Some(u32::MAX));

        p.sib_sp = Some(u32::MAX / 2 + 1);
        p.parch = Some(u32::MAX / 2 + 1);
        assert_eq!(derive(&p).family_size, None);
    }

    #[test]
    fn test_derive_with_everything_optional_absent() {
        let d = derive(&Passenger::new(9, 2, "female"));
        assert_eq!(d.title, UNKNOWN_TITLE);
        assert_eq!(d.family_size, None);
        assert!(!d.is_alone);
        assert!(!d.has_cabin);
    }
}
