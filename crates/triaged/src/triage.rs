//! Symptom classification.
//!
//! Maps free-text symptoms plus age to a specialization and a 1..5 severity.
//! Deliberately a fixed, auditable keyword policy, not ML: an ordered rule
//! list where the first case-insensitive substring match wins.

use triage_common::model::GENERAL_PHYSICIAN;

/// Ordered specialization rules. Order is the tie-break: earlier rules take
/// precedence even when a later rule's keyword would be a closer match.
const SPECIALIZATION_RULES: &[(&str, &[&str])] = &[
    (
        "Orthopedics",
        &[
            "fracture",
            "bone",
            "broken",
            "joint",
            "knee",
            "leg",
            "ankle",
            "wrist",
            "pain in leg",
            "pain in arm",
        ],
    ),
    (
        "Cardiology",
        &[
            "heart",
            "chest",
            "palpitation",
            "attack",
            "pressure",
            "tightness",
            "cardiac",
            "pulse",
            "pain",
        ],
    ),
    (
        "Oncology",
        &[
            "tumor", "lump", "cancer", "chemo", "radiation", "growth", "mass",
        ],
    ),
];

/// Keywords that pin severity to 5 regardless of anything else in the text.
const CRITICAL_KEYWORDS: &[&str] = &["chest", "heart", "unconscious", "bleeding"];

/// Keywords that raise severity to 3 when no critical keyword matched.
const SERIOUS_KEYWORDS: &[&str] = &["fracture", "broken", "difficulty breathing"];

/// Severity added for patients over this age, clamped at 5.
const ELDERLY_AGE: u32 = 65;

/// Result of classifying one symptom report.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub specialization: &'static str,
    pub severity: u8,
}

/// Classify symptoms and age. Any input is valid; unmatched or empty text
/// yields severity 1 and the General Physician queue.
pub fn assess(symptoms: &str, age: u32) -> Assessment {
    let text = symptoms.to_lowercase();
    Assessment {
        specialization: match_specialization(&text),
        severity: severity_for(&text, age),
    }
}

fn match_specialization(lower_symptoms: &str) -> &'static str {
    for (dept, keywords) in SPECIALIZATION_RULES {
        if keywords.iter().any(|kw| lower_symptoms.contains(kw)) {
            return dept;
        }
    }
    GENERAL_PHYSICIAN
}

/// Severity bands evaluate in strict priority order: critical, then serious,
/// then mild. Text matching several bands resolves to the first.
fn severity_for(lower_symptoms: &str, age: u32) -> u8 {
    let mut score: u8 = 1;
    if CRITICAL_KEYWORDS.iter().any(|kw| lower_symptoms.contains(kw)) {
        score = 5;
    } else if SERIOUS_KEYWORDS.iter().any(|kw| lower_symptoms.contains(kw)) {
        score = 3;
    }
    if age > ELDERLY_AGE {
        score += 1;
    }
    score.min(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chest_pain_is_critical_cardiology() {
        let a = assess("severe chest pain", 70);
        assert_eq!(a.specialization, "Cardiology");
        assert_eq!(a.severity, 5);
    }

    #[test]
    fn mild_flu_is_general_physician() {
        let a = assess("mild flu", 30);
        assert_eq!(a.specialization, GENERAL_PHYSICIAN);
        assert_eq!(a.severity, 1);
    }

    #[test]
    fn critical_band_beats_serious_band() {
        // "broken" alone is serious; adding "bleeding" pins it at 5.
        assert_eq!(severity_for("broken leg and bleeding", 30), 5);
        assert_eq!(severity_for("broken leg", 30), 3);
    }

    #[test]
    fn age_adds_one_capped_at_five() {
        assert_eq!(assess("fracture", 40).severity, 3);
        assert_eq!(assess("fracture", 70).severity, 4);
        assert_eq!(assess("heart attack", 70).severity, 5);
        assert_eq!(assess("", 70).severity, 2);
    }

    #[test]
    fn rule_order_breaks_ties() {
        // "broken" hits Orthopedics before Cardiology ever sees "heart".
        let a = assess("broken heart", 25);
        assert_eq!(a.specialization, "Orthopedics");
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(assess("CHEST TIGHTNESS", 30).specialization, "Cardiology");
        assert_eq!(assess("CHEST TIGHTNESS", 30).severity, 5);
    }

    #[test]
    fn classification_is_deterministic() {
        let first = assess("lump on neck", 50);
        for _ in 0..10 {
            let again = assess("lump on neck", 50);
            assert_eq!(again.specialization, first.specialization);
            assert_eq!(again.severity, first.severity);
        }
    }

    #[test]
    fn empty_input_defaults() {
        let a = assess("", 30);
        assert_eq!(a.specialization, GENERAL_PHYSICIAN);
        assert_eq!(a.severity, 1);
    }
}
