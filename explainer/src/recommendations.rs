//! Static follow-up recommendations per risk tier.

use serde::{Deserialize, Serialize};

use crate::fallback::RiskTier;

/// Urgency of a recommendation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Normal,
    Low,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub action: String,
    pub description: String,
    pub priority: Priority,
}

type Row = (&'static str, &'static str, &'static str, Priority);

const HIGH: &[Row] = &[
    (
        "medical_consultation",
        "Schedule an appointment with a gynecologist",
        "Book a visit as soon as possible and mention that a screening suggested a higher likelihood of endometriosis.",
        Priority::Urgent,
    ),
    (
        "symptom_tracking",
        "Keep a detailed symptom diary",
        "Record pain intensity, timing relative to your cycle, bleeding and digestive symptoms to share with your doctor.",
        Priority::High,
    ),
    (
        "self_advocacy",
        "Advocate for your concerns",
        "Ask about diagnostic options such as imaging or laparoscopy and seek a second opinion if you feel dismissed.",
        Priority::High,
    ),
    (
        "support",
        "Bring support to appointments",
        "A trusted person can help you remember details and questions during medical visits.",
        Priority::Normal,
    ),
];

const MODERATE: &[Row] = &[
    (
        "medical_consultation",
        "Schedule a consultation with a gynecologist",
        "Discuss your symptom pattern so other possible causes can be explored alongside endometriosis.",
        Priority::High,
    ),
    (
        "symptom_tracking",
        "Continue tracking your symptoms",
        "Note how symptoms change over several cycles; patterns over time help a clinician narrow down causes.",
        Priority::Normal,
    ),
    (
        "family_history",
        "Discuss your family history",
        "Endometriosis can run in families; let your doctor know if relatives have been diagnosed.",
        Priority::Normal,
    ),
    (
        "quality_of_life",
        "Seek care if symptoms affect daily life",
        "Do not delay seeing a provider if pain or bleeding interferes with work, school or relationships.",
        Priority::Normal,
    ),
];

const LOW: &[Row] = &[
    (
        "monitoring",
        "Continue monitoring your symptoms",
        "Keep an eye on any changes in pain, bleeding or digestive symptoms around your cycle.",
        Priority::Normal,
    ),
    (
        "routine_care",
        "Maintain regular gynecological check-ups",
        "Routine visits are a good opportunity to mention any symptoms, even mild ones.",
        Priority::Low,
    ),
    (
        "medical_consultation",
        "Consult a healthcare provider if symptoms worsen",
        "A lower screening score does not rule out the condition; new or worsening symptoms deserve attention.",
        Priority::Normal,
    ),
];

/// Ordered recommendations for `risk_level`; unrecognized levels get the moderate list.
///
/// Never empty.
pub fn recommendations(risk_level: Option<&str>) -> Vec<Recommendation> {
    let rows = match RiskTier::from_label(risk_level) {
        RiskTier::High => HIGH,
        RiskTier::Moderate => MODERATE,
        RiskTier::Low => LOW,
    };
    rows.iter()
        .map(|&(category, action, description, priority)| Recommendation {
            category: category.to_string(),
            action: action.to_string(),
            description: description.to_string(),
            priority,
        })
        .collect()
}
