//! Pre-written responses used when generation is unavailable or bypassed.
//!
//! Two responders share the [`FallbackResponder`] seam:
//! - [`RiskTierFallback`]: one text per risk tier, moderate for anything unrecognized
//! - [`KeywordFallback`]: an ordered list of keyword rules, first match wins,
//!   with a mandatory default
//!
//! Both are pure and total: every input yields a non-empty text.

use std::str::FromStr;

/// Normalized risk tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskTier {
    High,
    Moderate,
    Low,
}

impl RiskTier {
    /// Case-insensitive parse; missing or unrecognized values are `Moderate`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
            Some("high") => Self::High,
            Some("low") => Self::Low,
            _ => Self::Moderate,
        }
    }
}

/// Input of a fallback decision.
#[derive(Clone, Copy, Debug)]
pub struct FallbackContext<'a> {
    /// Risk level from the prediction, as given.
    pub risk_level: Option<&'a str>,
    /// The user's own text (query or question).
    pub text: &'a str,
}

/// Strategy producing a substitute text.
pub trait FallbackResponder: Send + Sync {
    fn respond(&self, ctx: &FallbackContext<'_>) -> String;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Which responder to use for degraded generations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FallbackMode {
    #[default]
    RiskTier,
    Keyword,
}

impl FromStr for FallbackMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "risk_tier" | "risk-tier" | "tier" => Ok(Self::RiskTier),
            "keyword" | "keywords" => Ok(Self::Keyword),
            other => Err(format!("unknown fallback mode `{other}`")),
        }
    }
}

impl FallbackMode {
    pub fn responder(self) -> Box<dyn FallbackResponder> {
        match self {
            Self::RiskTier => Box::new(RiskTierFallback),
            Self::Keyword => Box::new(KeywordFallback::standard()),
        }
    }
}

/* ---------------- risk tier ---------------- */

pub const HIGH_RISK_TEXT: &str = "Based on your symptom pattern, the model suggests a higher likelihood of endometriosis. This means your symptoms align with patterns commonly seen in diagnosed cases.

**What this means:** Your combination of symptoms creates a pattern often associated with endometriosis.

**Important next steps:**
- Schedule an appointment with a gynecologist as soon as possible
- Keep detailed records of your symptoms
- Don't let anyone dismiss your concerns
- Consider bringing support to medical appointments

**Remember:** This is a screening tool, not a diagnosis. Only a healthcare provider can properly diagnose endometriosis.";

pub const MODERATE_RISK_TEXT: &str = "Your symptom pattern shows some features that could be associated with endometriosis, but the picture isn't entirely clear.

**What this means:** Some symptoms align with endometriosis patterns, but other factors might explain your experience.

**Recommended next steps:**
- Schedule a consultation with a gynecologist
- Continue tracking your symptoms
- Discuss your family history with your doctor
- Don't delay seeking care if symptoms affect your quality of life

**Keep in mind:** Many conditions can cause similar symptoms. A healthcare provider can help determine the most likely causes.";

pub const LOW_RISK_TEXT: &str = "Based on your symptom pattern, the model suggests a lower likelihood of endometriosis, though this doesn't completely rule out the condition.

**What this means:** Your symptoms don't strongly match typical endometriosis patterns, but every person's experience is unique.

**Still important:**
- Continue monitoring your symptoms
- Maintain regular gynecological check-ups
- Consult a healthcare provider if symptoms worsen
- Trust your body and advocate for your health";

/// One pre-written explanation per risk tier.
#[derive(Clone, Copy, Debug, Default)]
pub struct RiskTierFallback;

impl RiskTierFallback {
    /// Text for `risk_level`; unrecognized or missing levels get the moderate text.
    pub fn for_risk_level(risk_level: Option<&str>) -> &'static str {
        match RiskTier::from_label(risk_level) {
            RiskTier::High => HIGH_RISK_TEXT,
            RiskTier::Moderate => MODERATE_RISK_TEXT,
            RiskTier::Low => LOW_RISK_TEXT,
        }
    }
}

impl FallbackResponder for RiskTierFallback {
    fn respond(&self, ctx: &FallbackContext<'_>) -> String {
        Self::for_risk_level(ctx.risk_level).to_string()
    }

    fn name(&self) -> &'static str {
        "risk_tier"
    }
}

/* ---------------- keyword rules ---------------- */

/// Predicate over `(raw, lowercased)` text.
pub type RuleMatcher = fn(raw: &str, lower: &str) -> bool;

/// One `(predicate, response)` pair.
#[derive(Clone, Copy)]
pub struct FallbackRule {
    pub name: &'static str,
    pub matches: RuleMatcher,
    pub response: &'static str,
}

impl std::fmt::Debug for FallbackRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackRule").field("name", &self.name).finish()
    }
}

/// Ordered keyword rules evaluated top to bottom; first match wins.
#[derive(Clone, Debug)]
pub struct KeywordFallback {
    rules: Vec<FallbackRule>,
    default: &'static str,
}

impl KeywordFallback {
    pub fn new(rules: Vec<FallbackRule>, default: &'static str) -> Self {
        Self { rules, default }
    }

    /// Rule set covering, in order: probability meaning, next steps,
    /// accuracy, concerning symptoms, treatment options, "what is".
    pub fn standard() -> Self {
        Self::new(STANDARD_RULES.to_vec(), GENERAL_SUPPORT_TEXT)
    }

    pub fn rules(&self) -> &[FallbackRule] {
        &self.rules
    }

    /// Name of the first matching rule, `None` for the default.
    pub fn matching_rule(&self, text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|r| (r.matches)(text, &lower))
            .map(|r| r.name)
    }

    /// Response of the first matching rule, else the default.
    pub fn respond_to(&self, text: &str) -> &'static str {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|r| (r.matches)(text, &lower))
            .map_or(self.default, |r| r.response)
    }
}

impl FallbackResponder for KeywordFallback {
    fn respond(&self, ctx: &FallbackContext<'_>) -> String {
        self.respond_to(ctx.text).to_string()
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

const STANDARD_RULES: [FallbackRule; 6] = [
    FallbackRule {
        name: "probability",
        matches: |raw, lower| {
            lower.contains("what does") && (raw.contains('%') || lower.contains("probability"))
        },
        response: PROBABILITY_TEXT,
    },
    FallbackRule {
        name: "next_steps",
        matches: |_, lower| lower.contains("next steps") || lower.contains("what should i do"),
        response: NEXT_STEPS_TEXT,
    },
    FallbackRule {
        name: "accuracy",
        matches: |_, lower| lower.contains("accurate") || lower.contains("accuracy"),
        response: ACCURACY_TEXT,
    },
    FallbackRule {
        name: "concerning_symptoms",
        matches: |_, lower| lower.contains("concerning") || lower.contains("symptoms"),
        response: CONCERNING_SYMPTOMS_TEXT,
    },
    FallbackRule {
        name: "treatment",
        matches: |_, lower| lower.contains("treatment") || lower.contains("options"),
        response: TREATMENT_TEXT,
    },
    FallbackRule {
        name: "what_is",
        matches: |_, lower| {
            lower.contains("endometriosis")
                && (lower.contains("what is") || lower.contains("explain"))
        },
        response: WHAT_IS_TEXT,
    },
];

pub const PROBABILITY_TEXT: &str = "Your risk score indicates the likelihood that your symptoms align with patterns seen in endometriosis cases. A higher percentage means your symptom combination is more similar to diagnosed cases.

This is a screening tool to help you understand when to seek medical care. Only a healthcare professional can provide a proper diagnosis through examination and potentially imaging or surgical procedures.

I recommend scheduling an appointment with a gynecologist to discuss your symptoms and explore diagnostic options.";

pub const NEXT_STEPS_TEXT: &str = "Based on your results, here are the recommended next steps:

1. Schedule an appointment with a gynecologist as soon as possible
2. Bring your symptom tracking data to the appointment
3. Prepare a list of questions about your symptoms and concerns
4. Don't let anyone dismiss your symptoms - advocate for yourself
5. Consider bringing a support person to your appointment

Remember, early diagnosis and treatment often lead to better outcomes.";

pub const ACCURACY_TEXT: &str = "This analysis is based on machine learning patterns from symptom data, but it has important limitations:

- It's a screening tool, not a diagnostic test
- Only healthcare professionals can diagnose endometriosis
- Individual experiences vary greatly
- The tool helps identify when to seek medical care

The accuracy depends on honest symptom reporting and can help guide your healthcare decisions, but should never replace professional medical evaluation.";

pub const CONCERNING_SYMPTOMS_TEXT: &str = "The most concerning symptoms that warrant immediate medical attention include:

- Severe pelvic pain that interferes with daily activities
- Heavy bleeding that requires changing protection every hour
- Pain during intercourse that's getting worse
- Persistent digestive issues during menstruation
- Symptoms that are progressively worsening

Any combination of these symptoms, especially if they're affecting your quality of life, should be evaluated by a healthcare provider promptly.";

pub const TREATMENT_TEXT: &str = "Treatment options for endometriosis vary based on severity and symptoms:

**Pain Management:**
- Over-the-counter pain relievers
- Prescription pain medications
- Heat therapy and relaxation techniques

**Hormonal Therapy:**
- Birth control pills, patches, or rings
- Progestin therapy
- GnRH agonists

**Surgical Options:**
- Laparoscopic surgery to remove endometrial tissue
- In severe cases, more extensive surgery

The best treatment plan depends on your specific situation, symptoms, and goals. Work with a healthcare provider to develop an individualized approach.";

pub const WHAT_IS_TEXT: &str = "Endometriosis is a condition where tissue similar to the lining of the uterus grows outside the uterus. This tissue can be found on the ovaries, fallopian tubes, and other pelvic organs.

**Common symptoms include:**
- Severe menstrual cramps
- Chronic pelvic pain
- Pain during intercourse
- Heavy or irregular periods
- Digestive issues during menstruation
- Fatigue and mood changes

The condition affects about 10% of women of reproductive age and can significantly impact quality of life. Early diagnosis and treatment are important for managing symptoms and preventing complications.";

pub const GENERAL_SUPPORT_TEXT: &str = "Thank you for your question about endometriosis and your health. Based on your symptom analysis, I recommend discussing your specific concerns with a healthcare provider who can give you personalized medical advice.

If you're experiencing concerning symptoms, don't hesitate to seek medical attention. Your health and well-being are important, and healthcare providers are there to help you understand and manage your symptoms.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_risk_level_gets_text() {
        for level in [
            Some("High"),
            Some("Moderate"),
            Some("Low"),
            Some(""),
            None,
            Some("unknown"),
            Some("HIGH"),
            Some(" low "),
        ] {
            assert!(!RiskTierFallback::for_risk_level(level).is_empty());
        }
    }

    #[test]
    fn unrecognized_levels_use_moderate_text() {
        for level in [None, Some(""), Some("unknown"), Some("severe")] {
            assert_eq!(RiskTierFallback::for_risk_level(level), MODERATE_RISK_TEXT);
        }
        assert_eq!(RiskTierFallback::for_risk_level(Some("HIGH")), HIGH_RISK_TEXT);
        assert_eq!(RiskTierFallback::for_risk_level(Some("low")), LOW_RISK_TEXT);
    }

    #[test]
    fn keyword_rules_follow_priority_order() {
        let kw = KeywordFallback::standard();
        let names: Vec<_> = kw.rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "probability",
                "next_steps",
                "accuracy",
                "concerning_symptoms",
                "treatment",
                "what_is"
            ]
        );

        let cases = [
            ("What does my 75% risk score mean?", Some("probability")),
            ("What does the probability tell me?", Some("probability")),
            ("What does it mean?", None),
            ("What should I do now?", Some("next_steps")),
            // earlier rule wins over a later one
            ("What are the next steps for treatment?", Some("next_steps")),
            ("How accurate is this?", Some("accuracy")),
            ("Which symptoms are concerning?", Some("concerning_symptoms")),
            ("What treatment is there?", Some("treatment")),
            ("What is endometriosis?", Some("what_is")),
            ("Can you EXPLAIN endometriosis", Some("what_is")),
            ("Hello there", None),
        ];
        for (text, expected) in cases {
            assert_eq!(kw.matching_rule(text), expected, "{text}");
        }
    }

    #[test]
    fn unmatched_text_gets_general_support() {
        let kw = KeywordFallback::standard();
        assert_eq!(kw.respond_to(""), GENERAL_SUPPORT_TEXT);
        assert_eq!(kw.respond_to("Can it affect fertility?"), GENERAL_SUPPORT_TEXT);
    }

    #[test]
    fn custom_rules_are_evaluated_in_given_order() {
        let kw = KeywordFallback::new(
            vec![
                FallbackRule {
                    name: "a",
                    matches: |_, l| l.contains("pain"),
                    response: "A",
                },
                FallbackRule {
                    name: "b",
                    matches: |_, l| l.contains("pain"),
                    response: "B",
                },
            ],
            "D",
        );
        assert_eq!(kw.respond_to("Pain"), "A");
        assert_eq!(kw.respond_to("none"), "D");
    }

    #[test]
    fn mode_selects_responder() {
        let ctx = FallbackContext {
            risk_level: Some("High"),
            text: "What is endometriosis?",
        };
        assert_eq!(FallbackMode::RiskTier.responder().respond(&ctx), HIGH_RISK_TEXT);
        assert_eq!(FallbackMode::Keyword.responder().respond(&ctx), WHAT_IS_TEXT);
        assert_eq!("keyword".parse::<FallbackMode>().unwrap(), FallbackMode::Keyword);
    }
}
