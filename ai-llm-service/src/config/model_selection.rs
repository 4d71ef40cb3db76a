/// How the gateway decides which hosted model receives a prompt.
///
/// The two variants replace what used to be two separate clients: one bound
/// to a single model, one probing a short list of candidates.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::model_selection::ModelSelection;
///
/// let sel = ModelSelection::probe(["gpt2", "distilgpt2"], "gpt2");
/// assert_eq!(sel.candidates(), vec!["gpt2", "distilgpt2"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSelection {
    /// Always send prompts to this model; no probing.
    Fixed(String),
    /// Probe `candidates` in order once per process and pin the first one
    /// answering 200 or 503. `last_resort` is pinned when none does.
    Probe {
        candidates: Vec<String>,
        last_resort: String,
    },
}

impl ModelSelection {
    /// Builds a probe selection from any list of model ids.
    pub fn probe<I, S>(candidates: I, last_resort: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Probe {
            candidates: candidates.into_iter().map(Into::into).collect(),
            last_resort: last_resort.into(),
        }
    }

    /// Ordered candidate ids (a single id for [`ModelSelection::Fixed`]).
    pub fn candidates(&self) -> Vec<&str> {
        match self {
            Self::Fixed(model) => vec![model.as_str()],
            Self::Probe { candidates, .. } => candidates.iter().map(String::as_str).collect(),
        }
    }

    /// Short label used in logs and the health route.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fixed(_) => "fixed",
            Self::Probe { .. } => "probe",
        }
    }
}
