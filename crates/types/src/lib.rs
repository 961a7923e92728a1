//! Validated input types shared by the triage crates.

/// Errors that can occur when building a [`SymptomReport`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReportError {
    /// The report did not contain any symptom.
    #[error("at least one symptom is required")]
    NoSymptoms,
    /// A symptom was empty or contained only whitespace.
    #[error("symptom at position {0} cannot be empty")]
    EmptySymptom(usize),
}

/// A single symptom description.
///
/// Wraps a `String` and guarantees at least one non-whitespace character. The input is trimmed
/// during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symptom(String);

impl Symptom {
    /// Creates a new `Symptom`, returning `None` when the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Option<Self> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Symptoms reported by a patient for a single request, plus the procedure they underwent, if
/// any.
///
/// Symptom order is preserved. A blank procedure name is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomReport {
    symptoms: Vec<Symptom>,
    procedure: Option<String>,
}

impl SymptomReport {
    /// Builds a report from raw request values.
    ///
    /// # Errors
    /// Returns [`ReportError::NoSymptoms`] for an empty list and
    /// [`ReportError::EmptySymptom`] for the first blank entry.
    pub fn new<I, S>(symptoms: I, procedure: Option<String>) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let symptoms = symptoms
            .into_iter()
            .enumerate()
            .map(|(i, s)| Symptom::new(s).ok_or(ReportError::EmptySymptom(i)))
            .collect::<Result<Vec<_>, _>>()?;

        if symptoms.is_empty() {
            return Err(ReportError::NoSymptoms);
        }

        let procedure = procedure
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty());

        Ok(Self {
            symptoms,
            procedure,
        })
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    pub fn procedure(&self) -> Option<&str> {
        self.procedure.as_deref()
    }

    /// Symptoms joined with `", "`, the form embedded in prompts.
    pub fn joined_symptoms(&self) -> String {
        self.symptoms
            .iter()
            .map(Symptom::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
