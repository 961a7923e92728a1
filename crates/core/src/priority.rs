//! Triage priority labels and their extraction from free-form model output.
//!
//! The upstream model is asked to answer with `(PRIORIDAD <roman numeral>)`, but its text is
//! unreliable. [`interpret`] turns whatever came back into a fixed-format label and never fails:
//! every malformed path collapses to [`DEFAULT_PRIORITY_LABEL`], the most urgent level.

use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_PRIORITY_LABEL, PRIORITY_MARKER};
use crate::TriageError;

/// The four urgency levels of the triage scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityLevel {
    I,
    II,
    III,
    IV,
}

impl PriorityLevel {
    pub const ALL: [PriorityLevel; 4] = [
        PriorityLevel::I,
        PriorityLevel::II,
        PriorityLevel::III,
        PriorityLevel::IV,
    ];

    /// Roman numeral used in labels.
    pub fn numeral(self) -> &'static str {
        match self {
            PriorityLevel::I => "I",
            PriorityLevel::II => "II",
            PriorityLevel::III => "III",
            PriorityLevel::IV => "IV",
        }
    }
}

impl FromStr for PriorityLevel {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PriorityLevel::ALL
            .into_iter()
            .find(|level| level.numeral() == s)
            .ok_or_else(|| TriageError::InvalidInput(format!("unknown priority level: {s}")))
    }
}

/// A `"PRIORIDAD <token>"` string produced for one diagnosis request.
///
/// The token is not guaranteed to be a known numeral unless the label was produced under
/// [`LabelPolicy::Strict`]. Use [`PriorityLabel::level`] to check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityLabel(String);

impl PriorityLabel {
    pub fn from_level(level: PriorityLevel) -> Self {
        Self(format!("{PRIORITY_MARKER} {}", level.numeral()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The level named by this label, if its token is one of I, II, III or IV.
    pub fn level(&self) -> Option<PriorityLevel> {
        self.0
            .strip_prefix(PRIORITY_MARKER)
            .and_then(|rest| rest.strip_prefix(' '))
            .and_then(|token| token.parse().ok())
    }
}

impl Default for PriorityLabel {
    fn default() -> Self {
        Self(DEFAULT_PRIORITY_LABEL.to_owned())
    }
}

impl fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How strictly the extracted token is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelPolicy {
    /// Any token following the marker is passed through.
    #[default]
    Permissive,
    /// Tokens outside I, II, III and IV fall back to the default label.
    Strict,
}

impl LabelPolicy {
    fn accepts(self, label: &PriorityLabel) -> bool {
        match self {
            LabelPolicy::Permissive => true,
            LabelPolicy::Strict => label.level().is_some(),
        }
    }
}

impl FromStr for LabelPolicy {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "permissive" => Ok(LabelPolicy::Permissive),
            "strict" => Ok(LabelPolicy::Strict),
            other => Err(TriageError::InvalidInput(format!(
                "unknown label policy: {other} (expected permissive or strict)"
            ))),
        }
    }
}

/// Extract a priority label from upstream candidate text, passing any token through.
pub fn interpret(candidate_text: Option<&str>) -> PriorityLabel {
    interpret_with(candidate_text, LabelPolicy::Permissive)
}

/// Extract a priority label from upstream candidate text under the given policy.
///
/// Absent or empty text, a missing (case-sensitive) marker, or nothing after the marker all
/// yield the default label.
pub fn interpret_with(candidate_text: Option<&str>, policy: LabelPolicy) -> PriorityLabel {
    match extract(candidate_text) {
        Some(label) if policy.accepts(&label) => label,
        _ => PriorityLabel::default(),
    }
}

fn extract(candidate_text: Option<&str>) -> Option<PriorityLabel> {
    let text = candidate_text.filter(|t| !t.is_empty())?;
    let (_, after_marker) = text.split_once(PRIORITY_MARKER)?;
    let token = after_marker.split_whitespace().next()?;

    // Drops stray punctuation such as "(", ")", ":" or "." around the numeral.
    let label = format!("{PRIORITY_MARKER} {token}")
        .chars()
        .filter(|c| c.is_ascii_uppercase() || *c == ' ')
        .collect();

    Some(PriorityLabel(label))
}
