//! Scale labels and stepping between resolution levels.

use std::fmt;

use thiserror::Error;

use super::ZoneError;

/// Direction of a zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    /// Toward finer scales (more detail).
    In,
    /// Toward coarser scales (more area).
    Out,
}

impl fmt::Display for ZoomDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoomDirection::In => write!(f, "in"),
            ZoomDirection::Out => write!(f, "out"),
        }
    }
}

/// Errors from zoom stepping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoomError {
    /// The current scale is not part of the ladder.
    #[error("scale '{0}' is not a known scale")]
    UnknownScale(String),

    /// No scale in the requested direction covers the position.
    #[error("no coverage zooming {direction} from '{from}'")]
    NoCoverage {
        from: String,
        direction: ZoomDirection,
    },
}

/// Parse a scale label into its denominator.
///
/// Accepts `1:N`, `1:NK` and `1:NM` (case-insensitive), with optional
/// spaces and thousands separators: `"1:250K"` → 250 000,
/// `"1:1M"` → 1 000 000, `"1:50,000"` → 50 000.
pub fn parse_scale(label: &str) -> Result<u64, ZoneError> {
    let invalid = || ZoneError::InvalidScale(label.to_string());

    let cleaned: String = label
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect::<String>()
        .to_ascii_uppercase();
    let denominator = cleaned.strip_prefix("1:").ok_or_else(invalid)?;

    let (digits, multiplier) = match denominator.chars().last() {
        Some('K') => (&denominator[..denominator.len() - 1], 1_000),
        Some('M') => (&denominator[..denominator.len() - 1], 1_000_000),
        _ => (denominator, 1),
    };

    let value: f64 = digits.parse().map_err(|_| invalid())?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid());
    }
    Ok((value * multiplier as f64).round() as u64)
}

/// Scale labels ordered from coarsest to finest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaleLadder {
    labels: Vec<String>,
}

impl ScaleLadder {
    /// Build a ladder from labels in any order.
    ///
    /// Labels are sorted by denominator, largest (coarsest) first.
    /// Duplicates are removed.
    pub fn from_labels<I, S>(labels: I) -> Result<Self, ZoneError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = labels
            .into_iter()
            .map(|l| {
                let label = l.into();
                parse_scale(&label).map(|d| (d, label))
            })
            .collect::<Result<Vec<_>, _>>()?;

        parsed.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        parsed.dedup_by(|a, b| a.1 == b.1);

        Ok(Self {
            labels: parsed.into_iter().map(|(_, l)| l).collect(),
        })
    }

    /// Labels from coarsest to finest.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of `label` in the ladder.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Step from `current` toward finer or coarser scales.
    ///
    /// If the adjacent scale has no coverage (per `has_coverage`), keeps
    /// stepping in the same direction until a covered scale is found.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the caller's scale unchanged, when
    /// `current` is unknown or no covered scale exists in that direction.
    pub fn step<F>(
        &self,
        current: &str,
        direction: ZoomDirection,
        has_coverage: F,
    ) -> Result<&str, ZoomError>
    where
        F: Fn(&str) -> bool,
    {
        let start = self
            .position(current)
            .ok_or_else(|| ZoomError::UnknownScale(current.to_string()))?;

        let candidates: Box<dyn Iterator<Item = &String> + '_> = match direction {
            ZoomDirection::In => Box::new(self.labels.iter().skip(start + 1)),
            ZoomDirection::Out => Box::new(self.labels[..start].iter().rev()),
        };

        candidates
            .map(String::as_str)
            .find(|label| has_coverage(label))
            .ok_or_else(|| ZoomError::NoCoverage {
                from: current.to_string(),
                direction,
            })
    }
}
