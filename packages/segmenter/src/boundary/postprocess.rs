//! Per-volume post-processing of scanned boundaries.

use crate::config::TruncationRule;
use crate::text::extract_headword;
use crate::types::Boundary;

/// Trait for rules applied to a volume's boundaries after its scan.
pub trait PostProcessRule: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Check whether the rule applies to a volume.
    fn applies_to(&self, volume: &str) -> bool;

    /// Rewrite the boundary list of a volume.
    fn apply(&self, volume: &str, boundaries: Vec<Boundary>) -> Vec<Boundary>;
}

/// Drop every boundary after the one whose headword begins with `headword`.
///
/// The register volume's OCR text continues past the last headword of its
/// declared range; anything found beyond that headword is noise.
#[derive(Debug, Clone)]
pub struct TruncateAfterHeadword {
    volume: String,
    headword: String,
}

impl TruncateAfterHeadword {
    #[must_use]
    pub fn new(volume: impl Into<String>, headword: impl Into<String>) -> Self {
        Self {
            volume: volume.into(),
            headword: headword.into(),
        }
    }

    fn is_cutoff(&self, boundary: &Boundary) -> bool {
        extract_headword(&boundary.line)
            .to_lowercase()
            .starts_with(&self.headword.to_lowercase())
    }
}

impl From<&TruncationRule> for TruncateAfterHeadword {
    fn from(rule: &TruncationRule) -> Self {
        Self::new(rule.volume.clone(), rule.headword.clone())
    }
}

impl PostProcessRule for TruncateAfterHeadword {
    fn name(&self) -> &'static str {
        "truncate-after-headword"
    }

    fn applies_to(&self, volume: &str) -> bool {
        self.volume == volume
    }

    fn apply(&self, volume: &str, mut boundaries: Vec<Boundary>) -> Vec<Boundary> {
        let Some(position) = boundaries.iter().position(|b| self.is_cutoff(b)) else {
            tracing::warn!(
                volume = %volume,
                headword = %self.headword,
                "truncation headword not found, keeping all boundaries"
            );
            return boundaries;
        };

        let dropped = boundaries.len() - position - 1;
        boundaries.truncate(position + 1);
        tracing::debug!(
            volume = %volume,
            headword = %self.headword,
            dropped,
            "truncated boundaries"
        );
        boundaries
    }
}

/// Ordered collection of post-processing rules.
#[derive(Default)]
pub struct PostProcessors {
    rules: Vec<Box<dyn PostProcessRule>>,
}

impl PostProcessors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the truncation rules listed in the settings.
    #[must_use]
    pub fn from_truncation_rules(rules: &[TruncationRule]) -> Self {
        let mut processors = Self::new();
        for rule in rules {
            processors.register(TruncateAfterHeadword::from(rule));
        }
        processors
    }

    pub fn register(&mut self, rule: impl PostProcessRule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// Apply every rule that targets `volume`, in registration order.
    #[must_use]
    pub fn apply(&self, volume: &str, boundaries: Vec<Boundary>) -> Vec<Boundary> {
        self.rules
            .iter()
            .filter(|rule| rule.applies_to(volume))
            .fold(boundaries, |acc, rule| rule.apply(volume, acc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn boundaries() -> Vec<Boundary> {
        vec![
            Boundary::new(0, "<b>Abborre</b>"),
            Boundary::new(4, "<b>Öland</b>, ö"),
            Boundary::new(9, "<b>Register</b>"),
            Boundary::new(12, "<b>Tillägg</b>"),
        ]
    }

    #[test]
    fn test_truncate_after_headword() {
        let rule = TruncateAfterHeadword::new("ci", "öland");
        let result = rule.apply("ci", boundaries());
        assert_eq!(result, boundaries()[..2].to_vec());
        assert!(result.iter().all(|b| b.paragraph <= 4));
    }

    #[test]
    fn test_truncate_headword_missing_keeps_all() {
        let rule = TruncateAfterHeadword::new("ci", "Zyrjaner");
        assert_eq!(rule.apply("ci", boundaries()), boundaries());
    }

    #[test]
    fn test_post_processors_only_touch_their_volume() {
        let processors = PostProcessors::from_truncation_rules(&[TruncationRule {
            volume: "ci".into(),
            headword: "Abborre".into(),
        }]);
        assert_eq!(processors.apply("ba", boundaries()), boundaries());
        assert_eq!(processors.apply("ci", boundaries()).len(), 1);
    }
}
