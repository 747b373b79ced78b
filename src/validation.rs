//! Configuration checking.
//!
//! Rules produce structured violations; any violation rejects the whole
//! configuration before the first sweep iteration runs.

use std::fmt;
use thiserror::Error;

use crate::pipeline::SweepConfig;
use crate::text::TextRegistry;

#[derive(Debug, Clone)]
pub struct ConfigViolation {
    pub rule: &'static str,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule, self.message)?;
        if let (Some(expected), Some(actual)) = (&self.expected, &self.actual) {
            write!(f, " (expected {expected}, got {actual})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("configuration rejected: {}", .violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct ConfigError {
    pub violations: Vec<ConfigViolation>,
}

/// One check over the sweep configuration.
pub trait ConfigRule {
    fn name(&self) -> &'static str;
    fn check(&self, config: &SweepConfig, texts: &TextRegistry) -> Vec<ConfigViolation>;
}

struct LatitudeRangeRule;

impl ConfigRule for LatitudeRangeRule {
    fn name(&self) -> &'static str {
        "latitude_range"
    }

    fn check(&self, config: &SweepConfig, _texts: &TextRegistry) -> Vec<ConfigViolation> {
        config
            .latitudes
            .iter()
            .filter(|lat| lat.abs() > 90)
            .map(|lat| ConfigViolation {
                rule: self.name(),
                message: format!("latitude {lat} is outside the globe"),
                expected: Some("-90..=90".to_string()),
                actual: Some(lat.to_string()),
            })
            .collect()
    }
}

struct LanguageRule;

impl ConfigRule for LanguageRule {
    fn name(&self) -> &'static str {
        "language"
    }

    fn check(&self, config: &SweepConfig, texts: &TextRegistry) -> Vec<ConfigViolation> {
        config
            .languages
            .iter()
            .filter(|lang| texts.get(lang).is_none())
            .map(|lang| ConfigViolation {
                rule: self.name(),
                message: format!("no text tables for language '{lang}'"),
                expected: Some(texts.languages().join(", ")),
                actual: Some(lang.clone()),
            })
            .collect()
    }
}

struct AxesRule;

impl ConfigRule for AxesRule {
    fn name(&self) -> &'static str {
        "axes"
    }

    fn check(&self, config: &SweepConfig, _texts: &TextRegistry) -> Vec<ConfigViolation> {
        let mut violations = vec![];
        let axes: [(&str, bool); 4] = [
            ("languages", config.languages.is_empty()),
            ("types", config.astrolabe_types.is_empty()),
            ("latitudes", config.latitudes.is_empty()),
            ("formats", config.formats.is_empty()),
        ];
        for (axis, empty) in axes {
            if empty {
                violations.push(ConfigViolation {
                    rule: self.name(),
                    message: format!("the {axis} axis is empty, nothing to sweep"),
                    expected: None,
                    actual: None,
                });
            }
        }
        violations
    }
}

/// Runs every rule and folds the violations into one error.
pub struct Validator {
    rules: Vec<Box<dyn ConfigRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(AxesRule),
                Box::new(LatitudeRangeRule),
                Box::new(LanguageRule),
            ],
        }
    }

    pub fn validate(&self, config: &SweepConfig, texts: &TextRegistry) -> Result<(), ConfigError> {
        let violations: Vec<ConfigViolation> = self
            .rules
            .iter()
            .flat_map(|rule| rule.check(config, texts))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError { violations })
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::ImageFormat;
    use crate::settings::{AstrolabeType, Theme};
    use std::path::PathBuf;

    fn config() -> SweepConfig {
        SweepConfig {
            languages: vec!["en".to_string()],
            astrolabe_types: vec![AstrolabeType::Full],
            latitudes: vec![52],
            formats: vec![ImageFormat::Png],
            output_dir: PathBuf::from("output"),
            theme: Theme::Default,
        }
    }

    #[test]
    fn accepts_the_default_shape() {
        let texts = TextRegistry::builtin().unwrap();
        assert!(Validator::new().validate(&config(), &texts).is_ok());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let texts = TextRegistry::builtin().unwrap();
        let mut config = config();
        config.latitudes = vec![52, 91, -120];
        let err = Validator::new().validate(&config, &texts).unwrap_err();
        assert_eq!(err.violations.len(), 2);
        assert!(err.to_string().contains("latitude_range"));
    }

    #[test]
    fn rejects_unknown_language() {
        let texts = TextRegistry::builtin().unwrap();
        let mut config = config();
        config.languages = vec!["tlh".to_string()];
        let err = Validator::new().validate(&config, &texts).unwrap_err();
        assert!(err.to_string().contains("tlh"));
    }

    #[test]
    fn rejects_empty_axes() {
        let texts = TextRegistry::builtin().unwrap();
        let mut config = config();
        config.formats = vec![];
        assert!(Validator::new().validate(&config, &texts).is_err());
    }
}
