//! Deterministic artifact filenames.
//!
//! Every part file is named `{kind}_{abs(lat):02}{N|S}_{lang}_{type}` with
//! the format extension appended later by the rendering step, so one stem
//! serves every output format. The fields make stems injective across the
//! whole parameter sweep.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::settings::AstrolabeType;

/// The parts an astrolabe kit is made of, in the order they are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    MotherFront,
    MotherBack,
    Rete,
    Rule,
    Climate,
    /// Mother front with the climate layered on top.
    MotherFrontCombi,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MotherFront => "mother_front",
            Self::MotherBack => "mother_back",
            Self::Rete => "rete",
            Self::Rule => "rule",
            Self::Climate => "climate",
            Self::MotherFrontCombi => "mother_front_combi",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `N` for latitude >= 0 (zero counts as northern), `S` otherwise.
pub fn hemisphere_letter(latitude: i32) -> char {
    if latitude < 0 {
        'S'
    } else {
        'N'
    }
}

/// Language suffix of the assembly document stem: empty for the default
/// language, `_{lang}` for everything else.
pub fn language_suffix(language: &str) -> String {
    if language == "en" {
        String::new()
    } else {
        format!("_{language}")
    }
}

/// The sweep coordinates a part filename encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartCoordinates<'a> {
    pub kind: ComponentKind,
    pub latitude: i32,
    pub language: &'a str,
    pub astrolabe_type: AstrolabeType,
}

impl PartCoordinates<'_> {
    /// Extension-less filename of this part. Absolute latitudes below 10
    /// are zero-padded to two digits; wider magnitudes keep all digits.
    pub fn stem(&self) -> String {
        format!(
            "{}_{:02}{}_{}_{}",
            self.kind,
            self.latitude.abs(),
            hemisphere_letter(self.latitude),
            self.language,
            self.astrolabe_type
        )
    }
}

/// Extension-less filename of the assembly document for one
/// (language, type, latitude) triple. Unlike part stems this collapses the
/// default language to no suffix.
pub fn document_stem(latitude: i32, language: &str, astrolabe_type: AstrolabeType) -> String {
    format!(
        "astrolabe_{:02}{}{}_{}",
        latitude.abs(),
        hemisphere_letter(latitude),
        language_suffix(language),
        astrolabe_type
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn hemisphere_zero_is_northern() {
        assert_eq!(hemisphere_letter(0), 'N');
        assert_eq!(hemisphere_letter(52), 'N');
        assert_eq!(hemisphere_letter(-33), 'S');
    }

    #[test]
    fn stem_zero_pads_small_latitudes() {
        let coords = PartCoordinates {
            kind: ComponentKind::Rete,
            latitude: 7,
            language: "en",
            astrolabe_type: AstrolabeType::Full,
        };
        assert_eq!(coords.stem(), "rete_07N_en_full");
    }

    #[test]
    fn stem_keeps_wide_magnitudes() {
        // The resolver does not range-check; config validation does.
        let coords = PartCoordinates {
            kind: ComponentKind::Rule,
            latitude: -105,
            language: "en",
            astrolabe_type: AstrolabeType::Full,
        };
        assert_eq!(coords.stem(), "rule_105S_en_full");
    }

    #[test]
    fn stems_are_injective_over_the_sweep() {
        let mut seen = HashSet::new();
        for kind in [ComponentKind::MotherFront, ComponentKind::MotherFrontCombi] {
            for latitude in [-52, -5, 0, 5, 52] {
                for language in ["en", "fr"] {
                    for astrolabe_type in [AstrolabeType::Full, AstrolabeType::Simplified] {
                        let stem = PartCoordinates {
                            kind,
                            latitude,
                            language,
                            astrolabe_type,
                        }
                        .stem();
                        assert!(seen.insert(stem.clone()), "collision: {stem}");
                    }
                }
            }
        }
    }

    #[test]
    fn document_stem_collapses_default_language() {
        assert_eq!(
            document_stem(52, "en", AstrolabeType::Full),
            "astrolabe_52N_full"
        );
        assert_eq!(
            document_stem(-33, "fr", AstrolabeType::Simplified),
            "astrolabe_33S_fr_simplified"
        );
    }
}
