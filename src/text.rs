//! Localization tables.
//!
//! The registry's key set defines the recognized language codes: the CLI and
//! config validation both consult [`TextRegistry::languages`] rather than
//! keeping their own list.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Localized strings for one language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBundle {
    /// Document title, e.g. "Build Your Own Model Astrolabe".
    pub title: String,
    /// Heading of the parts listing in the assembly document.
    pub parts_heading: String,
    /// Opening paragraph of the assembly instructions.
    pub instructions: String,
    /// Caption of the latitude line, e.g. "Designed for latitude".
    pub latitude_caption: String,
    pub mother_front: String,
    pub mother_back: String,
    pub rete: String,
    pub rule: String,
    pub climate: String,
}

/// Language code → string bundle.
pub struct TextRegistry {
    tables: HashMap<String, TextBundle>,
}

const BUILTIN_TABLES: &str = r#"{
  "en": {
    "title": "Build Your Own Model Astrolabe",
    "parts_heading": "Parts of the astrolabe",
    "instructions": "Cut out the parts below, glue the climate onto the mother, and pin the rete and rule through the central hole.",
    "latitude_caption": "Designed for latitude",
    "mother_front": "Mother (front)",
    "mother_back": "Mother (back)",
    "rete": "Rete",
    "rule": "Rule",
    "climate": "Climate"
  },
  "de": {
    "title": "Bau dein eigenes Astrolabium",
    "parts_heading": "Teile des Astrolabiums",
    "instructions": "Schneide die Teile aus, klebe das Klima auf die Mater und befestige Rete und Lineal mit einer Niete durch das Mittelloch.",
    "latitude_caption": "Entworfen für Breitengrad",
    "mother_front": "Mater (Vorderseite)",
    "mother_back": "Mater (Rückseite)",
    "rete": "Rete",
    "rule": "Lineal",
    "climate": "Klima"
  },
  "fr": {
    "title": "Construisez votre astrolabe",
    "parts_heading": "Pièces de l'astrolabe",
    "instructions": "Découpez les pièces ci-dessous, collez le tympan sur la mère, puis fixez l'araignée et l'alidade par le trou central.",
    "latitude_caption": "Conçu pour la latitude",
    "mother_front": "Mère (face avant)",
    "mother_back": "Mère (face arrière)",
    "rete": "Araignée",
    "rule": "Alidade",
    "climate": "Tympan"
  },
  "es": {
    "title": "Construye tu propio astrolabio",
    "parts_heading": "Piezas del astrolabio",
    "instructions": "Recorta las piezas, pega el tímpano sobre la madre y sujeta la red y la alidada a través del orificio central.",
    "latitude_caption": "Diseñado para la latitud",
    "mother_front": "Madre (anverso)",
    "mother_back": "Madre (reverso)",
    "rete": "Red",
    "rule": "Alidada",
    "climate": "Tímpano"
  }
}"#;

impl TextRegistry {
    /// The tables compiled into the binary.
    pub fn builtin() -> Result<Self, serde_json::Error> {
        let tables: HashMap<String, TextBundle> = serde_json::from_str(BUILTIN_TABLES)?;
        Ok(Self { tables })
    }

    pub fn get(&self, language: &str) -> Option<&TextBundle> {
        self.tables.get(language)
    }

    /// The recognized language codes, sorted for stable listings.
    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        langs.sort_unstable();
        langs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_parse() {
        let registry = TextRegistry::builtin().unwrap();
        assert!(registry.get("en").is_some());
        assert!(registry.get("xx").is_none());
    }

    #[test]
    fn languages_sorted() {
        let registry = TextRegistry::builtin().unwrap();
        let langs = registry.languages();
        assert_eq!(langs, vec!["de", "en", "es", "fr"]);
    }
}
