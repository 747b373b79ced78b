//! Assembly document builder.
//!
//! One LaTeX source file per (language, type, latitude) triple, produced by
//! substituting five named points into a template: the latitude label and
//! the absolute paths of the four printed parts. The template itself is a
//! contract: loading fails if any substitution point is missing.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::paths::hemisphere_letter;
use crate::text::TextBundle;

/// Extension of the emitted document sources.
pub const DOCUMENT_EXTENSION: &str = "tex";

/// The five substitution points every template must contain.
const SUBSTITUTION_POINTS: [&str; 5] = [
    "{latitude}",
    "{mother_back}",
    "{mother_front}",
    "{rule}",
    "{rete}",
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template is missing substitution point {0}")]
    MissingSubstitutionPoint(&'static str),

    #[error("failed to read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Values substituted into the template. Paths must be absolute and must
/// already exist on disk: the document is always written after the parts
/// of its iteration.
#[derive(Debug, Clone)]
pub struct DocumentFields {
    pub latitude_label: String,
    pub mother_back: PathBuf,
    pub mother_front: PathBuf,
    pub rule: PathBuf,
    pub rete: PathBuf,
}

/// Signed-magnitude latitude label, e.g. `52°N` or `33°S`.
pub fn latitude_label(latitude: i32) -> String {
    format!("{}°{}", latitude.abs(), hemisphere_letter(latitude))
}

/// A validated assembly document template.
#[derive(Debug)]
pub struct DocumentTemplate {
    text: String,
}

impl DocumentTemplate {
    /// Validate that `text` carries all five substitution points.
    pub fn from_text(text: String) -> Result<Self, TemplateError> {
        for point in SUBSTITUTION_POINTS {
            if !text.contains(point) {
                return Err(TemplateError::MissingSubstitutionPoint(point));
            }
        }
        Ok(Self { text })
    }

    /// Load a template override from disk.
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let text = fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(text)
    }

    /// The built-in template with one language's headings baked in.
    pub fn localized(texts: &TextBundle) -> Result<Self, TemplateError> {
        let text = format!(
            r"\documentclass[a4paper]{{article}}
\usepackage{{graphicx}}
\usepackage[utf8]{{inputenc}}
\begin{{document}}

\section*{{{title}}}

{latitude_caption}: {{latitude}}

{instructions}

\subsection*{{{parts_heading}}}

\begin{{itemize}}
\item {mother_back_name}: \texttt{{{{mother_back}}}}
\item {mother_front_name}: \texttt{{{{mother_front}}}}
\item {rule_name}: \texttt{{{{rule}}}}
\item {rete_name}: \texttt{{{{rete}}}}
\end{{itemize}}

\end{{document}}
",
            title = texts.title,
            latitude_caption = texts.latitude_caption,
            instructions = texts.instructions,
            parts_heading = texts.parts_heading,
            mother_back_name = texts.mother_back,
            mother_front_name = texts.mother_front,
            rule_name = texts.rule,
            rete_name = texts.rete,
        );
        Self::from_text(text)
    }

    /// Pure substitution of the five points; the template is already known
    /// to contain all of them.
    pub fn render(&self, fields: &DocumentFields) -> String {
        self.text
            .replace("{latitude}", &fields.latitude_label)
            .replace("{mother_back}", &fields.mother_back.to_string_lossy())
            .replace("{mother_front}", &fields.mother_front.to_string_lossy())
            .replace("{rule}", &fields.rule.to_string_lossy())
            .replace("{rete}", &fields.rete.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextRegistry;

    fn fields() -> DocumentFields {
        DocumentFields {
            latitude_label: latitude_label(52),
            mother_back: PathBuf::from("/out/mother_back_52N_en_full.png"),
            mother_front: PathBuf::from("/out/mother_front_combi_52N_en_full.png"),
            rule: PathBuf::from("/out/rule_52N_en_full.png"),
            rete: PathBuf::from("/out/rete_52N_en_full.png"),
        }
    }

    #[test]
    fn latitude_labels() {
        assert_eq!(latitude_label(52), "52°N");
        assert_eq!(latitude_label(-33), "33°S");
        assert_eq!(latitude_label(0), "0°N");
    }

    #[test]
    fn localized_template_renders_all_fields() {
        let registry = TextRegistry::builtin().unwrap();
        let template = DocumentTemplate::localized(registry.get("en").unwrap()).unwrap();
        let doc = template.render(&fields());
        assert!(doc.contains("52°N"));
        assert!(doc.contains("/out/mother_back_52N_en_full.png"));
        assert!(doc.contains("/out/mother_front_combi_52N_en_full.png"));
        assert!(doc.contains("/out/rule_52N_en_full.png"));
        assert!(doc.contains("/out/rete_52N_en_full.png"));
        assert!(!doc.contains("{latitude}"));
    }

    #[test]
    fn missing_point_is_rejected() {
        let err = DocumentTemplate::from_text("{latitude} {mother_back} {rule} {rete}".into())
            .unwrap_err();
        assert!(matches!(
            err,
            TemplateError::MissingSubstitutionPoint("{mother_front}")
        ));
    }
}
