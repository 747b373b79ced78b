//! Sweep pipeline - single entry point.
//!
//! Owns the four sweep axes (languages, astrolabe types, latitudes,
//! formats) and, for every element of their Cartesian product, renders the
//! six part artifacts and writes the assembly document. Any failure aborts
//! the remaining sweep.

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use crate::component::{
    Climate, Component, CompositeComponent, MotherBack, MotherFront, Rete, Rule,
};
use crate::document::{
    latitude_label, DocumentFields, DocumentTemplate, TemplateError, DOCUMENT_EXTENSION,
};
use crate::graphics::{ImageFormat, RenderError};
use crate::hashing::{compute_manifest_hash, sha256_file};
use crate::paths::{document_stem, ComponentKind, PartCoordinates};
use crate::settings::{AstrolabeType, Settings, Theme};
use crate::text::{TextBundle, TextRegistry};
use crate::validation::{ConfigError, Validator};
use crate::ENGINE_VERSION;

/// Subdirectory of the output root holding the individual part images.
pub const PARTS_SUBDIR: &str = "astrolabe_parts";
/// Subdirectory of the output root holding the assembly document sources.
pub const DOCUMENTS_SUBDIR: &str = "astrolabes";
/// Name of the run manifest written next to the two subdirectories.
pub const MANIFEST_FILENAME: &str = "manifest.json";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("i/o failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("assembly template rejected: {0}")]
    Template(#[from] TemplateError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The four sweep axes plus output location and theme. Defaults mirror the
/// historical command line: one 52° full astrolabe in English, as PNG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    pub languages: Vec<String>,
    pub astrolabe_types: Vec<AstrolabeType>,
    pub latitudes: Vec<i32>,
    pub formats: Vec<ImageFormat>,
    pub output_dir: PathBuf,
    pub theme: Theme,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            astrolabe_types: vec![AstrolabeType::Full],
            latitudes: vec![52],
            formats: vec![ImageFormat::Png],
            output_dir: PathBuf::from("output"),
            theme: Theme::Default,
        }
    }
}

/// One artifact written during the sweep, with its coordinates and digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub kind: ComponentKind,
    pub path: PathBuf,
    pub format: ImageFormat,
    pub latitude: i32,
    pub language: String,
    pub astrolabe_type: AstrolabeType,
    pub sha256: String,
}

/// One assembly document on disk after the sweep. Rewritten once per
/// format, so the record always reflects the last format processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub path: PathBuf,
    pub latitude: i32,
    pub language: String,
    pub astrolabe_type: AstrolabeType,
}

/// Reproducibility record of one full sweep, serialized to
/// `manifest.json` in the output root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepManifest {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub engine_version: String,
    pub artifacts: Vec<ArtifactRecord>,
    pub documents: Vec<DocumentRecord>,
    pub manifest_hash: String,
}

#[derive(Debug)]
struct LanguageContext {
    code: String,
    bundle: TextBundle,
    template: DocumentTemplate,
}

/// The combinatorial driver. Construction validates the configuration and
/// resolves text tables and templates; `run` performs the sweep.
#[derive(Debug)]
pub struct Sweep {
    config: SweepConfig,
    languages: Vec<LanguageContext>,
}

impl Sweep {
    pub fn new(config: SweepConfig) -> Result<Self, PipelineError> {
        Self::with_template(config, None)
    }

    /// Like `new`, but substituting an external template file for the
    /// built-in localized one.
    pub fn with_template(
        config: SweepConfig,
        template_path: Option<&Path>,
    ) -> Result<Self, PipelineError> {
        let texts = TextRegistry::builtin()?;
        Validator::new().validate(&config, &texts)?;

        let mut languages = Vec::with_capacity(config.languages.len());
        for code in &config.languages {
            // Membership was just validated.
            let Some(bundle) = texts.get(code) else {
                continue;
            };
            let template = match template_path {
                Some(path) => DocumentTemplate::from_file(path)?,
                None => DocumentTemplate::localized(bundle)?,
            };
            languages.push(LanguageContext {
                code: code.clone(),
                bundle: bundle.clone(),
                template,
            });
        }

        Ok(Self { config, languages })
    }

    /// Run the full sweep and return the manifest of everything written.
    ///
    /// Output directories are created up front with `create_dir_all`, so
    /// re-running against a populated output root is fine. The assembly
    /// document of a (language, type, latitude) triple is rewritten once
    /// per format; after the sweep it references the last format processed.
    pub fn run(&self) -> Result<SweepManifest, PipelineError> {
        let dir_parts = self.config.output_dir.join(PARTS_SUBDIR);
        let dir_out = self.config.output_dir.join(DOCUMENTS_SUBDIR);
        for dir in [&dir_parts, &dir_out] {
            fs::create_dir_all(dir).map_err(|source| PipelineError::Io {
                path: dir.clone(),
                source,
            })?;
        }

        let mut artifacts = Vec::new();
        let mut documents: Vec<DocumentRecord> = Vec::new();

        for language in &self.languages {
            for &astrolabe_type in &self.config.astrolabe_types {
                for &latitude in &self.config.latitudes {
                    for &format in &self.config.formats {
                        info!(
                            "astrolabe {}/{} for latitude {} as {}",
                            language.code, astrolabe_type, latitude, format
                        );
                        self.run_iteration(
                            &dir_parts,
                            &dir_out,
                            language,
                            astrolabe_type,
                            latitude,
                            format,
                            &mut artifacts,
                            &mut documents,
                        )?;
                    }
                }
            }
        }

        let mut manifest = SweepManifest {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            artifacts,
            documents,
            manifest_hash: String::new(), // computed after
        };
        manifest.manifest_hash = compute_manifest_hash(&manifest)?;

        let manifest_path = self.config.output_dir.join(MANIFEST_FILENAME);
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?).map_err(
            |source| PipelineError::Io {
                path: manifest_path.clone(),
                source,
            },
        )?;

        Ok(manifest)
    }

    /// One sweep tuple: five parts, the combined front, then the document.
    #[allow(clippy::too_many_arguments)]
    fn run_iteration(
        &self,
        dir_parts: &Path,
        dir_out: &Path,
        language: &LanguageContext,
        astrolabe_type: AstrolabeType,
        latitude: i32,
        format: ImageFormat,
        artifacts: &mut Vec<ArtifactRecord>,
        documents: &mut Vec<DocumentRecord>,
    ) -> Result<(), PipelineError> {
        let settings = Settings {
            language: language.code.clone(),
            astrolabe_type,
            latitude: f64::from(latitude),
            theme: self.config.theme,
        };
        let texts = &language.bundle;

        let mother_front = MotherFront::new(&settings, texts);
        let mother_back = MotherBack::new(&settings, texts);
        let rete = Rete::new(&settings, texts);
        let rule = Rule::new(&settings, texts);
        let climate = Climate::new(&settings, texts);

        self.render_part(dir_parts, &settings, ComponentKind::MotherFront, &mother_front, format, latitude, artifacts)?;
        let mother_back_path =
            self.render_part(dir_parts, &settings, ComponentKind::MotherBack, &mother_back, format, latitude, artifacts)?;
        let rete_path =
            self.render_part(dir_parts, &settings, ComponentKind::Rete, &rete, format, latitude, artifacts)?;
        let rule_path =
            self.render_part(dir_parts, &settings, ComponentKind::Rule, &rule, format, latitude, artifacts)?;
        self.render_part(dir_parts, &settings, ComponentKind::Climate, &climate, format, latitude, artifacts)?;

        // Combined mother front and climate, climate on top.
        let combi = CompositeComponent::new(
            &settings,
            vec![
                Box::new(MotherFront::new(&settings, texts)),
                Box::new(Climate::new(&settings, texts)),
            ],
        );
        let combi_path = self.render_part(
            dir_parts,
            &settings,
            ComponentKind::MotherFrontCombi,
            &combi,
            format,
            latitude,
            artifacts,
        )?;

        let fields = DocumentFields {
            latitude_label: latitude_label(latitude),
            mother_back: absolute(&mother_back_path)?,
            mother_front: absolute(&combi_path)?,
            rule: absolute(&rule_path)?,
            rete: absolute(&rete_path)?,
        };
        let doc = language.template.render(&fields);
        let doc_path = dir_out
            .join(document_stem(latitude, &language.code, astrolabe_type))
            .with_extension(DOCUMENT_EXTENSION);
        fs::write(&doc_path, doc).map_err(|source| PipelineError::Io {
            path: doc_path.clone(),
            source,
        })?;
        debug!("wrote {}", doc_path.display());

        let record = DocumentRecord {
            path: doc_path,
            latitude,
            language: language.code.clone(),
            astrolabe_type,
        };
        match documents.iter_mut().find(|d| d.path == record.path) {
            Some(existing) => *existing = record,
            None => documents.push(record),
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn render_part(
        &self,
        dir_parts: &Path,
        settings: &Settings,
        kind: ComponentKind,
        component: &dyn Component,
        format: ImageFormat,
        latitude: i32,
        artifacts: &mut Vec<ArtifactRecord>,
    ) -> Result<PathBuf, PipelineError> {
        let coords = PartCoordinates {
            kind,
            latitude,
            language: &settings.language,
            astrolabe_type: settings.astrolabe_type,
        };
        let stem = dir_parts.join(coords.stem());
        let path = component.render_to_file(&stem, format)?;
        debug!("wrote {}", path.display());

        let sha256 = sha256_file(&path).map_err(|source| PipelineError::Io {
            path: path.clone(),
            source,
        })?;
        artifacts.push(ArtifactRecord {
            kind,
            path: path.clone(),
            format,
            latitude,
            language: settings.language.clone(),
            astrolabe_type: settings.astrolabe_type,
            sha256,
        });
        Ok(path)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, PipelineError> {
    std::path::absolute(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}
