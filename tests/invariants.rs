//! Sweep invariant tests.
//!
//! End-to-end runs against a temporary output root, verifying the
//! guarantees the assembly documents and filenames rely on.

use std::fs;
use std::path::Path;

use astrolabe_core::{
    graphics::ImageFormat,
    pipeline::{Sweep, SweepConfig, DOCUMENTS_SUBDIR, MANIFEST_FILENAME, PARTS_SUBDIR},
    settings::{AstrolabeType, Theme},
};

fn config(output_dir: &Path) -> SweepConfig {
    SweepConfig {
        languages: vec!["en".to_string()],
        astrolabe_types: vec![AstrolabeType::Full],
        latitudes: vec![52],
        formats: vec![ImageFormat::Png],
        output_dir: output_dir.to_path_buf(),
        theme: Theme::Default,
    }
}

fn part_filenames(output_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(output_dir.join(PARTS_SUBDIR))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn single_tuple_sweep_produces_six_parts_and_one_document() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = Sweep::new(config(dir.path())).unwrap().run().unwrap();

    let names = part_filenames(dir.path());
    assert_eq!(names.len(), 6, "parts: {names:?}");
    for name in &names {
        assert!(name.contains("52N_en_full"), "unexpected name {name}");
        assert!(name.ends_with(".png"));
    }
    assert_eq!(
        names,
        vec![
            "climate_52N_en_full.png",
            "mother_back_52N_en_full.png",
            "mother_front_52N_en_full.png",
            "mother_front_combi_52N_en_full.png",
            "rete_52N_en_full.png",
            "rule_52N_en_full.png",
        ]
    );

    let doc_path = dir
        .path()
        .join(DOCUMENTS_SUBDIR)
        .join("astrolabe_52N_full.tex");
    let doc = fs::read_to_string(&doc_path).unwrap();
    assert!(doc.contains("52°N"));
    for part in [
        "mother_back_52N_en_full.png",
        "mother_front_combi_52N_en_full.png",
        "rule_52N_en_full.png",
        "rete_52N_en_full.png",
    ] {
        assert!(doc.contains(part), "document does not reference {part}");
    }
    // The plain mother front is a part, but the document points at the
    // combined version only.
    assert!(!doc.contains("mother_front_52N_en_full.png"));

    assert_eq!(manifest.artifacts.len(), 6);
    assert_eq!(manifest.documents.len(), 1);
}

#[test]
fn southern_latitude_uses_s_suffix_and_label() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.latitudes = vec![-33];
    Sweep::new(config).unwrap().run().unwrap();

    for name in part_filenames(dir.path()) {
        assert!(name.contains("33S_en_full"), "unexpected name {name}");
    }

    let doc = fs::read_to_string(
        dir.path()
            .join(DOCUMENTS_SUBDIR)
            .join("astrolabe_33S_full.tex"),
    )
    .unwrap();
    assert!(doc.contains("33°S"));
}

#[test]
fn rerun_against_populated_output_root_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    Sweep::new(config(dir.path())).unwrap().run().unwrap();
    // Same directories, same filenames already on disk.
    Sweep::new(config(dir.path())).unwrap().run().unwrap();
    assert_eq!(part_filenames(dir.path()).len(), 6);
}

#[test]
fn document_references_the_last_swept_format() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.formats = vec![ImageFormat::Png, ImageFormat::Svg];
    Sweep::new(config).unwrap().run().unwrap();

    // Both formats were rendered...
    assert_eq!(part_filenames(dir.path()).len(), 12);

    // ...but the single document on disk points at the svg files, the last
    // format in the sweep ordering.
    let doc = fs::read_to_string(
        dir.path()
            .join(DOCUMENTS_SUBDIR)
            .join("astrolabe_52N_full.tex"),
    )
    .unwrap();
    assert!(doc.contains("mother_back_52N_en_full.svg"));
    assert!(!doc.contains("mother_back_52N_en_full.png"));
}

#[test]
fn composite_draws_climate_on_top_of_mother_front() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.formats = vec![ImageFormat::Svg];
    Sweep::new(config).unwrap().run().unwrap();

    let svg = fs::read_to_string(
        dir.path()
            .join(PARTS_SUBDIR)
            .join("mother_front_combi_52N_en_full.svg"),
    )
    .unwrap();
    let mother_label = svg.find("Mother (front)").unwrap();
    let climate_label = svg.find("Climate").unwrap();
    assert!(
        mother_label < climate_label,
        "climate must be painted after (on top of) the mother front"
    );
}

#[test]
fn language_and_type_axes_reach_filenames_and_documents() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.languages = vec!["en".to_string(), "fr".to_string()];
    config.astrolabe_types = vec![AstrolabeType::Full, AstrolabeType::Simplified];
    Sweep::new(config).unwrap().run().unwrap();

    // 2 languages x 2 types x 6 parts.
    let names = part_filenames(dir.path());
    assert_eq!(names.len(), 24);
    assert!(names.iter().any(|n| n.contains("52N_fr_simplified")));

    // French documents carry the language suffix, English ones do not.
    let docs_dir = dir.path().join(DOCUMENTS_SUBDIR);
    assert!(docs_dir.join("astrolabe_52N_full.tex").exists());
    assert!(docs_dir.join("astrolabe_52N_fr_full.tex").exists());
    assert!(docs_dir.join("astrolabe_52N_fr_simplified.tex").exists());
}

#[test]
fn manifest_records_every_artifact_with_digest() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = Sweep::new(config(dir.path())).unwrap().run().unwrap();

    assert!(!manifest.manifest_hash.is_empty());
    for artifact in &manifest.artifacts {
        assert!(artifact.path.exists());
        assert_eq!(artifact.sha256.len(), 64);
    }

    let on_disk = fs::read_to_string(dir.path().join(MANIFEST_FILENAME)).unwrap();
    let parsed: astrolabe_core::SweepManifest = serde_json::from_str(&on_disk).unwrap();
    assert_eq!(parsed.run_id, manifest.run_id);
    assert_eq!(parsed.artifacts.len(), 6);
}

#[test]
fn out_of_range_latitude_is_rejected_before_any_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.latitudes = vec![52, 120];
    let err = Sweep::new(config).unwrap_err();
    assert!(err.to_string().contains("latitude_range"));
    // Rejected before the output tree was touched.
    assert!(!dir.path().join(PARTS_SUBDIR).exists());
}

#[test]
fn unknown_language_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.languages = vec!["tlh".to_string()];
    assert!(Sweep::new(config).is_err());
}
