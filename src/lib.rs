//! Astrolabe Kit Generator
//!
//! Draws the parts needed to build a model astrolabe for a range of
//! observing latitudes, in several languages and image formats, and writes
//! a LaTeX assembly document per latitude that references the generated
//! parts. The sweep driver in [`pipeline`] is the single entry point; the
//! drawable parts live in [`component`] and write themselves through the
//! backends in [`graphics`].

pub mod component;
pub mod document;
pub mod graphics;
pub mod hashing;
pub mod paths;
pub mod pipeline;
pub mod settings;
pub mod text;
pub mod validation;

pub use component::{Climate, Component, CompositeComponent, MotherBack, MotherFront, Rete, Rule};
pub use document::{latitude_label, DocumentFields, DocumentTemplate, TemplateError};
pub use graphics::{GraphicsPage, ImageFormat, RenderError};
pub use paths::{ComponentKind, PartCoordinates};
pub use pipeline::{PipelineError, Sweep, SweepConfig, SweepManifest};
pub use settings::{AstrolabeType, Settings, Theme};
pub use text::{TextBundle, TextRegistry};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
