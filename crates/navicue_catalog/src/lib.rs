//! # NaviCue Catalog
//!
//! The specimen catalog: a library of small contemplative vignettes built on
//! the motion primitives. Each specimen implements the [`Specimen`] trait,
//! drives a five-stage arc, and reports its visual state as a declarative
//! [`VisualFrame`] each tick.
//!
//! ## Quick start
//!
//! ```no_run
//! use navicue_catalog::CatalogRegistry;
//!
//! let registry = CatalogRegistry::builtin();
//! let mut specimen = registry.create("first_light").unwrap();
//! specimen.mount(Default::default());
//! specimen.tick(16.0);
//! let frame = specimen.frame();
//! println!("{:?} amplitude={:?}", frame.stage, frame.channel("amplitude"));
//! ```

pub mod error;
pub mod registry;
pub mod series;
pub mod specimen;
pub mod specimens;
pub mod telemetry;

pub use error::CatalogError;
pub use registry::{CatalogRegistry, SpecimenCtor};
pub use series::{SeriesMeta, SERIES};
pub use specimen::{
    stage_timings, KbeTag, ScalarChannel, Specimen, SpecimenInput, SpecimenMeta, VisualFrame,
};
pub use specimens::{FirstLight, HeldGround, LettersSettle, SealedIntent};
