//! Reference specimens
//!
//! One fully built vignette per primitive family. These are the template the
//! wider catalog's entries follow: a config builder, a component owning its
//! stage driver and primitive, and a uniform [`crate::specimen::Specimen`]
//! implementation.

pub mod first_light;
pub mod held_ground;
pub mod letters_settle;
pub mod sealed_intent;

pub use first_light::{FirstLight, FirstLightConfig};
pub use held_ground::{HeldGround, HeldGroundConfig};
pub use letters_settle::{LettersSettle, LettersSettleConfig};
pub use sealed_intent::{SealedIntent, SealedIntentConfig};
