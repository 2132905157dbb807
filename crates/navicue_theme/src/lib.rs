//! NaviCue design tokens
//!
//! Colors, motion durations, and the breath palette that specimens pull
//! their visual language from. Tokens are plain const-friendly data; there
//! is no lifecycle here.

pub mod color;
pub mod tokens;

pub use color::Color;
pub use tokens::{BreathPalette, ColorScheme, ColorTokens, MotionTokens, ThemeBundle};
