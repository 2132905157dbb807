//! Token tables
//!
//! One struct per concern, bundled into light and dark themes.

use crate::color::Color;

/// Light or dark variant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

/// Surface and text colors
#[derive(Clone, Copy, Debug)]
pub struct ColorTokens {
    pub background: Color,
    pub surface: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    /// The accent that breath-synced elements pulse with
    pub breath_accent: Color,
    /// Hold-gesture tension ring
    pub tension: Color,
    /// Receipt seal glow
    pub seal: Color,
}

/// Stage dwell defaults and standard durations in milliseconds
#[derive(Clone, Copy, Debug)]
pub struct MotionTokens {
    pub arriving_ms: f64,
    pub present_ms: f64,
    pub resonant_ms: f64,
    pub afterglow_ms: f64,
    /// Default hold-gesture target
    pub hold_target_ms: f32,
    /// Default per-character materialize stagger
    pub ms_per_char: f32,
}

impl Default for MotionTokens {
    fn default() -> Self {
        Self {
            arriving_ms: 900.0,
            present_ms: 1400.0,
            resonant_ms: 2600.0,
            afterglow_ms: 1800.0,
            hold_target_ms: 3000.0,
            ms_per_char: 45.0,
        }
    }
}

/// Colors keyed to breath phases
#[derive(Clone, Copy, Debug)]
pub struct BreathPalette {
    pub inhale: Color,
    pub hold: Color,
    pub exhale: Color,
    pub rest: Color,
}

impl BreathPalette {
    /// Color for a given amplitude: rest blended toward inhale
    pub fn at_amplitude(&self, amplitude: f32) -> Color {
        self.rest.lerp(&self.inhale, amplitude)
    }
}

/// A complete theme
#[derive(Clone, Copy, Debug)]
pub struct ThemeBundle {
    pub scheme: ColorScheme,
    pub colors: ColorTokens,
    pub motion: MotionTokens,
    pub breath: BreathPalette,
}

impl ThemeBundle {
    /// The light variant
    pub fn light() -> Self {
        Self {
            scheme: ColorScheme::Light,
            colors: ColorTokens {
                background: Color::from_hex(0xF6F4EF),
                surface: Color::WHITE,
                text_primary: Color::from_hex(0x2B2B33),
                text_secondary: Color::from_hex(0x6E6E78),
                breath_accent: Color::from_hex(0x7AA6C2),
                tension: Color::from_hex(0xC2927A),
                seal: Color::from_hex(0x8FB996),
            },
            motion: MotionTokens::default(),
            breath: BreathPalette {
                inhale: Color::from_hex(0x7AA6C2),
                hold: Color::from_hex(0x94B8CF),
                exhale: Color::from_hex(0xB8CBD9),
                rest: Color::from_hex(0xE3E9EE),
            },
        }
    }

    /// The dark variant
    pub fn dark() -> Self {
        Self {
            scheme: ColorScheme::Dark,
            colors: ColorTokens {
                background: Color::from_hex(0x16161C),
                surface: Color::from_hex(0x1F1F28),
                text_primary: Color::from_hex(0xECECF1),
                text_secondary: Color::from_hex(0x9A9AA6),
                breath_accent: Color::from_hex(0x5E87A3),
                tension: Color::from_hex(0xA3755E),
                seal: Color::from_hex(0x6E9A78),
            },
            motion: MotionTokens::default(),
            breath: BreathPalette {
                inhale: Color::from_hex(0x5E87A3),
                hold: Color::from_hex(0x50748C),
                exhale: Color::from_hex(0x3C5668),
                rest: Color::from_hex(0x242D35),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breath_palette_amplitude_blend() {
        let theme = ThemeBundle::light();
        let at_rest = theme.breath.at_amplitude(0.0);
        let full = theme.breath.at_amplitude(1.0);
        assert_eq!(at_rest, theme.breath.rest);
        assert_eq!(full, theme.breath.inhale);
    }

    #[test]
    fn test_variants_disagree_on_background() {
        assert_ne!(
            ThemeBundle::light().colors.background,
            ThemeBundle::dark().colors.background
        );
    }
}
