//! Color constants and RGB565 blending for widgets.
//!
//! Widgets use the built-in `RgbColor` constants where one fits and a handful of
//! panel-specific shades otherwise. Buttons show their pressed/on state by
//! blending their base color toward white with [`brighten`].
//!
//! ## Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! - Red: 0-31 (5 bits)
//! - Green: 0-63 (6 bits)
//! - Blue: 0-31 (5 bits)

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::IntoStorage;

use crate::config::BRIGHTEN_AMOUNT;

// =============================================================================
// Standard Colors
// =============================================================================

/// Pure black (0, 0, 0). Panel background.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white (31, 63, 31). Label text on dark widgets.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red (31, 0, 0). Critical readings, compass north marker.
pub const RED: Rgb565 = Rgb565::RED;

/// Pure green (0, 63, 0). Nominal readings.
pub const GREEN: Rgb565 = Rgb565::GREEN;

/// Pure blue (0, 0, 31). Cold readings.
pub const BLUE: Rgb565 = Rgb565::BLUE;

/// Pure yellow (31, 63, 0). Warning readings, dial needles.
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

// =============================================================================
// Panel Colors
// =============================================================================

/// Orange warning color.
pub const ORANGE: Rgb565 = Rgb565::new(31, 32, 0);

/// Dark gray for frames and empty bar tracks.
pub const GRAY: Rgb565 = Rgb565::new(8, 16, 8);

/// Steel blue used as the default button base color.
pub const STEEL: Rgb565 = Rgb565::new(6, 20, 14);

/// Dark teal used for grid backgrounds.
pub const DARK_TEAL: Rgb565 = Rgb565::new(0, 20, 10);

// =============================================================================
// Blending
// =============================================================================

/// Split an Rgb565 color into its raw 5/6/5-bit channels.
fn channels(color: Rgb565) -> (i32, i32, i32) {
    let raw = color.into_storage();
    (
        ((raw >> 11) & 0x1F) as i32,
        ((raw >> 5) & 0x3F) as i32,
        (raw & 0x1F) as i32,
    )
}

/// Linear interpolation between two Rgb565 colors.
///
/// `t` is clamped to `0.0..=1.0`; integer math with an 8-bit fixed-point factor.
pub fn blend(from: Rgb565, to: Rgb565, t: f32) -> Rgb565 {
    let t_fixed = (t.clamp(0.0, 1.0) * 256.0) as i32;
    let (from_r, from_g, from_b) = channels(from);
    let (to_r, to_g, to_b) = channels(to);

    let step = |from: i32, to: i32| from + (((to - from) * t_fixed) >> 8);

    let r = step(from_r, to_r).clamp(0, 31);
    let g = step(from_g, to_g).clamp(0, 63);
    let b = step(from_b, to_b).clamp(0, 31);

    Rgb565::new(r as u8, g as u8, b as u8)
}

/// Lighter variant of `color`, shown while a button is pressed or on.
#[inline]
pub fn brighten(color: Rgb565) -> Rgb565 { blend(color, WHITE, BRIGHTEN_AMOUNT) }

/// Pick black or white text for readability on `background`.
///
/// Perceptual luminance (ITU-R BT.601) on 8-bit expanded channels.
pub fn text_color_for(background: Rgb565) -> Rgb565 {
    let (r, g, b) = channels(background);
    let luma = (77 * (r << 3) + 150 * (g << 2) + 29 * (b << 3)) >> 8;
    if luma > 140 { BLACK } else { WHITE }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_endpoints() {
        assert_eq!(blend(BLACK, WHITE, 0.0), BLACK, "t=0 should return 'from'");
        assert_eq!(blend(RED, RED, 0.5), RED, "Blending a color with itself is a no-op");
    }

    #[test]
    fn test_blend_midpoint() {
        let (r, g, b) = channels(blend(BLACK, WHITE, 0.5));
        assert!((13..=18).contains(&r), "Red should be near the midpoint, got {r}");
        assert!((28..=35).contains(&g), "Green should be near the midpoint, got {g}");
        assert!((13..=18).contains(&b), "Blue should be near the midpoint, got {b}");
    }

    #[test]
    fn test_blend_clamps_factor() {
        assert_eq!(blend(BLACK, RED, -1.0), BLACK);
        let (r, _, _) = channels(blend(BLACK, RED, 2.0));
        assert!(r >= 30, "Factor above 1 should saturate near the target");
    }

    #[test]
    fn test_brighten_is_lighter() {
        let (r0, g0, b0) = channels(STEEL);
        let (r1, g1, b1) = channels(brighten(STEEL));
        assert!(r1 > r0 && g1 > g0 && b1 > b0, "Every channel should move toward white");
        assert_ne!(brighten(STEEL), STEEL);
    }

    #[test]
    fn test_text_color_for_background() {
        assert_eq!(text_color_for(BLACK), WHITE);
        assert_eq!(text_color_for(YELLOW), BLACK);
        assert_eq!(text_color_for(BLUE), WHITE);
    }
}
