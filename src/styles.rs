//! Pre-computed text styles shared by every widget that draws a label.
//!
//! `MonoTextStyle` and `TextStyle` are `const`, so the common styles are built
//! once at compile time. Labels that need a dynamic color go through
//! [`style_for`], which only swaps the color on top of a shared font reference.

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_6X10, FONT_10X20},
    },
    pixelcolor::Rgb565,
    text::{Alignment, TextStyle, TextStyleBuilder},
};
use profont::PROFONT_18_POINT;

use crate::shape::{Anchor, LabelFont};

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Centered text. Button labels, readout values.
pub const CENTERED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Center).build();

/// Left-aligned text. Buffer readout lines.
pub const LEFT_ALIGNED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Left).build();

/// Right-aligned text.
pub const RIGHT_ALIGNED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Right).build();

// =============================================================================
// Fonts
// =============================================================================

/// Small label font (6x10 pixels).
pub const LABEL_FONT: &MonoFont = &FONT_6X10;

/// Title font (10x20 pixels).
pub const TITLE_FONT: &MonoFont = &FONT_10X20;

/// Readout value font (`ProFont` 18pt).
pub const VALUE_FONT: &MonoFont = &PROFONT_18_POINT;

// =============================================================================
// Style Selection
// =============================================================================

/// Font backing a [`LabelFont`].
pub const fn font_for(font: LabelFont) -> &'static MonoFont<'static> {
    match font {
        LabelFont::Small => LABEL_FONT,
        LabelFont::Title => TITLE_FONT,
        LabelFont::Value => VALUE_FONT,
    }
}

/// Character style for a label of the given font and color.
#[inline]
pub const fn style_for(font: LabelFont, color: Rgb565) -> MonoTextStyle<'static, Rgb565> {
    MonoTextStyle::new(font_for(font), color)
}

/// Alignment style for an [`Anchor`].
pub const fn alignment_for(anchor: Anchor) -> TextStyle {
    match anchor {
        Anchor::Left => LEFT_ALIGNED,
        Anchor::Center => CENTERED,
        Anchor::Right => RIGHT_ALIGNED,
    }
}
