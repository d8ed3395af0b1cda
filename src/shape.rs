//! Display-list primitives: the only way widgets reach the screen.
//!
//! Widgets never hold a draw target. Each one describes itself as a list of
//! [`Shape`]s in absolute screen coordinates, and the host rasterises that list
//! onto any `DrawTarget<Color = Rgb565>` with [`draw_all`]. This keeps the widget
//! tree object-safe and lets tests inspect exactly what a widget would draw.

use std::sync::Arc;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Ellipse, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::styles::{alignment_for, style_for};

/// Font size class of a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LabelFont {
    /// 6x10 label font.
    #[default]
    Small,
    /// 10x20 title font.
    Title,
    /// `ProFont` 18pt value font.
    Value,
}

/// Horizontal anchoring of a label relative to its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Anchor {
    Left,
    #[default]
    Center,
    Right,
}

/// One drawable primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Filled rectangle.
    Rect { area: Rectangle, fill: Rgb565 },
    /// Rectangle outline.
    Frame { area: Rectangle, color: Rgb565, width: u32 },
    /// Filled ellipse inscribed in `area`.
    Oval { area: Rectangle, fill: Rgb565 },
    /// Ellipse outline inscribed in `area`.
    Ring { area: Rectangle, color: Rgb565, width: u32 },
    /// Straight line.
    Line { start: Point, end: Point, color: Rgb565, width: u32 },
    /// Text baseline-positioned at `position`.
    Label {
        text: String,
        position: Point,
        color: Rgb565,
        font: LabelFont,
        anchor: Anchor,
    },
    /// Row-major pixel block covering `area`.
    Image { area: Rectangle, pixels: Arc<[Rgb565]> },
}

impl Shape {
    /// Centered small label, the most common label in the panel.
    pub fn label(text: impl Into<String>, position: Point, color: Rgb565) -> Self {
        Self::Label {
            text: text.into(),
            position,
            color,
            font: LabelFont::Small,
            anchor: Anchor::Center,
        }
    }

    /// Move the shape by `offset`.
    pub fn translate(&mut self, offset: Point) {
        match self {
            Self::Rect { area, .. }
            | Self::Frame { area, .. }
            | Self::Oval { area, .. }
            | Self::Ring { area, .. }
            | Self::Image { area, .. } => area.top_left += offset,
            Self::Line { start, end, .. } => {
                *start += offset;
                *end += offset;
            }
            Self::Label { position, .. } => *position += offset,
        }
    }

    /// Rasterise the shape onto `target`.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        match self {
            Self::Rect { area, fill } => area.into_styled(PrimitiveStyle::with_fill(*fill)).draw(target),
            Self::Frame { area, color, width } => {
                area.into_styled(PrimitiveStyle::with_stroke(*color, *width)).draw(target)
            }
            Self::Oval { area, fill } => Ellipse::new(area.top_left, area.size)
                .into_styled(PrimitiveStyle::with_fill(*fill))
                .draw(target),
            Self::Ring { area, color, width } => Ellipse::new(area.top_left, area.size)
                .into_styled(PrimitiveStyle::with_stroke(*color, *width))
                .draw(target),
            Self::Line { start, end, color, width } => Line::new(*start, *end)
                .into_styled(PrimitiveStyle::with_stroke(*color, *width))
                .draw(target),
            Self::Label {
                text,
                position,
                color,
                font,
                anchor,
            } => Text::with_text_style(text, *position, style_for(*font, *color), alignment_for(*anchor))
                .draw(target)
                .map(|_| ()),
            Self::Image { area, pixels } => {
                let expected = (area.size.width * area.size.height) as usize;
                if pixels.len() != expected {
                    return Ok(());
                }
                target.fill_contiguous(area, pixels.iter().copied())
            }
        }
    }
}

/// Rasterise a whole display list in order (later shapes on top).
pub fn draw_all<D>(shapes: &[Shape], target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    for shape in shapes {
        shape.draw(target)?;
    }
    Ok(())
}
