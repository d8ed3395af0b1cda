//! Row/column button layout.
//!
//! A [`ButtonGrid`] divides its area into `rows x cols` equal cells separated
//! (and surrounded) by `spacing` pixels. A button placed at `(row, col)` with a
//! span of `row_span x col_span` is resized to cover those cells including the
//! gaps between them:
//!
//! ```text
//! col_width = (width - spacing * (cols + 1)) / cols
//! x         = spacing + col * (col_width + spacing)
//! w         = col_span * col_width + (col_span - 1) * spacing
//! ```
//!
//! Each anchor slot takes one button. Spans that overlap other buttons without
//! sharing their anchor are not detected; the later button is drawn on top and
//! wins hit-testing.

use std::time::Duration;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::colors::DARK_TEAL;
use crate::config::GRID_SPACING;
use crate::control::{Control, PointerKind, join_path};
use crate::error::{Error, Result};
use crate::shape::Shape;
use crate::widget::Widget;
use crate::widgets::button::{Action, Button, ButtonConfig, ButtonKind};

/// Settings for a new [`ButtonGrid`].
#[derive(Clone, Debug)]
pub struct GridConfig {
    pub name: String,
    pub position: Point,
    pub size: Size,
    pub rows: usize,
    pub cols: usize,
    /// Gap between cells and around the edge, in pixels.
    pub spacing: u32,
    pub background: Option<Rgb565>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: Point::zero(),
            size: Size::new(120, 120),
            rows: 3,
            cols: 3,
            spacing: GRID_SPACING,
            background: Some(DARK_TEAL),
        }
    }
}

/// Grid of buttons; dispatch goes to the topmost button under the pointer.
pub struct ButtonGrid {
    name: String,
    area: Rectangle,
    rows: usize,
    cols: usize,
    spacing: u32,
    background: Option<Rgb565>,
    /// Buttons in placement order (later ones on top).
    buttons: Vec<Button>,
    /// `rows * cols` anchor slots holding indices into `buttons`.
    slots: Vec<Option<usize>>,
}

impl ButtonGrid {
    /// Create an empty grid, rejecting zero rows or columns.
    pub fn new(config: GridConfig) -> Result<Self> {
        if config.rows == 0 || config.cols == 0 {
            return Err(Error::InvalidGrid {
                rows: config.rows,
                cols: config.cols,
            });
        }
        Ok(Self {
            name: config.name,
            area: Rectangle::new(config.position, config.size),
            rows: config.rows,
            cols: config.cols,
            spacing: config.spacing,
            background: config.background,
            buttons: Vec::new(),
            slots: vec![None; config.rows * config.cols],
        })
    }

    pub const fn rows(&self) -> usize { self.rows }

    pub const fn cols(&self) -> usize { self.cols }

    /// Number of placed buttons.
    pub fn len(&self) -> usize { self.buttons.len() }

    pub fn is_empty(&self) -> bool { self.buttons.is_empty() }

    /// Place `button` at `(row, col)` spanning `row_span x col_span` cells.
    ///
    /// Returns `false` (leaving the grid unchanged) when the span is empty,
    /// runs past the grid edge, or the anchor slot is already taken.
    pub fn add_button(&mut self, mut button: Button, row: usize, col: usize, row_span: usize, col_span: usize) -> bool {
        if !self.fits(row, col, row_span, col_span) {
            tracing::warn!(grid = %self.name, row, col, row_span, col_span, "button span outside grid");
            return false;
        }
        let slot = row * self.cols + col;
        if self.slots[slot].is_some() {
            tracing::warn!(grid = %self.name, row, col, "grid slot already taken");
            return false;
        }

        let cell = self.cell_rect(row, col, row_span, col_span);
        button.resize(cell.size);
        button.set_position(cell.top_left);
        self.slots[slot] = Some(self.buttons.len());
        self.buttons.push(button);
        true
    }

    /// Button anchored at `(row, col)`.
    pub fn button(&self, row: usize, col: usize) -> Option<&Button> {
        self.slot(row, col).map(|index| &self.buttons[index])
    }

    pub fn button_mut(&mut self, row: usize, col: usize) -> Option<&mut Button> {
        self.slot(row, col).map(|index| &mut self.buttons[index])
    }

    /// Grid-local rectangle covered by a span, gaps between cells included.
    pub fn cell_rect(&self, row: usize, col: usize, row_span: usize, col_span: usize) -> Rectangle {
        let (cell_w, cell_h) = self.cell_size();
        let step_x = cell_w + self.spacing;
        let step_y = cell_h + self.spacing;
        let top_left = Point::new(
            (self.spacing + col as u32 * step_x) as i32,
            (self.spacing + row as u32 * step_y) as i32,
        );
        let size = Size::new(
            span_length(cell_w, self.spacing, col_span),
            span_length(cell_h, self.spacing, row_span),
        );
        Rectangle::new(top_left, size)
    }

    fn fits(&self, row: usize, col: usize, row_span: usize, col_span: usize) -> bool {
        row_span >= 1
            && col_span >= 1
            && row.checked_add(row_span).is_some_and(|end| end <= self.rows)
            && col.checked_add(col_span).is_some_and(|end| end <= self.cols)
    }

    fn slot(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.slots[row * self.cols + col]
    }

    fn cell_size(&self) -> (u32, u32) {
        let cells = |total: u32, count: usize| {
            let count = count as u32;
            total.saturating_sub(self.spacing * (count + 1)) / count
        };
        (cells(self.area.size.width, self.cols), cells(self.area.size.height, self.rows))
    }
}

const fn span_length(cell: u32, spacing: u32, span: usize) -> u32 {
    let span = span as u32;
    span * cell + span.saturating_sub(1) * spacing
}

impl Widget for ButtonGrid {
    fn name(&self) -> &str { &self.name }

    fn bounds(&self) -> Rectangle { self.area }

    fn set_position(&mut self, position: Point) { self.area.top_left = position; }

    fn render(&self, origin: Point, out: &mut Vec<Shape>) {
        let local = origin + self.area.top_left;
        if let Some(fill) = self.background {
            out.push(Shape::Rect {
                area: Rectangle::new(local, self.area.size),
                fill,
            });
        }
        for button in &self.buttons {
            button.render(local, out);
        }
    }
}

impl Control for ButtonGrid {
    // Buttons are kept typed rather than as `Child`ren, so the grid routes them itself
    fn dispatch(&mut self, kind: PointerKind, position: Point) -> Option<String> {
        let local = position - self.area.top_left;
        let hit = self.buttons.iter().rposition(|button| button.bounds().contains(local));
        let child_command = hit.and_then(|index| self.buttons[index].dispatch(kind, local));
        let own_command = self.on_pointer(kind, hit);
        child_command.or(own_command).map(|command| join_path(&self.name, &command))
    }
}

// =============================================================================
// Arrow Pad
// =============================================================================

/// Labels and anchor cells of the arrow pad's hold buttons.
pub const ARROWS: [(&str, usize, usize); 4] = [("UP", 0, 1), ("LEFT", 1, 0), ("RIGHT", 1, 2), ("DOWN", 2, 1)];

/// 3x3 grid with UP/LEFT/RIGHT/DOWN hold buttons around an empty centre.
///
/// `action_for` is asked once per arrow label for the on-action to repeat
/// while that arrow is held. The rows and cols of `config` are ignored.
pub fn arrow_pad<F>(config: GridConfig, interval: Duration, mut action_for: F) -> Result<ButtonGrid>
where
    F: FnMut(&str) -> Option<Action>,
{
    let mut grid = ButtonGrid::new(GridConfig {
        rows: 3,
        cols: 3,
        ..config
    })?;
    for (label, row, col) in ARROWS {
        let mut button = Button::new(ButtonConfig::new(label, ButtonKind::Hold { interval }))?;
        if let Some(action) = action_for(label) {
            button = button.with_on_action(move || action());
        }
        let placed = grid.add_button(button, row, col, 1, 1);
        debug_assert!(placed, "arrow {label} must fit the 3x3 pad");
    }
    Ok(grid)
}
