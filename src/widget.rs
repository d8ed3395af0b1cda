//! Widget base: positioned, nameable, composable pieces of the panel.
//!
//! Every widget reports its bounds in its parent's coordinate frame and renders
//! itself into a display list given the absolute origin of that frame. A
//! compound widget owns its children as [`Child`] values, which are either
//! [`Control`]s (taking part in pointer dispatch) or passive displays such as
//! readouts.
//!
//! # Shared Widgets
//!
//! Readouts are updated from generator threads while also sitting in the tree,
//! so `Arc<Mutex<W>>` is itself a widget that locks for every call.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::control::Control;
use crate::shape::Shape;

/// A positioned, drawable node of the widget tree.
pub trait Widget: Send {
    /// Display name used in command paths (empty by default for most widgets).
    fn name(&self) -> &str;

    /// Bounding rectangle in the parent's coordinate frame.
    fn bounds(&self) -> Rectangle;

    /// Move the widget within its parent.
    fn set_position(&mut self, position: Point);

    /// Append this widget's shapes, in absolute coordinates, to `out`.
    ///
    /// `origin` is the absolute position of the parent's coordinate frame.
    fn render(&self, origin: Point, out: &mut Vec<Shape>);
}

/// Lock a mutex, recovering the data if a writer panicked.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<W: Widget + ?Sized> Widget for Arc<Mutex<W>> {
    fn name(&self) -> &str {
        // The name cannot outlive the guard, shared widgets stay anonymous in paths
        ""
    }

    fn bounds(&self) -> Rectangle { lock(self).bounds() }

    fn set_position(&mut self, position: Point) { lock(self).set_position(position); }

    fn render(&self, origin: Point, out: &mut Vec<Shape>) { lock(self).render(origin, out); }
}

// =============================================================================
// Children
// =============================================================================

/// A child slot of a compound widget.
pub enum Child {
    /// Takes part in pointer dispatch.
    Control(Box<dyn Control>),
    /// Drawn only; pointer events stop at the parent.
    Display(Box<dyn Widget>),
}

impl Child {
    /// Wrap a control.
    pub fn control(control: impl Control + 'static) -> Self { Self::Control(Box::new(control)) }

    /// Wrap a passive widget.
    pub fn display(widget: impl Widget + 'static) -> Self { Self::Display(Box::new(widget)) }

    /// Name of the wrapped widget.
    pub fn name(&self) -> &str {
        match self {
            Self::Control(c) => c.name(),
            Self::Display(w) => w.name(),
        }
    }

    /// Bounds of the wrapped widget in the parent's frame.
    pub fn bounds(&self) -> Rectangle {
        match self {
            Self::Control(c) => c.bounds(),
            Self::Display(w) => w.bounds(),
        }
    }

    /// Move the wrapped widget.
    pub fn set_position(&mut self, position: Point) {
        match self {
            Self::Control(c) => c.set_position(position),
            Self::Display(w) => w.set_position(position),
        }
    }

    /// Render the wrapped widget.
    pub fn render(&self, origin: Point, out: &mut Vec<Shape>) {
        match self {
            Self::Control(c) => c.render(origin, out),
            Self::Display(w) => w.render(origin, out),
        }
    }

    /// The wrapped control, if this child takes part in dispatch.
    pub fn as_control_mut(&mut self) -> Option<&mut dyn Control> {
        match self {
            Self::Control(c) => Some(c.as_mut()),
            Self::Display(_) => None,
        }
    }

    /// Whether the child is a control.
    pub const fn is_control(&self) -> bool { matches!(self, Self::Control(_)) }
}

/// Topmost child containing `position` (children added later sit on top).
pub fn child_at(children: &[Child], position: Point) -> Option<usize> {
    children.iter().rposition(|child| child.bounds().contains(position))
}

// =============================================================================
// Panel
// =============================================================================

/// Plain compound widget: decorations plus children, no behaviour of its own.
///
/// Dispatch passes straight through a panel to its children, so panels are the
/// building block for named levels of a command path.
pub struct Panel {
    name: String,
    area: Rectangle,
    background: Option<Rgb565>,
    shapes: Vec<Shape>,
    children: Vec<Child>,
}

impl Panel {
    /// Empty panel at `position` covering `size`.
    pub fn new(name: impl Into<String>, position: Point, size: Size) -> Self {
        Self {
            name: name.into(),
            area: Rectangle::new(position, size),
            background: None,
            shapes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Fill the panel area with `color` behind everything else.
    #[must_use]
    pub const fn with_background(mut self, color: Rgb565) -> Self {
        self.background = Some(color);
        self
    }

    /// Add a decoration in panel-local coordinates.
    pub fn add_shape(&mut self, shape: Shape) { self.shapes.push(shape); }

    /// Add a child on top of the existing ones; returns its index.
    pub fn add_child(&mut self, child: Child) -> usize {
        self.children.push(child);
        self.children.len() - 1
    }

    /// Add a control child.
    pub fn add_control(&mut self, control: impl Control + 'static) -> usize { self.add_child(Child::control(control)) }

    /// Add a passive child.
    pub fn add_display(&mut self, widget: impl Widget + 'static) -> usize { self.add_child(Child::display(widget)) }

    /// Number of children.
    pub fn len(&self) -> usize { self.children.len() }

    /// Whether the panel has no children.
    pub fn is_empty(&self) -> bool { self.children.is_empty() }
}

impl Widget for Panel {
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
        for shape in &self.shapes {
            let mut shape = shape.clone();
            shape.translate(local);
            out.push(shape);
        }
        for child in &self.children {
            child.render(local, out);
        }
    }
}

impl Control for Panel {
    fn children(&self) -> &[Child] { &self.children }

    fn children_mut(&mut self) -> &mut [Child] { &mut self.children }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLUE, RED};

    struct Swatch {
        area: Rectangle,
        fill: Rgb565,
    }

    impl Widget for Swatch {
        fn name(&self) -> &str { "SWATCH" }

        fn bounds(&self) -> Rectangle { self.area }

        fn set_position(&mut self, position: Point) { self.area.top_left = position; }

        fn render(&self, origin: Point, out: &mut Vec<Shape>) {
            out.push(Shape::Rect {
                area: Rectangle::new(origin + self.area.top_left, self.area.size),
                fill: self.fill,
            });
        }
    }

    fn swatch(x: i32, y: i32, fill: Rgb565) -> Swatch {
        Swatch {
            area: Rectangle::new(Point::new(x, y), Size::new(10, 10)),
            fill,
        }
    }

    #[test]
    fn test_child_at_prefers_topmost() {
        let children = vec![Child::display(swatch(0, 0, RED)), Child::display(swatch(5, 5, BLUE))];
        assert_eq!(child_at(&children, Point::new(7, 7)), Some(1), "Overlap resolves to the later child");
        assert_eq!(child_at(&children, Point::new(1, 1)), Some(0));
        assert_eq!(child_at(&children, Point::new(30, 30)), None);
    }

    #[test]
    fn test_panel_renders_children_relative_to_origin() {
        let mut panel = Panel::new("P", Point::new(100, 50), Size::new(40, 40)).with_background(BLUE);
        panel.add_display(swatch(5, 5, RED));

        let mut shapes = Vec::new();
        panel.render(Point::new(1, 1), &mut shapes);

        assert_eq!(shapes.len(), 2, "Background plus one child");
        assert_eq!(
            shapes[1],
            Shape::Rect {
                area: Rectangle::new(Point::new(106, 56), Size::new(10, 10)),
                fill: RED
            }
        );
    }

    #[test]
    fn test_shared_widget_forwards_to_inner() {
        let shared = Arc::new(Mutex::new(swatch(3, 4, RED)));
        let mut handle = Arc::clone(&shared);
        handle.set_position(Point::new(8, 9));

        assert_eq!(lock(&shared).area.top_left, Point::new(8, 9));
        assert_eq!(Widget::bounds(&handle).top_left, Point::new(8, 9));
        assert_eq!(Widget::name(&handle), "");
    }

    #[test]
    fn test_panel_child_count() {
        let mut panel = Panel::new("", Point::zero(), Size::new(10, 10));
        assert!(panel.is_empty());
        assert_eq!(panel.add_display(swatch(0, 0, RED)), 0);
        assert_eq!(panel.len(), 1);
        assert!(!panel.children()[0].is_control());
    }
}
