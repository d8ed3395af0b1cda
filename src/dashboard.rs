//! Host side of the widget tree: pointer input in, commands out.
//!
//! A [`Dashboard`] owns the root control. Every command path that dispatch
//! produces is written to the registered output readouts and, when one is
//! attached, queued on the [`Processor`].
//!
//! The pointer is captured between a press and its release: the release is
//! delivered at the press position, so the control that saw the press always
//! sees the release, wherever the pointer ends up.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::control::{Control, PointerKind};
use crate::generators::SinkSet;
use crate::processor::Processor;
use crate::readouts::{Capabilities, SharedReadout, Update};
use crate::shape::{Shape, draw_all};

/// Root control plus the places its commands go.
pub struct Dashboard<C: Control> {
    root: C,
    outputs: SinkSet,
    processor: Option<Processor>,
    /// Position of the press still waiting for its release.
    captured: Option<Point>,
}

impl<C: Control> Dashboard<C> {
    pub fn new(root: C) -> Self {
        Self {
            root,
            outputs: SinkSet::default(),
            processor: None,
            captured: None,
        }
    }

    pub const fn root(&self) -> &C { &self.root }

    pub const fn root_mut(&mut self) -> &mut C { &mut self.root }

    /// Echo every command into `readout` under `key`.
    ///
    /// Only readouts accepting text qualify; a duplicate key is refused.
    pub fn add_output(&mut self, key: &str, readout: SharedReadout) -> bool {
        self.outputs.insert(key, readout, Capabilities::STRING)
    }

    pub fn remove_output(&mut self, key: &str) -> bool { self.outputs.remove(key) }

    /// Attach `processor`, returning the previous one.
    pub fn set_processor(&mut self, processor: Processor) -> Option<Processor> { self.processor.replace(processor) }

    pub fn processor(&self) -> Option<&Processor> { self.processor.as_ref() }

    pub fn processor_mut(&mut self) -> Option<&mut Processor> { self.processor.as_mut() }

    /// Detach and return the processor.
    pub fn take_processor(&mut self) -> Option<Processor> { self.processor.take() }

    /// Dispatch one pointer event at screen `position` and fan out its command.
    pub fn pointer(&mut self, kind: PointerKind, position: Point) -> Option<String> {
        let command = self.root.dispatch(kind, position)?;
        tracing::debug!(?kind, %command, "command");
        self.outputs.broadcast(&Update::Text(command.clone()));
        if let Some(processor) = &self.processor
            && !processor.enqueue(command.as_str())
        {
            tracing::debug!(%command, "processor inactive, command not queued");
        }
        Some(command)
    }

    pub fn press(&mut self, position: Point) -> Option<String> {
        self.captured = Some(position);
        self.pointer(PointerKind::Pressed, position)
    }

    /// Release the pointer, delivered to whatever received the matching press.
    pub fn release(&mut self, position: Point) -> Option<String> {
        let target = self.captured.take().unwrap_or(position);
        if target != position {
            tracing::debug!(?position, ?target, "release routed to press target");
        }
        self.pointer(PointerKind::Released, target)
    }

    /// Pointer motion: a drag while pressed, a plain move otherwise.
    pub fn motion(&mut self, position: Point) -> Option<String> {
        let kind = if self.captured.is_some() { PointerKind::Dragged } else { PointerKind::Moved };
        self.pointer(kind, position)
    }

    /// Display list for the whole tree in screen coordinates.
    pub fn render(&self) -> Vec<Shape> {
        let mut shapes = Vec::new();
        self.root.render(Point::zero(), &mut shapes);
        shapes
    }

    /// Rasterise the tree onto `target`.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        draw_all(&self.render(), target)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::{Duration, Instant};

    use embedded_graphics::mock_display::MockDisplay;

    use super::*;
    use crate::readouts::{BarConfig, BarReadout, BufferConfig, BufferReadout, share};
    use crate::widget::Child;
    use crate::widgets::{Action, Button, ButtonConfig, ButtonGrid, ButtonKind, GridConfig, Group, arrow_pad};

    /// MAIN group > PAD grid (1x2) with PWR toggle and HORN touch buttons.
    fn panel() -> Dashboard<Group> {
        let mut grid = ButtonGrid::new(GridConfig {
            name: "PAD".into(),
            position: Point::zero(),
            size: Size::new(60, 30),
            rows: 1,
            cols: 2,
            spacing: 0,
            background: None,
        })
        .unwrap();
        grid.add_button(Button::new(ButtonConfig::new("PWR", ButtonKind::Toggle)).unwrap(), 0, 0, 1, 1);
        grid.add_button(Button::new(ButtonConfig::new("HORN", ButtonKind::Touch)).unwrap(), 0, 1, 1, 1);

        let mut root = Group::new("MAIN", Point::zero());
        root.add("pad", Child::control(grid), Point::new(10, 10));
        Dashboard::new(root)
    }

    #[test]
    fn test_press_and_release_paths() {
        let mut dashboard = panel();
        assert_eq!(dashboard.press(Point::new(15, 20)).as_deref(), Some("MAIN.PAD.PWR.SET_ACTIVE_TRUE"));
        assert_eq!(dashboard.release(Point::new(15, 20)), None, "Toggle ignores release");
        assert_eq!(dashboard.press(Point::new(50, 20)).as_deref(), Some("MAIN.PAD.HORN.ON"));
        assert_eq!(dashboard.release(Point::new(50, 20)).as_deref(), Some("MAIN.PAD.HORN.OFF"));
        assert_eq!(dashboard.press(Point::new(200, 200)), None, "Outside every control");
    }

    #[test]
    fn test_hold_stops_when_released_off_the_button() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let pad = arrow_pad(
            GridConfig {
                name: "NAV".into(),
                size: Size::new(90, 90),
                ..GridConfig::default()
            },
            Duration::from_millis(2),
            |label| {
                let counter = Arc::clone(&counter);
                (label == "UP").then(|| -> Action {
                    Arc::new(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    })
                })
            },
        )
        .unwrap();
        let offset = Point::new(10, 10);
        let up = offset + pad.cell_rect(0, 1, 1, 1).center();
        let centre = offset + pad.cell_rect(1, 1, 1, 1).center();
        let mut root = Group::new("DASH", Point::zero());
        root.add("nav", Child::control(pad), offset);
        let mut dashboard = Dashboard::new(root);

        assert_eq!(dashboard.press(up).as_deref(), Some("DASH.NAV.UP.ON"));
        let start = Instant::now();
        while count.load(Ordering::SeqCst) < 3 && start.elapsed() < Duration::from_secs(2) {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(
            dashboard.release(centre).as_deref(),
            Some("DASH.NAV.UP.OFF"),
            "Release in the empty centre still reaches UP"
        );

        let after_release = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(40));
        assert!(
            count.load(Ordering::SeqCst) <= after_release + 1,
            "Repeat stops at release (one unit may already be running)"
        );
        thread::sleep(Duration::from_millis(40));
        let settled = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(40));
        assert_eq!(count.load(Ordering::SeqCst), settled, "No on-action after release");
    }

    #[test]
    fn test_release_without_press_uses_its_own_position() {
        let mut dashboard = panel();
        assert_eq!(dashboard.release(Point::new(50, 20)).as_deref(), Some("MAIN.PAD.HORN.OFF"));
    }

    #[test]
    fn test_motion_is_drag_while_held() {
        let mut dashboard = panel();
        assert_eq!(dashboard.motion(Point::new(50, 20)), None);
        dashboard.press(Point::new(50, 20));
        assert_eq!(dashboard.motion(Point::new(52, 20)), None, "Buttons ignore drags");
        dashboard.release(Point::new(52, 20));
    }

    #[test]
    fn test_commands_fan_out_to_text_outputs() {
        let mut dashboard = panel();
        let log = share(BufferReadout::new(BufferConfig::default()));
        assert!(dashboard.add_output("log", log.clone()));
        assert!(!dashboard.add_output("log", log.clone()), "Duplicate key");
        assert!(
            !dashboard.add_output("bar", share(BarReadout::new(BarConfig::default()).unwrap())),
            "Bars cannot show commands"
        );

        dashboard.press(Point::new(50, 20));
        dashboard.release(Point::new(50, 20));
        assert_eq!(
            log.lock().unwrap().lines().collect::<Vec<_>>(),
            ["MAIN.PAD.HORN.ON", "MAIN.PAD.HORN.OFF"]
        );

        assert!(dashboard.remove_output("log"));
        dashboard.press(Point::new(50, 20));
        assert_eq!(log.lock().unwrap().lines().count(), 2, "Removed output gets nothing");
    }

    #[test]
    fn test_commands_reach_active_processor() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut processor = Processor::new(Duration::from_millis(1), move |command| sink.lock().unwrap().push(command)).unwrap();
        processor.set_active(true).unwrap();

        let mut dashboard = panel();
        assert!(dashboard.set_processor(processor).is_none());
        dashboard.press(Point::new(15, 20));

        let start = Instant::now();
        while seen.lock().unwrap().is_empty() && start.elapsed() < Duration::from_secs(2) {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(*seen.lock().unwrap(), ["MAIN.PAD.PWR.SET_ACTIVE_TRUE"]);

        let mut processor = dashboard.take_processor().unwrap();
        processor.set_active(false).unwrap();
        assert!(dashboard.processor().is_none());
    }

    #[test]
    fn test_removing_child_through_root_mut() {
        let mut dashboard = panel();
        assert!(dashboard.root_mut().remove("pad").is_some());
        assert_eq!(dashboard.root().len(), 0);
        assert_eq!(dashboard.press(Point::new(15, 20)), None, "Nothing left to press");
    }

    #[test]
    fn test_draw_rasterises_tree() {
        let dashboard = panel();
        assert!(!dashboard.render().is_empty());

        let mut display = MockDisplay::<Rgb565>::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);
        dashboard.draw(&mut display).unwrap();
        assert!(display.get_pixel(Point::new(12, 12)).is_some(), "Button area is painted");
    }
}
