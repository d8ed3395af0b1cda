//! Pointer-event dispatch and command-path bubbling.
//!
//! A [`Control`] is a widget that receives pointer events. Dispatch works the
//! same way for every event kind:
//!
//! 1. Resolve the topmost child whose bounds contain the event position.
//! 2. If that child is a control, translate the position into its frame and
//!    dispatch the same event to it, keeping the command it returns.
//! 3. Run this control's own hook, [`Control::on_pointer`], with the index of
//!    the resolved child. Buttons change state here; containers usually don't.
//! 4. Prefix the child's command (or, failing that, the hook's own command)
//!    with this control's name and [`PATH_SEPARATOR`].
//!
//! The result is a path such as `"MPWR.CPWR.ON"` naming every control from the
//! root down to the leaf that handled the event, followed by the leaf's
//! action suffix. `None` means "no command" and is distinct from an empty
//! string. An unnamed control still contributes an empty segment, so a path
//! through one starts with or contains an extra separator.
//!
//! Dispatch only changes per-widget state. It never adds or removes children.

use embedded_graphics::prelude::*;

use crate::config::PATH_SEPARATOR;
use crate::widget::{Child, Widget, child_at};

/// The seven pointer events a control can receive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Pressed,
    Released,
    Entered,
    Exited,
    Clicked,
    Dragged,
    Moved,
}

/// A widget taking part in pointer dispatch.
pub trait Control: Widget {
    /// Child widgets, topmost last.
    fn children(&self) -> &[Child] { &[] }

    /// Mutable access to the children for recursive dispatch.
    fn children_mut(&mut self) -> &mut [Child] { &mut [] }

    /// Per-event hook, run after the hit child (if any) has handled the event.
    ///
    /// `hit` is the index of the child under the pointer. The returned string
    /// is this control's own command suffix, used when no child produced one.
    fn on_pointer(&mut self, kind: PointerKind, hit: Option<usize>) -> Option<String> {
        let _ = (kind, hit);
        None
    }

    /// Dispatch an event at `position` (parent coordinates) through this control.
    fn dispatch(&mut self, kind: PointerKind, position: Point) -> Option<String> { route(self, kind, position) }

    /// Pointer pressed at `position`.
    fn pressed(&mut self, position: Point) -> Option<String> { self.dispatch(PointerKind::Pressed, position) }

    /// Pointer released at `position`.
    fn released(&mut self, position: Point) -> Option<String> { self.dispatch(PointerKind::Released, position) }

    /// Pointer entered at `position`.
    fn entered(&mut self, position: Point) -> Option<String> { self.dispatch(PointerKind::Entered, position) }

    /// Pointer exited at `position`.
    fn exited(&mut self, position: Point) -> Option<String> { self.dispatch(PointerKind::Exited, position) }

    /// Pointer clicked at `position`.
    fn clicked(&mut self, position: Point) -> Option<String> { self.dispatch(PointerKind::Clicked, position) }

    /// Pointer dragged to `position`.
    fn dragged(&mut self, position: Point) -> Option<String> { self.dispatch(PointerKind::Dragged, position) }

    /// Pointer moved to `position`.
    fn moved(&mut self, position: Point) -> Option<String> { self.dispatch(PointerKind::Moved, position) }
}

/// Shared dispatch routine behind [`Control::dispatch`].
///
/// `position` is in the frame of `control`'s parent.
pub fn route<C: Control + ?Sized>(control: &mut C, kind: PointerKind, position: Point) -> Option<String> {
    let local = position - control.bounds().top_left;
    let hit = child_at(control.children(), local);

    let child_command = hit.and_then(|index| {
        control.children_mut()[index]
            .as_control_mut()
            .and_then(|child| child.dispatch(kind, local))
    });

    let own_command = control.on_pointer(kind, hit);

    child_command.or(own_command).map(|command| join_path(control.name(), &command))
}

/// `name` + separator + `command`.
pub fn join_path(name: &str, command: &str) -> String {
    let mut path = String::with_capacity(name.len() + 1 + command.len());
    path.push_str(name);
    path.push(PATH_SEPARATOR);
    path.push_str(command);
    path
}
