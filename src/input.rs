//! Host-independent input events and overlay routing.

use ggez::glam::Vec2;

use crate::editor::Editor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Enter,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown {
        pos: Vec2,
        button: PointerButton,
    },
    PointerUp {
        pos: Vec2,
        button: PointerButton,
    },
    PointerMove {
        pos: Vec2,
        /// Movement since the previous move event.
        delta: Vec2,
        primary_held: bool,
    },
    /// `delta` is in wheel notches, `dt` the frame time in seconds.
    Wheel { pos: Vec2, delta: f32, dt: f32 },
    Key { key: Key, text: Option<char> },
}

impl InputEvent {
    /// Events an overlay may claim. Wheel and keyboard events never are.
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            InputEvent::PointerDown { .. }
                | InputEvent::PointerUp { .. }
                | InputEvent::PointerMove { .. }
        )
    }
}

/// On-screen UI that sees pointer events before the editor.
pub trait Overlay {
    /// Returns true when the event was consumed.
    fn process(&mut self, event: &InputEvent, editor: &mut Editor) -> bool;
}

/// Offers pointer events to `overlay` first and forwards them to the editor
/// only if it declined. Wheel and keyboard events always reach the editor.
pub fn route(event: &InputEvent, overlay: &mut dyn Overlay, editor: &mut Editor) {
    let consumed = event.is_pointer() && overlay.process(event, editor);
    if !consumed {
        editor.handle(event);
    }
}
