//! Semantic input events decoded from crossterm.
//!
//! The lifecycle relies on one ordering guarantee: a right button press
//! decodes to a `Press` followed by an `Invoke`, strictly in that order.
//! That is what lets `no_recreate = false` close the current session on the
//! press phase and open a fresh one on the invocation phase with no explicit
//! coordination between the two.

use crossterm::event::{
    Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

use crate::position::Point;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Button {
    Left,
    Right,
    Middle,
}

impl From<MouseButton> for Button {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
            MouseButton::Middle => Button::Middle,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputEvent {
    /// A button went down.
    Press { button: Button, at: Point },
    /// A button came up.
    Release { button: Button, at: Point },
    /// A context-menu invocation at a point (always preceded by the
    /// matching right `Press`).
    Invoke { at: Point, alt: bool },
    /// A context-menu invocation from the keyboard menu key; carries no
    /// position.
    InvokeKey,
    /// Wheel scroll, `delta` in rows (positive is down).
    Scroll { at: Point, delta: i32 },
    /// The cancel (escape) key.
    CancelKey,
}

/// How a controller left an event after seeing it. `Handled` short-circuits
/// the dispatch path: nothing past the controller that handled the event
/// gets to see it, which is what keeps nested menus from reacting to events
/// inside a descendant's boundary. `PassThrough` also stops the dispatch
/// walk, but tells the host its default behavior should proceed (the
/// alt-modifier escape hatch).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Handled,
    PassThrough,
    Ignored,
}

/// Decode one crossterm event into zero or more semantic events, in
/// dispatch order.
pub fn decode(event: &Event) -> Vec<InputEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Esc => vec![InputEvent::CancelKey],
            KeyCode::Menu => vec![InputEvent::InvokeKey],
            _ => Vec::new(),
        },
        Event::Mouse(mouse) => {
            let at = Point {
                x: i32::from(mouse.column),
                y: i32::from(mouse.row),
            };
            match mouse.kind {
                MouseEventKind::Down(MouseButton::Right) => vec![
                    InputEvent::Press {
                        button: Button::Right,
                        at,
                    },
                    InputEvent::Invoke {
                        at,
                        alt: mouse.modifiers.contains(KeyModifiers::ALT),
                    },
                ],
                MouseEventKind::Down(button) => vec![InputEvent::Press {
                    button: button.into(),
                    at,
                }],
                MouseEventKind::Up(button) => vec![InputEvent::Release {
                    button: button.into(),
                    at,
                }],
                MouseEventKind::ScrollUp => vec![InputEvent::Scroll { at, delta: -1 }],
                MouseEventKind::ScrollDown => vec![InputEvent::Scroll { at, delta: 1 }],
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, MouseEvent};

    fn mouse(kind: MouseEventKind, x: u16, y: u16, modifiers: KeyModifiers) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: x,
            row: y,
            modifiers,
        })
    }

    #[test]
    fn right_press_decodes_press_then_invoke() {
        let evs = decode(&mouse(
            MouseEventKind::Down(MouseButton::Right),
            4,
            7,
            KeyModifiers::NONE,
        ));
        assert_eq!(evs.len(), 2);
        assert!(matches!(
            evs[0],
            InputEvent::Press {
                button: Button::Right,
                ..
            }
        ));
        assert!(matches!(evs[1], InputEvent::Invoke { alt: false, .. }));
    }

    #[test]
    fn alt_modifier_survives_decoding() {
        let evs = decode(&mouse(
            MouseEventKind::Down(MouseButton::Right),
            0,
            0,
            KeyModifiers::ALT,
        ));
        assert!(matches!(evs[1], InputEvent::Invoke { alt: true, .. }));
    }

    #[test]
    fn left_press_is_press_only() {
        let evs = decode(&mouse(
            MouseEventKind::Down(MouseButton::Left),
            1,
            2,
            KeyModifiers::NONE,
        ));
        assert_eq!(evs.len(), 1);
        assert!(matches!(
            evs[0],
            InputEvent::Press {
                button: Button::Left,
                ..
            }
        ));
    }

    #[test]
    fn escape_decodes_to_cancel_key() {
        let evs = decode(&Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert_eq!(evs, vec![InputEvent::CancelKey]);
    }

    #[test]
    fn unrelated_keys_decode_to_nothing() {
        let evs = decode(&Event::Key(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
        )));
        assert!(evs.is_empty());
    }
}
