//! User input surface
//!
//! The windowing layer decodes raw events into [`InputEvent`]s; each one maps
//! to at most one [`Command`] on the world. There is a single consumer, so no
//! callbacks are registered anywhere.

use glam::DVec2;

/// A key the simulation reacts to, or any other key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// `r`: reset the centers
    R,
    /// `v`: toggle Voronoi / Delaunay
    V,
    /// Any other key
    Other,
}

impl Key {
    /// Classify a typed character
    pub fn from_char(c: char) -> Self {
        match c {
            'r' => Key::R,
            'v' => Key::V,
            _ => Key::Other,
        }
    }
}

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// A discrete, already-decoded input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Window close or other quit signal
    Quit,
    /// A key was pressed
    KeyDown(Key),
    /// A mouse button was pressed at `position` (simulation coordinates)
    MouseDown {
        button: MouseButton,
        position: DVec2,
    },
}

/// Something the world can be asked to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Stop the frame loop
    Quit,
    /// Re-place every center
    Reset,
    /// Switch decomposition mode
    ToggleMode,
    /// Radial impulse away from a point
    Poke(DVec2),
}

/// Map an event to the command it triggers, if any
///
/// # Example
///
/// ```
/// use soap_cells::*;
///
/// let click = InputEvent::MouseDown { button: MouseButton::Left, position: DVec2::new(4.0, 2.0) };
/// assert_eq!(command_for(&click), Some(Command::Poke(DVec2::new(4.0, 2.0))));
/// assert_eq!(command_for(&InputEvent::KeyDown(Key::Other)), None);
/// ```
pub fn command_for(event: &InputEvent) -> Option<Command> {
    match *event {
        InputEvent::Quit => Some(Command::Quit),
        InputEvent::KeyDown(Key::R) => Some(Command::Reset),
        InputEvent::KeyDown(Key::V) => Some(Command::ToggleMode),
        InputEvent::KeyDown(Key::Other) => None,
        InputEvent::MouseDown {
            button: MouseButton::Left,
            position,
        } => Some(Command::Poke(position)),
        InputEvent::MouseDown { .. } => None,
    }
}
