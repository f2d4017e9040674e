//=========================================================================
// Input Buffer
//
// Collects key transitions between frame boundaries on the platform
// thread.
//
// Responsibilities:
// - Store incoming key events in arrival order
// - Drop consecutive duplicates (OS-level repeats that slip through)
// - Hand the whole batch over at the frame boundary via `drain()`
//
//=========================================================================

//=== Internal Modules ====================================================
use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    events: Vec<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        const BASE_CAPACITY: usize = 32;

        Self {
            events: Vec::with_capacity(BASE_CAPACITY),
        }
    }

    /// Appends a key transition unless it repeats the previous one.
    pub(crate) fn push(&mut self, event: InputEvent) {
        if self.events.last() != Some(&event) {
            self.events.push(event);
        }
    }

    /// Returns the buffered batch, or `None` if nothing was buffered.
    pub(crate) fn drain(&mut self) -> Option<Vec<InputEvent>> {
        if self.events.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.events))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;

    #[test]
    fn drain_empty_returns_none() {
        let mut buffer = InputBuffer::new();
        assert!(buffer.drain().is_none());
    }

    #[test]
    fn consecutive_duplicates_are_dropped() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::KeyDown(KeyCode::Space));
        buffer.push(InputEvent::KeyDown(KeyCode::Space));
        buffer.push(InputEvent::KeyUp(KeyCode::Space));
        buffer.push(InputEvent::KeyDown(KeyCode::Space));

        assert_eq!(
            buffer.drain(),
            Some(vec![
                InputEvent::KeyDown(KeyCode::Space),
                InputEvent::KeyUp(KeyCode::Space),
                InputEvent::KeyDown(KeyCode::Space),
            ])
        );
        assert!(buffer.drain().is_none());
    }
}
