use glam::Vec2;

/// Input event types the engine understands.
/// Pointer coordinates are already in world space (the bridge converts them).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at world coordinates (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended at world coordinates (x, y).
    PointerUp { x: f32, y: f32 },
    /// A touch/cursor moved to world coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// A custom event from the UI layer (reset buttons, etc.).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

impl InputEvent {
    /// World position carried by a pointer event.
    pub fn pointer_pos(&self) -> Option<Vec2> {
        match *self {
            InputEvent::PointerDown { x, y }
            | InputEvent::PointerUp { x, y }
            | InputEvent::PointerMove { x, y } => Some(Vec2::new(x, y)),
            InputEvent::Custom { .. } => None,
        }
    }
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Build a queue from an existing batch of events.
    pub fn from_events(events: Vec<InputEvent>) -> Self {
        Self { events }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Custom events only, as `(kind, a, b, c)`.
    pub fn custom(&self) -> impl Iterator<Item = (u32, f32, f32, f32)> + '_ {
        self.events.iter().filter_map(|e| match *e {
            InputEvent::Custom { kind, a, b, c } => Some((kind, a, b, c)),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::PointerUp { x: 10.0, y: 20.0 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn custom_filter_skips_pointer_events() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerMove { x: 1.0, y: 1.0 });
        q.push(InputEvent::Custom { kind: 7, a: 1.5, b: 2.5, c: 3.5 });
        let custom: Vec<_> = q.custom().collect();
        assert_eq!(custom, vec![(7, 1.5, 2.5, 3.5)]);
    }

    #[test]
    fn pointer_pos_only_for_pointer_events() {
        assert_eq!(
            InputEvent::PointerUp { x: 3.0, y: 4.0 }.pointer_pos(),
            Some(Vec2::new(3.0, 4.0))
        );
        assert_eq!(InputEvent::Custom { kind: 1, a: 0.0, b: 0.0, c: 0.0 }.pointer_pos(), None);
    }
}
