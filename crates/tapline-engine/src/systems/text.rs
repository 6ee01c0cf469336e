//! Text labels shown by the host UI.
//!
//! Games write strings into numbered slots; the host reads a slot back when it
//! sees a `LABEL_CHANGED` event for it. Rendering the text is the host's job.

/// A numbered text slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Label {
    pub text: String,
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct LabelBoard {
    slots: Vec<Label>,
    dirty: Vec<u32>,
}

impl LabelBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, slot: u32) -> &mut Label {
        let idx = slot as usize;
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, Label::default);
        }
        &mut self.slots[idx]
    }

    fn mark(&mut self, slot: u32) {
        if !self.dirty.contains(&slot) {
            self.dirty.push(slot);
        }
    }

    /// Set a slot's text and make it visible. Returns true if anything changed.
    pub fn set_text(&mut self, slot: u32, text: &str) -> bool {
        let label = self.slot_mut(slot);
        if label.text == text && label.visible {
            return false;
        }
        label.text.clear();
        label.text.push_str(text);
        label.visible = true;
        self.mark(slot);
        true
    }

    pub fn set_visible(&mut self, slot: u32, visible: bool) -> bool {
        let label = self.slot_mut(slot);
        if label.visible == visible {
            return false;
        }
        label.visible = visible;
        self.mark(slot);
        true
    }

    /// Hide a slot and drop its text.
    pub fn clear_slot(&mut self, slot: u32) -> bool {
        let label = self.slot_mut(slot);
        if label.text.is_empty() && !label.visible {
            return false;
        }
        label.text.clear();
        label.visible = false;
        self.mark(slot);
        true
    }

    /// Text of a visible slot; hidden or unknown slots read as `None`.
    pub fn text(&self, slot: u32) -> Option<&str> {
        self.slots
            .get(slot as usize)
            .filter(|l| l.visible)
            .map(|l| l.text.as_str())
    }

    pub fn get(&self, slot: u32) -> Option<&Label> {
        self.slots.get(slot as usize)
    }

    /// Slots changed since the last call, in change order.
    pub fn take_dirty(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.dirty)
    }
}
