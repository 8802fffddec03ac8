//! Field notifications, the event queue, and keyboard handling.
//!
//! The widget pushes notifications onto an internal queue as state changes
//! happen; the host drains the queue after each interaction and dispatches
//! whatever handlers it cares about. Notifications are fire-and-forget;
//! no acknowledgment is expected.

use std::sync::{Arc, RwLock};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::state::EditField;

// =============================================================================
// Field Events
// =============================================================================

/// A notification emitted by the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// Edit mode was entered.
    Open,
    /// Edit mode was exited.
    Close,
    /// The user aborted the edit.
    Cancel,
    /// The dropdown selection changed to a value that differs from the
    /// committed one. Not yet committed.
    Change(String),
    /// A save was initiated.
    Submit,
    /// A save succeeded and the value was committed.
    Update(String),
}

/// Queue of pending field events.
///
/// Cheap to clone; all clones share the same queue.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventQueue {
    inner: Arc<RwLock<Vec<FieldEvent>>>,
}

impl EventQueue {
    pub(crate) fn push(&self, event: FieldEvent) {
        if let Ok(mut queue) = self.inner.write() {
            queue.push(event);
        }
    }

    /// Drain all pending events, preserving emission order.
    pub(crate) fn drain(&self) -> Vec<FieldEvent> {
        self.inner
            .write()
            .ok()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }
}

// =============================================================================
// Event Result
// =============================================================================

/// Result of handling a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, try other handlers.
    Ignored,
    /// Event was consumed, stop propagation.
    Consumed,
}

impl EventResult {
    /// Check if the event was handled.
    pub fn is_handled(&self) -> bool {
        !matches!(self, EventResult::Ignored)
    }
}

// =============================================================================
// Keyboard handling
// =============================================================================

impl EditField {
    /// Handle a key event while the field has focus.
    ///
    /// Display mode: Enter or `e` opens the editor. Edit mode: Up/Down
    /// (or `k`/`j`) move the dropdown selection with wrap-around, Home/End
    /// jump, Enter saves, Esc cancels. Enter is a no-op while nothing
    /// differs from the committed value.
    ///
    /// Enter on a saveable selection spawns the commit task, so it must be
    /// called from within a Tokio runtime.
    pub fn on_key(&self, key: &KeyEvent) -> EventResult {
        // Ignore keys with ctrl/alt modifiers
        if key.modifiers.contains(KeyModifiers::CONTROL)
            || key.modifiers.contains(KeyModifiers::ALT)
        {
            return EventResult::Ignored;
        }

        if !self.is_editing() {
            match key.code {
                KeyCode::Enter | KeyCode::Char('e') => {
                    self.open();
                    EventResult::Consumed
                }
                _ => EventResult::Ignored,
            }
        } else {
            let len = self.options_len();
            match key.code {
                KeyCode::Up | KeyCode::Char('k') if len > 0 => {
                    // Move selection up (with wrap)
                    let current = self.cursor();
                    let new_index = if current == 0 { len - 1 } else { current - 1 };
                    self.select_index(new_index);
                    EventResult::Consumed
                }
                KeyCode::Down | KeyCode::Char('j') if len > 0 => {
                    // Move selection down (with wrap)
                    let current = self.cursor();
                    let new_index = if current + 1 >= len { 0 } else { current + 1 };
                    self.select_index(new_index);
                    EventResult::Consumed
                }
                KeyCode::Home if len > 0 => {
                    self.select_index(0);
                    EventResult::Consumed
                }
                KeyCode::End if len > 0 => {
                    self.select_index(len - 1);
                    EventResult::Consumed
                }
                KeyCode::Enter => {
                    // Submit is disabled while selected equals committed
                    if self.can_save() {
                        self.save();
                    }
                    EventResult::Consumed
                }
                KeyCode::Esc => {
                    self.cancel();
                    EventResult::Consumed
                }
                _ => EventResult::Ignored,
            }
        }
    }
}
