//! Inline-editable select field for terminal UIs.
//!
//! A display value that, on request, reveals a dropdown of options and
//! commits the new choice to a remote endpoint (`POST {action}/{value}`).
//! The widget owns its state behind `Arc`s with a dirty flag, emits
//! notifications onto a queue the host drains, and renders through
//! ratatui. The commit resolves on a background task: the field returns
//! to display mode immediately and the status indicator reflects the
//! outcome once the request settles.

pub mod client;
pub mod error;
pub mod events;
pub mod option;
pub mod render;
mod state;

pub use client::CommitClient;
pub use error::CommitError;
pub use events::{EventResult, FieldEvent};
pub use option::{FieldOption, OptionItem};
pub use state::{EditField, EditFieldBuilder, FieldId, Missing, Set};
