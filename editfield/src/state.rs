//! Edit field widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::client::CommitClient;
use crate::error::CommitError;
use crate::events::{EventQueue, FieldEvent};
use crate::option::{FieldOption, OptionItem};

/// Unique identifier for an EditField widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(usize);

impl FieldId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__edit_field_{}", self.0)
    }
}

/// Internal state for an EditField widget.
#[derive(Debug)]
struct EditFieldInner {
    /// The value considered persisted and shown in display mode
    committed: String,
    /// The value highlighted in the editor but not yet persisted
    selected: String,
    /// Available options, in caller-supplied order
    options: Vec<FieldOption>,
    /// Whether the last commit attempt failed
    save_failed: bool,
}

/// An inline-editable select field with reactive state.
///
/// In display mode the field shows the committed value's label and a
/// status indicator. Opening it reveals a dropdown of options; saving
/// posts the chosen value to `{action}/{value}` and promotes it to the
/// committed value once the endpoint accepts it. The request is issued in
/// the background; the field returns to display mode immediately, and
/// the indicator reflects the outcome once the request resolves.
///
/// State lives behind `Arc`s, so clones share one field and the commit
/// task can update the same instance the host renders.
///
/// # Example
///
/// ```ignore
/// use editfield::EditField;
///
/// let field = EditField::builder()
///     .action("/api/field")
///     .value("a")
///     .options(vec![("a", "Alpha"), ("b", "Beta")])
///     .build();
///
/// field.open();
/// field.select_index(1);
/// field.save();
///
/// for event in field.drain_events() {
///     // dispatch Open / Change / Submit / Close ...
/// }
/// ```
#[derive(Debug)]
pub struct EditField {
    /// Unique identifier for this field instance
    id: FieldId,
    /// Internal state
    inner: Arc<RwLock<EditFieldInner>>,
    /// Whether the edit form is visible
    editing: Arc<AtomicBool>,
    /// Dropdown cursor position while editing
    cursor: Arc<AtomicUsize>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
    /// Whether a commit request is outstanding
    in_flight: Arc<AtomicBool>,
    /// Pending notifications for the host to drain
    events: EventQueue,
    /// Handle of the outstanding commit task
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
    /// Client used to persist values
    client: CommitClient,
}

impl EditField {
    /// Creates a new builder for constructing a field.
    pub fn builder() -> EditFieldBuilder<Missing, Missing> {
        EditFieldBuilder::new()
    }

    /// Get the unique ID for this field.
    pub fn id(&self) -> FieldId {
        self.id
    }

    /// Get the ID as a string (for host-side bookkeeping).
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    // -------------------------------------------------------------------------
    // Mode controller
    // -------------------------------------------------------------------------

    /// Check if the edit form is visible.
    pub fn is_editing(&self) -> bool {
        self.editing.load(Ordering::SeqCst)
    }

    /// Enter edit mode.
    ///
    /// Resets the dropdown selection to the committed value, positions the
    /// cursor on the matching option (first option when none matches),
    /// emits [`FieldEvent::Open`], and reveals the edit form. No-op when
    /// already editing.
    pub fn open(&self) {
        if self.is_editing() {
            return;
        }

        let cursor_pos = if let Ok(mut guard) = self.inner.write() {
            guard.selected = guard.committed.clone();
            guard
                .options
                .iter()
                .position(|option| option.value == guard.committed)
                .unwrap_or(0)
        } else {
            0
        };
        self.cursor.store(cursor_pos, Ordering::SeqCst);

        self.events.push(FieldEvent::Open);
        self.editing.store(true, Ordering::SeqCst);
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Exit edit mode.
    ///
    /// Emits [`FieldEvent::Close`] and hides the edit form. Invoked on
    /// explicit cancel and after a save, whether it succeeds or not.
    pub fn close(&self) {
        self.events.push(FieldEvent::Close);
        self.editing.store(false, Ordering::SeqCst);
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Abort the edit: emits [`FieldEvent::Cancel`], then closes.
    ///
    /// The committed value and displayed content are left unchanged.
    pub fn cancel(&self) {
        self.events.push(FieldEvent::Cancel);
        self.close();
    }

    // -------------------------------------------------------------------------
    // Selection handling
    // -------------------------------------------------------------------------

    /// Get the dropdown cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    /// Move the dropdown selection to the option at `index`.
    ///
    /// Stores the option's value as the selected value and emits
    /// [`FieldEvent::Change`] iff it differs from the committed value.
    /// Purely observational; nothing is committed. Out-of-range indices
    /// are ignored.
    pub fn select_index(&self, index: usize) {
        let value = self
            .inner
            .read()
            .ok()
            .and_then(|guard| guard.options.get(index).map(|option| option.value.clone()));
        let Some(value) = value else {
            return;
        };

        self.cursor.store(index, Ordering::SeqCst);

        let changed = if let Ok(mut guard) = self.inner.write() {
            guard.selected = value.clone();
            guard.selected != guard.committed
        } else {
            false
        };

        if changed {
            self.events.push(FieldEvent::Change(value));
        }
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// The value currently highlighted in the editor.
    pub fn selected_value(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.selected.clone())
            .unwrap_or_default()
    }

    /// Check whether there is anything to save.
    ///
    /// Submit is disabled whenever the selected value equals the committed
    /// one.
    pub fn can_save(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.selected != guard.committed)
            .unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Commit coordinator
    // -------------------------------------------------------------------------

    /// Persist the selected value.
    ///
    /// Emits [`FieldEvent::Submit`], posts the selected value on a
    /// background task, and closes the edit form immediately without
    /// waiting for the response. Once the request resolves, a 2xx promotes
    /// the value to committed and emits [`FieldEvent::Update`]; anything
    /// else sets the error indicator and commits nothing.
    ///
    /// A save issued while another commit is outstanding is ignored.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn save(&self) {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            log::warn!("{}: save ignored, commit already in flight", self.id);
            return;
        }

        self.events.push(FieldEvent::Submit);

        let value = self.selected_value();
        let field = self.clone();
        let handle = tokio::spawn(async move {
            let result = field.client.commit(&value).await;
            field.apply_commit_result(&value, result);
            field.in_flight.store(false, Ordering::SeqCst);
        });
        if let Ok(mut guard) = self.pending.lock() {
            *guard = Some(handle);
        }

        self.close();
    }

    /// Check if a commit request is outstanding. Drives the busy
    /// indicator.
    pub fn is_saving(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Check if the last commit attempt failed. Exactly one of the
    /// error/success indicators is shown at any time.
    pub fn save_failed(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.save_failed)
            .unwrap_or(false)
    }

    /// Wait for the outstanding commit task, if any, to settle.
    pub async fn wait_idle(&self) {
        let handle = self
            .pending
            .lock()
            .ok()
            .and_then(|mut guard| guard.take());
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    fn apply_commit_result(&self, value: &str, result: Result<(), CommitError>) {
        match result {
            Ok(()) => {
                if let Ok(mut guard) = self.inner.write() {
                    guard.committed = value.to_string();
                    guard.save_failed = false;
                }
                self.events.push(FieldEvent::Update(value.to_string()));
            }
            Err(error) => {
                log::error!("{}: commit of {:?} failed: {}", self.id, value, error);
                if let Ok(mut guard) = self.inner.write() {
                    guard.save_failed = true;
                }
            }
        }
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Committed value and options
    // -------------------------------------------------------------------------

    /// The value considered persisted.
    pub fn committed_value(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.committed.clone())
            .unwrap_or_default()
    }

    /// The text shown in display mode: the committed value's label, or the
    /// raw committed value when no option matches it.
    pub fn display_label(&self) -> String {
        self.inner
            .read()
            .map(|guard| {
                guard
                    .options
                    .iter()
                    .find(|option| option.value == guard.committed)
                    .map(|option| option.label.clone())
                    .unwrap_or_else(|| guard.committed.clone())
            })
            .unwrap_or_default()
    }

    /// Get all options.
    pub fn options(&self) -> Vec<FieldOption> {
        self.inner
            .read()
            .map(|guard| guard.options.clone())
            .unwrap_or_default()
    }

    /// Get the number of options.
    pub fn options_len(&self) -> usize {
        self.inner
            .read()
            .map(|guard| guard.options.len())
            .unwrap_or(0)
    }

    /// Get the option at `index`.
    pub fn option_at(&self, index: usize) -> Option<FieldOption> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.options.get(index).cloned())
    }

    /// Replace the option list.
    ///
    /// The committed and selected values are left untouched; the dropdown
    /// re-anchors to them the next time the editor opens.
    pub fn set_options(&self, options: Vec<impl OptionItem>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.options = options.iter().map(FieldOption::from).collect();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Drain all pending notifications, in emission order.
    pub fn drain_events(&self) -> Vec<FieldEvent> {
        self.events.drain()
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the field state has changed and needs re-render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag after rendering.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Clone for EditField {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            editing: Arc::clone(&self.editing),
            cursor: Arc::clone(&self.cursor),
            dirty: Arc::clone(&self.dirty),
            in_flight: Arc::clone(&self.in_flight),
            events: self.events.clone(),
            pending: Arc::clone(&self.pending),
            client: self.client.clone(),
        }
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`EditField`].
///
/// Uses the typestate pattern to ensure required fields are set at compile
/// time.
///
/// # Required Fields
///
/// - `action` - URL prefix commits are posted under
/// - `value` - the initially committed value
///
/// # Example
///
/// ```ignore
/// let field = EditField::builder()
///     .action("/api/field")
///     .value("a")
///     .options(vec![("a", "Alpha"), ("b", "Beta")])
///     .timeout(Duration::from_secs(30))
///     .build();
/// ```
pub struct EditFieldBuilder<Action, Value> {
    action: Action,
    value: Value,
    options: Vec<FieldOption>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
}

impl EditFieldBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            action: Missing,
            value: Missing,
            options: Vec::new(),
            timeout: None,
            http_client: None,
        }
    }
}

impl Default for EditFieldBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> EditFieldBuilder<Missing, V> {
    /// Sets the URL prefix commits are posted under.
    pub fn action(self, action: impl Into<String>) -> EditFieldBuilder<Set<String>, V> {
        EditFieldBuilder {
            action: Set(action.into()),
            value: self.value,
            options: self.options,
            timeout: self.timeout,
            http_client: self.http_client,
        }
    }
}

impl<A> EditFieldBuilder<A, Missing> {
    /// Sets the initially committed value.
    pub fn value(self, value: impl Into<String>) -> EditFieldBuilder<A, Set<String>> {
        EditFieldBuilder {
            action: self.action,
            value: Set(value.into()),
            options: self.options,
            timeout: self.timeout,
            http_client: self.http_client,
        }
    }
}

impl<A, V> EditFieldBuilder<A, V> {
    /// Sets the selectable options.
    pub fn options(mut self, options: Vec<impl OptionItem>) -> Self {
        self.options = options.iter().map(FieldOption::from).collect();
        self
    }

    /// Appends a single option.
    pub fn option(mut self, option: impl OptionItem) -> Self {
        self.options.push(FieldOption::from(&option));
        self
    }

    /// Sets a per-request timeout for commits.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client for commits.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl EditFieldBuilder<Set<String>, Set<String>> {
    /// Builds the [`EditField`].
    ///
    /// Only available once both `action` and `value` have been set.
    pub fn build(self) -> EditField {
        let mut client = CommitClient::new(self.action.0);
        if let Some(timeout) = self.timeout {
            client = client.with_timeout(timeout);
        }
        if let Some(http_client) = self.http_client {
            client = client.with_http_client(http_client);
        }

        let value = self.value.0;
        EditField {
            id: FieldId::new(),
            inner: Arc::new(RwLock::new(EditFieldInner {
                committed: value.clone(),
                selected: value,
                options: self.options,
                save_failed: false,
            })),
            editing: Arc::new(AtomicBool::new(false)),
            cursor: Arc::new(AtomicUsize::new(0)),
            dirty: Arc::new(AtomicBool::new(false)),
            in_flight: Arc::new(AtomicBool::new(false)),
            events: EventQueue::default(),
            pending: Arc::new(Mutex::new(None)),
            client,
        }
    }
}
