//! # Edit Session
//!
//! Owns one editor's live state together with its history, zone cache and
//! drag translator.
//!
//! All mutation goes through [`EditSession::dispatch`]: the action is applied
//! to a copy of the state, the copy replaces the live state, and the result is
//! recorded into history unless the action is provisional.

use crate::drag::{DragController, DragOperation};
use crate::history::{History, HistoryCommand, HistoryStore};
use crate::zone_cache::ZoneCache;
use crate::{Action, EditorError};
use dropzone_document::{AppState, Data, IdGenerator};

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Seeds generated item ids
    pub session_id: String,

    /// Maximum history entries (0 = unlimited)
    pub history_limit: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            session_id: "dropzone".to_string(),
            history_limit: 100,
        }
    }
}

/// Single editing session
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    state: AppState,

    /// Fallback for history navigation when no entry exists
    initial_state: AppState,

    ids: IdGenerator,
    history: HistoryStore,
    zone_cache: ZoneCache,
    drag: DragController,
}

impl EditSession {
    /// Create a session with default options
    pub fn new(id: impl Into<String>, data: Data) -> Self {
        Self::with_options(
            SessionOptions {
                session_id: id.into(),
                ..SessionOptions::default()
            },
            data,
        )
    }

    pub fn with_options(options: SessionOptions, data: Data) -> Self {
        let initial_state = AppState::new(data);
        let mut history = HistoryStore::with_max_levels(options.history_limit);
        history.record(initial_state.clone());

        Self {
            ids: IdGenerator::new(&options.session_id),
            id: options.session_id,
            state: initial_state.clone(),
            initial_state,
            history,
            zone_cache: ZoneCache::new(),
            drag: DragController::new(),
        }
    }

    /// Create a session from a JSON document
    pub fn from_json(id: impl Into<String>, source: &str) -> Result<Self, EditorError> {
        let data = Data::from_json(source)?;
        Ok(Self::new(id, data))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn data(&self) -> &Data {
        &self.state.data
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn zone_cache(&self) -> &ZoneCache {
        &self.zone_cache
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Apply an action and record the result unless it is provisional
    pub fn dispatch(&mut self, action: Action) -> Result<(), EditorError> {
        let mut next = self.state.clone();
        action.apply(&mut next, &mut self.ids, &self.zone_cache)?;
        self.state = next;

        if action.records_history() {
            self.record();
        } else {
            tracing::trace!("applied provisional {}", action.name());
        }

        Ok(())
    }

    /// Dispatch several actions in order, stopping at the first error
    pub fn dispatch_all(&mut self, actions: Vec<Action>) -> Result<(), EditorError> {
        for action in actions {
            self.dispatch(action)?;
        }
        Ok(())
    }

    fn record(&mut self) {
        if self.state.data.has_placeholder() {
            tracing::warn!("refusing to record history: document holds a drag placeholder");
            return;
        }

        if self.history.record(self.state.clone()) {
            tracing::debug!(
                "recorded history entry {} of {}",
                self.history.index() + 1,
                self.history.len()
            );
        }
    }

    /// Undo: restore the previous entry; no-op without a past
    pub fn back(&mut self) -> Result<bool, EditorError> {
        let Some(previous) = self.history.prev_history() else {
            return Ok(false);
        };

        let state = previous.data.clone();
        self.dispatch(Action::Set { state })?;
        self.history.back();
        Ok(true)
    }

    /// Redo: restore the next entry; no-op without a future
    pub fn forward(&mut self) -> Result<bool, EditorError> {
        let Some(next) = self.history.next_history() else {
            return Ok(false);
        };

        let state = next.data.clone();
        self.dispatch(Action::Set { state })?;
        self.history.forward();
        Ok(true)
    }

    /// Replace the timeline and jump to its last entry (or the initial state)
    pub fn set_histories(&mut self, histories: Vec<History>) -> Result<(), EditorError> {
        let state = histories
            .last()
            .map(|entry| entry.data.clone())
            .unwrap_or_else(|| self.initial_state.clone());

        self.dispatch(Action::Set { state })?;
        self.history.set_histories(histories);
        Ok(())
    }

    /// Jump to history entry `index`; ignored when out of bounds
    pub fn set_history_index(&mut self, index: usize) -> Result<bool, EditorError> {
        if index >= self.history.len() {
            return Ok(false);
        }

        let state = self
            .history
            .histories()
            .get(index)
            .map(|entry| entry.data.clone())
            .unwrap_or_else(|| self.initial_state.clone());

        self.dispatch(Action::Set { state })?;
        self.history.set_history_index(index);
        Ok(true)
    }

    /// Run the history command bound to `chord`
    ///
    /// Returns whether the chord was handled, in which case the platform
    /// default must be prevented.
    pub fn handle_chord(&mut self, chord: &str) -> Result<bool, EditorError> {
        match HistoryCommand::from_chord(chord) {
            Some(HistoryCommand::Undo) => {
                self.back()?;
                Ok(true)
            }
            Some(HistoryCommand::Redo) => {
                self.forward()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn on_drag_start(&mut self, operation: &impl DragOperation) -> Result<(), EditorError> {
        let Some(source) = operation.source() else {
            return Ok(());
        };

        let actions = self.drag.begin(source, &self.state.data);
        self.dispatch_all(actions)
    }

    pub fn on_drag_over(&mut self, operation: &mut impl DragOperation) -> Result<(), EditorError> {
        operation.prevent_default();

        let actions = self
            .drag
            .over(operation.source(), operation.target(), &self.state.data);
        self.dispatch_all(actions)
    }

    pub fn on_drag_end(&mut self, operation: &impl DragOperation) -> Result<(), EditorError> {
        let actions = self.drag.end(
            operation.source(),
            operation.target(),
            &self.state.data,
            &mut self.ids,
            &self.zone_cache,
        );
        self.dispatch_all(actions)
    }

    /// Move every non-root zone into the zone cache
    pub fn flush_zones(&mut self) {
        self.zone_cache.flush(&mut self.state.data);
        tracing::debug!("flushed zones, {} cached", self.zone_cache.len());
    }

    /// Re-register a zone, restoring its cached items when it is not live
    pub fn register_zone(&mut self, zone: &str) -> bool {
        self.zone_cache.restore(&mut self.state.data, zone)
    }

    /// Unregister a live zone, keeping its items in the zone cache
    pub fn unregister_zone(&mut self, zone: &str) -> bool {
        self.zone_cache.evict(&mut self.state.data, zone)
    }
}
