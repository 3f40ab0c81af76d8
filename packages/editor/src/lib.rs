//! # Dropzone Editor
//!
//! Mutation and history engine for a drag-and-drop tree editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ gesture layer: begin / over / end events    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ drag: resolve targets → provisional actions │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: dispatch → reducer → history       │
//! │  - Apply actions atomically                 │
//! │  - Record final actions only                │
//! │  - Cache zones while unmounted              │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dropzone_editor::{Descriptor, EditSession, GestureEvent};
//!
//! let mut session = EditSession::new("editor-1", data);
//!
//! let source = Descriptor::drawer("drag-1", "Heading");
//! let target = Descriptor::zone("root");
//!
//! session.on_drag_start(&GestureEvent::new(Some(source.clone()), None))?;
//! session.on_drag_over(&mut GestureEvent::new(Some(source.clone()), Some(target.clone())))?;
//! session.on_drag_end(&GestureEvent::new(Some(source), Some(target)))?;
//!
//! // One history entry for the whole drag
//! session.back()?;
//! ```

mod actions;
mod drag;
mod errors;
mod history;
mod session;
mod zone_cache;

pub use actions::{Action, ActionError};
pub use drag::{
    resolve_target, Descriptor, DescriptorData, DescriptorKind, DragController, DragOperation,
    GestureEvent, Position, ZONE_TARGET_PREFIX,
};
pub use errors::EditorError;
pub use history::{History, HistoryCommand, HistoryStore};
pub use session::{EditSession, SessionOptions};
pub use zone_cache::ZoneCache;

// Re-export the document model for convenience
pub use dropzone_document as document;
