//! # Dropzone Document
//!
//! Data model for the drag-and-drop tree editor.
//!
//! A document is a set of named zones, each an ordered list of component
//! items. The `"root"` zone lives in [`Data::content`] and always exists;
//! every other zone is keyed `<parentId>:<area>` in [`Data::zones`].

pub mod ast;
pub mod error;
pub mod id_generator;

pub use ast::{
    zone_key, AppState, ComponentItem, Data, ItemSelector, PropValue, Props, RootData, UiPatch, UiState,
    PLACEHOLDER_PROP, ROOT_ZONE,
};
pub use error::{DocumentError, DocumentResult};
pub use id_generator::{get_session_seed, IdGenerator};
