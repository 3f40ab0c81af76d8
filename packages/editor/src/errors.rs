//! Error types for the editor

use dropzone_document::DocumentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Action error: {0}")]
    Action(#[from] crate::actions::ActionError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}
