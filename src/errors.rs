//! Error types for the layered menu
//!
//! Construction errors are returned to the caller. Everything that fails
//! inside `init`, `reinit`, `destroy`, `set_layer`, `reset` or `back` is
//! caught at the operation boundary and handed to the configured error
//! handler along with an [`ErrorContext`], or logged when none is set.

use std::fmt;
use std::rc::Rc;
use thiserror::Error;

use crate::models::{LayerKey, MenuEvent};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MenuError {
    /// No root element could be resolved at construction
    #[error("LayeredMenu: root element not found")]
    MissingRoot,

    /// A layer marker carries an empty key
    #[error("LayeredMenu: data-menu-layer is required")]
    MissingLayerKey,

    /// Two markers share the same key
    #[error("LayeredMenu: duplicate data-menu-layer '{0}'")]
    DuplicateLayerKey(LayerKey),

    /// Navigation target does not exist in the registry
    #[error("LayeredMenu: layer '{0}' not found")]
    LayerNotFound(String),

    /// Direct navigation to a layer restricted to back-navigation
    #[error("LayeredMenu: direct access to layer '{0}' is not allowed")]
    AccessDenied(LayerKey),

    /// Lifecycle call on a destroyed instance
    #[error("LayeredMenu: instance has been destroyed")]
    Destroyed,

    /// Configuration names an event outside the closed set
    #[error("LayeredMenu: unknown event '{0}'")]
    UnknownEvent(String),

    #[error("LayeredMenu: invalid configuration: {0}")]
    InvalidConfig(String),

    /// An event handler reported failure
    #[error("LayeredMenu: {event} handler failed: {message}")]
    Handler { event: MenuEvent, message: String },

    #[error("LayeredMenu: animation failed: {0}")]
    Animation(String),

    #[error("LayeredMenu: DOM operation failed: {0}")]
    Dom(String),
}

impl MenuError {
    /// Error class name exposed to JS as `error.name`
    pub fn kind(&self) -> &'static str {
        match self {
            MenuError::MissingRoot => "MissingRootError",
            MenuError::MissingLayerKey => "MissingLayerKeyError",
            MenuError::DuplicateLayerKey(_) => "DuplicateLayerKeyError",
            MenuError::LayerNotFound(_) => "LayerNotFoundError",
            MenuError::AccessDenied(_) => "AccessDeniedError",
            MenuError::Destroyed => "DestroyedError",
            MenuError::UnknownEvent(_) => "UnknownEventError",
            MenuError::InvalidConfig(_) => "InvalidConfigError",
            MenuError::Handler { .. } => "HandlerError",
            MenuError::Animation(_) => "AnimationError",
            MenuError::Dom(_) => "DomError",
        }
    }
}

/// Operation boundary at which an error was caught
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Init,
    Reinit,
    Destroy,
    SetLayer,
    Reset,
    Back,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Init => "init",
            Operation::Reinit => "reinit",
            Operation::Destroy => "destroy",
            Operation::SetLayer => "setLayer",
            Operation::Reset => "reset",
            Operation::Back => "back",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Second argument of the error hook
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
    pub operation: Operation,
    pub current_layer_key: Option<LayerKey>,
}

/// Error hook configured with `onError`
pub type ErrorHandler = Rc<dyn Fn(&MenuError, &ErrorContext)>;
