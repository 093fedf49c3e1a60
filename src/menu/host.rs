//! Host seam driven by the menu engine
//!
//! A host owns the menu's root and everything DOM-shaped: discovering layer
//! markers, decorating layers, measuring the viewport, wiring listeners and
//! providing the tween engine. The engine never touches the document except
//! through this trait. The browser implementation is
//! [`WebHost`](crate::web::WebHost).

use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::animation::Animator;
use crate::errors::MenuError;
use crate::models::LayerMarker;

/// Hosts are owned by their menu; `'static` lets deferred work capture them
pub trait MenuHost: 'static {
    /// Handle to one element; equality is element identity
    type Node: Clone + PartialEq + Debug + 'static;

    fn root(&self) -> &Self::Node;

    /// Every layer marker under the root, in document order
    fn scan_layers(&self) -> Result<Vec<LayerMarker<Self::Node>>, MenuError>;

    fn add_class(&self, node: &Self::Node, class_name: &str) -> Result<(), MenuError>;

    /// Assign inline style properties by their JS property names
    fn apply_style(&self, node: &Self::Node, style: &BTreeMap<String, String>) -> Result<(), MenuError>;

    /// Values of every forward trigger inside `layer`, in document order
    fn forward_triggers(&self, layer: &Self::Node) -> Result<Vec<Option<String>>, MenuError>;

    fn viewport_width(&self) -> f64;

    fn animator(&self) -> &dyn Animator<Self::Node>;

    /// Attach the delegated click listener to the root
    fn listen_clicks(&self) -> Result<(), MenuError>;

    fn unlisten_clicks(&self) -> Result<(), MenuError>;

    /// Attach touchstart/touchmove/touchend listeners to one layer
    fn listen_swipes(&self, layer: &Self::Node) -> Result<(), MenuError>;

    fn unlisten_swipes(&self, layer: &Self::Node) -> Result<(), MenuError>;

    fn listen_resize(&self) -> Result<(), MenuError>;

    fn unlisten_resize(&self) -> Result<(), MenuError>;
}
