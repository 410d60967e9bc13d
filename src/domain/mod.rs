//! Domain layer: the template tree, its cursor and structural edits
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod element;
pub mod error;
pub mod mutation;
pub mod outline;
pub mod render;
pub mod request;
pub mod tree;

pub use arena::{Node, TreeArena};
pub use element::{
    Attribute, AwaitArm, AwaitBinding, Branch, EachBinding, Element, ElementKind, Migration,
    NodeId,
};
pub use error::{DomainError, TreeResult};
pub use mutation::InsertPosition;
pub use outline::{node_label, TreeOutline};
pub use render::{RenderOptions, Renderer};
pub use request::{create_element, ElementRequest};
pub use tree::{Tree, DEFAULT_ROOT_TAG};
