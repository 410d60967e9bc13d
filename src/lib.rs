//! Structural editor for Svelte-style template trees.
//!
//! A [`domain::Tree`] holds markup elements, components and control-flow
//! blocks together with a single selection cursor. Navigation moves the
//! cursor, mutations replace or insert nodes around it, and the tree
//! renders back to canonical markup.
//!
//! ```
//! use svisuelte::domain::{Element, Tree};
//!
//! let mut tree = Tree::new();
//! tree.append_child_element(Element::expression("name")).unwrap();
//! assert_eq!(tree.render(), "<div>\n\t{name}\n</div>\n");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
