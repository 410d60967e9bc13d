//! Application layer: services and use cases
//!
//! This layer drives the domain tree from edit scripts and depends on I/O
//! boundary traits.

pub mod error;
pub mod error_ext;
pub mod script;
pub mod services;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::PathContextExt;
pub use script::{EditCommand, Motion, ScriptLine, ScriptParser};
pub use session::EditSession;
