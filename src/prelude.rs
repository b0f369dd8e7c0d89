//! Prelude module for convenient imports.
//!
//! ```
//! use citadel::prelude::*;
//! ```

pub use crate::application::Application;
pub use crate::command::{Action, Command};
pub use crate::query::{Completion, QueryHandle, QueryState};
pub use crate::runtime::Runtime;
pub use crate::subscription::Subscription;
pub use crate::view::{Presentation, present};
