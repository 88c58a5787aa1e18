//! Hierarchical sub-command dispatch.
//!
//! This crate routes tokenized command input (`["config", "set", "volume"]`)
//! to handlers registered under multi-token paths. Resolution picks the most
//! specific registered path (longest token-wise prefix), strips it off, and
//! hands the remaining tokens to the handler. Execution is gated by caller
//! role and permission checks, and tab completion stays consistent with
//! resolution.
//!
//! # Wiring
//!
//! Registration happens once at startup; building the [`Dispatcher`] freezes
//! the registry.
//!
//! ```rust,ignore
//! use cmdtree::prelude::*;
//!
//! let mut registry = Registry::new();
//! registry.register(
//!     ["config", "set"],
//!     SubCommandConfig::new()
//!         .with_role("admin")
//!         .with_permission("core.config"),
//!     handler_fn(|caller, ctx, args| {
//!         // args are the tokens after "config set"
//!         true
//!     }),
//! )?;
//!
//! let dispatcher = Dispatcher::new(registry, MyAuthorizer, MyHooks);
//! let handled = dispatcher.dispatch(&tokens, &caller, &ctx);
//! let suggestions = dispatcher.complete(&tokens, &caller, &ctx);
//! ```
//!
//! # Collaborators
//!
//! The engine treats the surrounding application as three small traits: a
//! [`Handler`] per sub-command, one [`Authorizer`] that interprets the role
//! and permission identifiers, and one [`DispatchHooks`] implementation that
//! decides what the user sees on the no-match and access-denied paths.
//! Exactly one of {no-match, wrong-role, no-permission, handler-invoked}
//! happens per dispatch call.
//!
//! The engine itself is pure and synchronous: no I/O, no blocking, no global
//! state. A built dispatcher is `&self` all the way down and can be shared
//! across threads.

mod complete;
mod dispatch;
mod key;
mod registry;
mod resolver;

pub use complete::CompletionEngine;
pub use dispatch::{Authorizer, DispatchHooks, Dispatcher, FnHandler, Handler, handler_fn};
pub use key::PathKey;
pub use registry::{Registry, RegistryError, SubCommandConfig, SubCommandEntry};
pub use resolver::{Resolution, Resolver};

/// Re-export of the types most wiring code needs.
pub mod prelude {
    pub use crate::{
        Authorizer, DispatchHooks, Dispatcher, Handler, PathKey, Registry, RegistryError,
        SubCommandConfig, handler_fn,
    };
}
