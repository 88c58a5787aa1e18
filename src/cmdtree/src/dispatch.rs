//! Dispatch orchestration: resolution, gating, and handler invocation.

use tracing::{debug, trace};

use crate::complete::CompletionEngine;
use crate::registry::Registry;
use crate::resolver::{Resolution, Resolver};

/// A sub-command handler.
///
/// `C` is the caller type (whoever issued the command) and `X` the invocation
/// context the host environment threads through. `args` are the tokens left
/// after the registered path has been stripped.
pub trait Handler<C, X> {
    /// Run the sub-command. The returned boolean is the handled flag the
    /// dispatcher passes back to the host environment.
    fn execute(&self, caller: &C, ctx: &X, args: &[String]) -> bool;

    /// Dynamic tab-completion suggestions for the remaining arguments.
    ///
    /// The default returns `None`, meaning the handler does not support
    /// dynamic completion; override it to opt in. `Some(vec![])` means
    /// "supported, nothing to suggest right now".
    fn complete(&self, caller: &C, ctx: &X, args: &[String]) -> Option<Vec<String>> {
        let _ = (caller, ctx, args);
        None
    }
}

/// A [`Handler`] built from a plain function. See [`handler_fn`].
#[derive(Debug, Clone)]
pub struct FnHandler<F> {
    f: F,
}

impl<C, X, F> Handler<C, X> for FnHandler<F>
where
    F: Fn(&C, &X, &[String]) -> bool,
{
    fn execute(&self, caller: &C, ctx: &X, args: &[String]) -> bool {
        (self.f)(caller, ctx, args)
    }
}

/// Wrap a closure as a [`Handler`] without dynamic completion.
///
/// ```rust,ignore
/// registry.register(
///     ["about"],
///     SubCommandConfig::new(),
///     handler_fn(|caller, ctx, args| { /* ... */ true }),
/// )?;
/// ```
pub fn handler_fn<F>(f: F) -> FnHandler<F> {
    FnHandler { f }
}

/// Decides whether a caller satisfies role and permission requirements.
///
/// The dispatcher never interprets the identifiers; they are whatever the
/// embedding application put in its [`SubCommandConfig`]s.
///
/// [`SubCommandConfig`]: crate::SubCommandConfig
pub trait Authorizer<C> {
    /// Whether `caller` holds the required role.
    fn check_role(&self, caller: &C, role: &str) -> bool;

    /// Whether `caller` holds the required permission.
    fn check_permission(&self, caller: &C, permission: &str) -> bool;
}

/// Callbacks for the three dispatch outcomes that do not reach a handler.
pub trait DispatchHooks<C, X> {
    /// No registered path matched the input. The returned boolean becomes
    /// the dispatch result, letting the host decide what an unhandled
    /// invocation means.
    fn no_match(&self, tokens: &[String], caller: &C, ctx: &X) -> bool;

    /// The caller failed the role check for the resolved sub-command.
    fn wrong_role(&self, resolution: &Resolution<'_, C, X>, caller: &C);

    /// The caller passed the role check but failed the permission check.
    fn no_permission(&self, resolution: &Resolution<'_, C, X>, caller: &C);
}

/// Orchestrates one command invocation: resolve, gate, invoke.
///
/// Construction consumes the [`Registry`], freezing it; after that every
/// method takes `&self`, so a dispatcher can be shared across threads when
/// its caller and context types allow it.
pub struct Dispatcher<C, X> {
    registry: Registry<C, X>,
    authorizer: Box<dyn Authorizer<C> + Send + Sync>,
    hooks: Box<dyn DispatchHooks<C, X> + Send + Sync>,
}

impl<C, X> Dispatcher<C, X> {
    /// Build a dispatcher from a wired registry and its collaborators.
    pub fn new(
        registry: Registry<C, X>,
        authorizer: impl Authorizer<C> + Send + Sync + 'static,
        hooks: impl DispatchHooks<C, X> + Send + Sync + 'static,
    ) -> Self {
        Self {
            registry,
            authorizer: Box::new(authorizer),
            hooks: Box::new(hooks),
        }
    }

    /// Read-only view of the frozen registry.
    pub fn registry(&self) -> &Registry<C, X> {
        &self.registry
    }

    /// Dispatch one invocation.
    ///
    /// Exactly one of four things happens: the `no_match` hook runs (and its
    /// result is returned), the `wrong_role` hook runs, the `no_permission`
    /// hook runs (both of these report handled), or the handler runs with
    /// the remaining arguments (its own result is returned). The role check
    /// strictly precedes the permission check, so a caller with the wrong
    /// role never sees a permission denial.
    pub fn dispatch(&self, tokens: &[String], caller: &C, ctx: &X) -> bool {
        let resolver = Resolver::new(&self.registry);
        let Some(resolution) = resolver.resolve(tokens) else {
            debug!(input = ?tokens, "no sub-command matched");
            return self.hooks.no_match(tokens, caller, ctx);
        };

        let entry = resolution.entry();
        if !entry.role_passes(self.authorizer.as_ref(), caller) {
            debug!(command = %entry.name(), "caller failed role check");
            self.hooks.wrong_role(&resolution, caller);
            return true;
        }

        if !entry.permission_passes(self.authorizer.as_ref(), caller) {
            debug!(command = %entry.name(), "caller failed permission check");
            self.hooks.no_permission(&resolution, caller);
            return true;
        }

        trace!(command = %entry.name(), args = ?resolution.args(), "invoking handler");
        entry.handler().execute(caller, ctx, resolution.args())
    }

    /// Tab-completion suggestions for a partial invocation.
    ///
    /// See [`CompletionEngine`] for the suggestion rules; entries the caller
    /// is not allowed to run are never suggested.
    pub fn complete(&self, tokens: &[String], caller: &C, ctx: &X) -> Vec<String> {
        CompletionEngine::new(&self.registry, self.authorizer.as_ref()).complete(tokens, caller, ctx)
    }
}
