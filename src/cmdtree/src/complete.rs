//! Tab completion, kept consistent with resolution.

use tracing::trace;

use crate::dispatch::Authorizer;
use crate::registry::Registry;
use crate::resolver::Resolver;

/// Produces next-token suggestions for a partially typed invocation.
///
/// Two sources feed one ordered list: static suggestions from sibling
/// registered paths (registration order), then dynamic suggestions from the
/// resolved handler, if it supports them. Entries whose role or permission
/// gate fails for the caller are invisible to both sources. Duplicates are
/// not removed.
pub struct CompletionEngine<'a, C, X> {
    registry: &'a Registry<C, X>,
    authorizer: &'a dyn Authorizer<C>,
}

impl<'a, C, X> CompletionEngine<'a, C, X> {
    /// Create a completion engine over a registry, gating suggestions
    /// through the same authorizer dispatch uses.
    pub fn new(registry: &'a Registry<C, X>, authorizer: &'a dyn Authorizer<C>) -> Self {
        Self {
            registry,
            authorizer,
        }
    }

    /// Suggestions for `tokens`, where the last token is the one being typed
    /// (it may be empty). Matching is case-folded; suggestions are the
    /// registered token text. Empty input yields no suggestions.
    pub fn complete(&self, tokens: &[String], caller: &C, ctx: &X) -> Vec<String> {
        let Some((partial, prefix)) = tokens.split_last() else {
            return Vec::new();
        };

        let depth = prefix.len();
        let prefix: Vec<String> = prefix.iter().map(|t| t.to_lowercase()).collect();
        let partial = partial.to_lowercase();

        let mut suggestions = Vec::new();

        // Static: the next token of every gate-passing sibling path exactly
        // one level deeper than the completed prefix.
        for entry in self.registry.entries() {
            let key = entry.path().tokens();
            if key.len() != tokens.len()
                || key[..depth] != prefix[..]
                || !key[depth].starts_with(&partial)
            {
                continue;
            }
            if !entry.passes(self.authorizer, caller) {
                continue;
            }
            suggestions.push(key[depth].clone());
        }

        // Dynamic: delegate to the resolved handler when it opts in.
        let resolver = Resolver::new(self.registry);
        if let Some(resolution) = resolver.resolve(tokens)
            && resolution.entry().passes(self.authorizer, caller)
            && let Some(dynamic) =
                resolution
                    .entry()
                    .handler()
                    .complete(caller, ctx, resolution.args())
        {
            suggestions.extend(dynamic);
        }

        trace!(input = ?tokens, count = suggestions.len(), "completion computed");
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dispatch::{Authorizer, DispatchHooks, Dispatcher, Handler, handler_fn};
    use crate::registry::{Registry, SubCommandConfig};
    use crate::resolver::Resolution;

    #[derive(Debug, Default)]
    struct Caller {
        permissions: HashSet<String>,
    }

    impl Caller {
        fn with_permissions(permissions: &[&str]) -> Self {
            Self {
                permissions: permissions.iter().map(|p| (*p).to_string()).collect(),
            }
        }
    }

    struct PermissionAuthorizer;

    impl Authorizer<Caller> for PermissionAuthorizer {
        fn check_role(&self, _caller: &Caller, _role: &str) -> bool {
            true
        }

        fn check_permission(&self, caller: &Caller, permission: &str) -> bool {
            caller.permissions.contains(permission)
        }
    }

    struct SilentHooks;

    impl DispatchHooks<Caller, ()> for SilentHooks {
        fn no_match(&self, _tokens: &[String], _caller: &Caller, _ctx: &()) -> bool {
            false
        }

        fn wrong_role(&self, _resolution: &Resolution<'_, Caller, ()>, _caller: &Caller) {}

        fn no_permission(&self, _resolution: &Resolution<'_, Caller, ()>, _caller: &Caller) {}
    }

    /// Handler that suggests fixed values for its first argument.
    struct ValueHandler {
        values: Vec<&'static str>,
    }

    impl Handler<Caller, ()> for ValueHandler {
        fn execute(&self, _caller: &Caller, _ctx: &(), _args: &[String]) -> bool {
            true
        }

        fn complete(&self, _caller: &Caller, _ctx: &(), _args: &[String]) -> Option<Vec<String>> {
            Some(self.values.iter().map(|v| (*v).to_string()).collect())
        }
    }

    fn accept(_caller: &Caller, _ctx: &(), _args: &[String]) -> bool {
        true
    }

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| (*t).to_string()).collect()
    }

    fn make_dispatcher(registry: Registry<Caller, ()>) -> Dispatcher<Caller, ()> {
        Dispatcher::new(registry, PermissionAuthorizer, SilentHooks)
    }

    #[test]
    fn test_partial_token_scopes_suggestions() {
        let mut registry = Registry::new();
        registry
            .register(["config", "set"], SubCommandConfig::new(), handler_fn(accept))
            .unwrap();
        registry
            .register(["config", "get"], SubCommandConfig::new(), handler_fn(accept))
            .unwrap();
        let dispatcher = make_dispatcher(registry);

        let caller = Caller::default();
        let suggestions = dispatcher.complete(&strings(&["config", "s"]), &caller, &());

        assert_eq!(suggestions, strings(&["set"]));
    }

    #[test]
    fn test_empty_final_token_lists_all_siblings_in_registration_order() {
        let mut registry = Registry::new();
        registry
            .register(["config", "set"], SubCommandConfig::new(), handler_fn(accept))
            .unwrap();
        registry
            .register(["config", "get"], SubCommandConfig::new(), handler_fn(accept))
            .unwrap();
        let dispatcher = make_dispatcher(registry);

        let caller = Caller::default();
        let suggestions = dispatcher.complete(&strings(&["config", ""]), &caller, &());

        assert_eq!(suggestions, strings(&["set", "get"]));
    }

    #[test]
    fn test_gated_entries_are_invisible() {
        let mut registry = Registry::new();
        registry
            .register(
                ["config", "set"],
                SubCommandConfig::new().with_permission("config.write"),
                handler_fn(accept),
            )
            .unwrap();
        registry
            .register(
                ["config", "get"],
                SubCommandConfig::new().with_permission("config.read"),
                handler_fn(accept),
            )
            .unwrap();
        let dispatcher = make_dispatcher(registry);

        let caller = Caller::with_permissions(&["config.read"]);
        let suggestions = dispatcher.complete(&strings(&["config", ""]), &caller, &());

        assert_eq!(suggestions, strings(&["get"]));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let mut registry = Registry::new();
        registry
            .register(["config", "set"], SubCommandConfig::new(), handler_fn(accept))
            .unwrap();
        let dispatcher = make_dispatcher(registry);

        let caller = Caller::default();
        let suggestions = dispatcher.complete(&strings(&["Config", "S"]), &caller, &());

        assert_eq!(suggestions, strings(&["set"]));
    }

    #[test]
    fn test_deeper_and_shallower_paths_do_not_suggest() {
        let mut registry = Registry::new();
        registry
            .register(["config"], SubCommandConfig::new(), handler_fn(accept))
            .unwrap();
        registry
            .register(
                ["config", "set", "deep"],
                SubCommandConfig::new(),
                handler_fn(accept),
            )
            .unwrap();
        let dispatcher = make_dispatcher(registry);

        // Static suggestions come only from paths exactly one token deeper
        // than the completed prefix.
        let caller = Caller::default();
        let suggestions = dispatcher.complete(&strings(&["config", "s"]), &caller, &());

        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_dynamic_suggestions_append_after_static() {
        let mut registry = Registry::new();
        registry
            .register(
                ["config", "set"],
                SubCommandConfig::new(),
                ValueHandler {
                    values: vec!["volume", "verbosity"],
                },
            )
            .unwrap();
        registry
            .register(
                ["config", "set", "vanish"],
                SubCommandConfig::new(),
                handler_fn(accept),
            )
            .unwrap();
        let dispatcher = make_dispatcher(registry);

        // "config set v": static sibling "vanish" first, then the resolved
        // ["config","set"] handler's dynamic values for the partial arg.
        let caller = Caller::default();
        let suggestions = dispatcher.complete(&strings(&["config", "set", "v"]), &caller, &());

        assert_eq!(suggestions, strings(&["vanish", "volume", "verbosity"]));
    }

    #[test]
    fn test_handler_without_capability_contributes_nothing() {
        let mut registry = Registry::new();
        registry
            .register(["config", "set"], SubCommandConfig::new(), handler_fn(accept))
            .unwrap();
        let dispatcher = make_dispatcher(registry);

        let caller = Caller::default();
        let suggestions = dispatcher.complete(&strings(&["config", "set", "v"]), &caller, &());

        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_gated_resolved_handler_contributes_no_dynamic_suggestions() {
        let mut registry = Registry::new();
        registry
            .register(
                ["config", "set"],
                SubCommandConfig::new().with_permission("config.write"),
                ValueHandler {
                    values: vec!["volume"],
                },
            )
            .unwrap();
        let dispatcher = make_dispatcher(registry);

        let caller = Caller::default();
        let suggestions = dispatcher.complete(&strings(&["config", "set", "v"]), &caller, &());

        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let mut registry = Registry::new();
        registry
            .register(["about"], SubCommandConfig::new(), handler_fn(accept))
            .unwrap();
        let dispatcher = make_dispatcher(registry);

        let caller = Caller::default();
        assert!(dispatcher.complete(&[], &caller, &()).is_empty());
    }

    #[test]
    fn test_top_level_completion() {
        let mut registry = Registry::new();
        registry
            .register(["about"], SubCommandConfig::new(), handler_fn(accept))
            .unwrap();
        registry
            .register(["admin", "reload"], SubCommandConfig::new(), handler_fn(accept))
            .unwrap();
        let dispatcher = make_dispatcher(registry);

        let caller = Caller::default();
        let suggestions = dispatcher.complete(&strings(&["a"]), &caller, &());

        // Only "about" has length 1; "admin reload" is two deep.
        assert_eq!(suggestions, strings(&["about"]));
    }
}
