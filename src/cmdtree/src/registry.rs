//! Sub-command registration and the append-only path registry.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::dispatch::{Authorizer, Handler};
use crate::key::PathKey;

/// Errors that can occur when registering a sub-command.
///
/// Registration happens once at wiring time; either error should fail the
/// application startup rather than be swallowed.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registration path had no tokens, or contained an empty token.
    #[error("Sub-command path must contain at least one non-empty token")]
    EmptyPath,

    /// A sub-command is already registered under the same path.
    #[error("Sub-command already registered under path: {0}")]
    DuplicatePath(String),
}

/// Gating metadata attached to a sub-command at registration.
///
/// `role` and `permission` are opaque identifiers interpreted by the
/// [`Authorizer`](crate::Authorizer); `None` means that gate is open without
/// consulting the authorizer.
#[derive(Debug, Clone, Default)]
pub struct SubCommandConfig {
    /// Required caller role, checked before the permission.
    pub role: Option<String>,

    /// Required permission identifier.
    pub permission: Option<String>,

    /// Human-readable description, used only for diagnostics and listings.
    pub description: Option<String>,
}

impl SubCommandConfig {
    /// Create an unrestricted config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the required role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the required permission identifier.
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A registered sub-command: its path, gating config, and handler.
///
/// Created by [`Registry::register`] and immutable afterwards. The canonical
/// name is stamped at registration as the space-joined lowercase path.
pub struct SubCommandEntry<C, X> {
    path: PathKey,
    name: String,
    config: SubCommandConfig,
    handler: Box<dyn Handler<C, X> + Send + Sync>,
}

impl<C, X> SubCommandEntry<C, X> {
    /// The path this entry is registered under.
    pub fn path(&self) -> &PathKey {
        &self.path
    }

    /// Canonical name: the space-joined lowercase path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The gating metadata supplied at registration.
    pub fn config(&self) -> &SubCommandConfig {
        &self.config
    }

    /// The registered handler.
    pub fn handler(&self) -> &(dyn Handler<C, X> + Send + Sync) {
        self.handler.as_ref()
    }

    /// Whether `caller` satisfies this entry's role requirement. An entry
    /// without a role passes without consulting the authorizer.
    pub fn role_passes(&self, authorizer: &dyn Authorizer<C>, caller: &C) -> bool {
        match self.config.role.as_deref() {
            Some(role) => authorizer.check_role(caller, role),
            None => true,
        }
    }

    /// Whether `caller` satisfies this entry's permission requirement.
    pub fn permission_passes(&self, authorizer: &dyn Authorizer<C>, caller: &C) -> bool {
        match self.config.permission.as_deref() {
            Some(permission) => authorizer.check_permission(caller, permission),
            None => true,
        }
    }

    /// Combined gate: role first, then permission, short-circuiting.
    pub fn passes(&self, authorizer: &dyn Authorizer<C>, caller: &C) -> bool {
        self.role_passes(authorizer, caller) && self.permission_passes(authorizer, caller)
    }
}

impl<C, X> fmt::Debug for SubCommandEntry<C, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubCommandEntry")
            .field("path", &self.path)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Append-only registry of sub-commands keyed by [`PathKey`].
///
/// Commands are declared once at wiring time; there is no update or remove.
/// Iteration order is insertion order, which is what keeps completion output
/// stable across runs.
#[derive(Debug)]
pub struct Registry<C, X> {
    entries: IndexMap<PathKey, SubCommandEntry<C, X>>,
}

impl<C, X> Default for Registry<C, X> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, X> Registry<C, X> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Register a handler under a token path.
    ///
    /// Tokens are case-folded to lowercase before keying, so
    /// `["Config", "Set"]` and `["config", "set"]` collide. Fails with
    /// [`RegistryError::EmptyPath`] when the path has no tokens (or an empty
    /// token) and [`RegistryError::DuplicatePath`] when the path is already
    /// taken; the earlier registration is left intact.
    pub fn register<I, S>(
        &mut self,
        path: I,
        config: SubCommandConfig,
        handler: impl Handler<C, X> + Send + Sync + 'static,
    ) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = PathKey::new(path).ok_or(RegistryError::EmptyPath)?;

        if self.entries.contains_key(&key) {
            warn!(path = %key, "duplicate sub-command registration rejected");
            return Err(RegistryError::DuplicatePath(key.to_string()));
        }

        let entry = SubCommandEntry {
            name: key.to_string(),
            path: key.clone(),
            config,
            handler: Box::new(handler),
        };

        debug!(path = %key, "registered sub-command");
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Look up the entry registered under exactly `key`.
    pub fn get(&self, key: &PathKey) -> Option<&SubCommandEntry<C, X>> {
        self.entries.get(key)
    }

    /// Iterate over all entries in registration order. Read-only.
    pub fn entries(&self) -> impl Iterator<Item = &SubCommandEntry<C, X>> {
        self.entries.values()
    }

    /// Number of registered sub-commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no sub-commands.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
