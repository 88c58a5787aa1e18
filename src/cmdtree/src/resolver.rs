//! Longest-prefix resolution of input tokens against the registry.

use tracing::trace;

use crate::registry::{Registry, SubCommandEntry};

/// A successful resolution: the matched entry and the remaining arguments.
///
/// Remaining arguments are the input tokens past the matched path, in their
/// original casing (matching is case-folded, argument values are not).
/// Transient: built fresh per dispatch or completion call.
#[derive(Debug)]
pub struct Resolution<'a, C, X> {
    entry: &'a SubCommandEntry<C, X>,
    args: Vec<String>,
}

impl<'a, C, X> Resolution<'a, C, X> {
    /// The matched registry entry.
    pub fn entry(&self) -> &'a SubCommandEntry<C, X> {
        self.entry
    }

    /// The input tokens left after stripping the matched path. May be empty.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Resolves input token sequences to the most specific registered path.
#[derive(Debug)]
pub struct Resolver<'a, C, X> {
    registry: &'a Registry<C, X>,
}

impl<'a, C, X> Resolver<'a, C, X> {
    /// Create a resolver over a registry.
    pub fn new(registry: &'a Registry<C, X>) -> Self {
        Self { registry }
    }

    /// Find the registered path that best matches `tokens`.
    ///
    /// A registered key is a candidate when it is a token-wise prefix of the
    /// case-folded input; the longest candidate wins. Key uniqueness makes a
    /// length tie impossible (two equal-length keys that both prefix one
    /// input are token-equal), but if one ever appeared the lexicographically
    /// smaller path would win, so the result never depends on iteration
    /// order. Returns `None` when no registered path matches.
    ///
    /// O(R·L) over R registered paths of average length L.
    pub fn resolve(&self, tokens: &[String]) -> Option<Resolution<'a, C, X>> {
        let folded: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        let mut best: Option<&SubCommandEntry<C, X>> = None;
        for entry in self.registry.entries() {
            if !entry.path().is_prefix_of(&folded) {
                continue;
            }

            let better = match best {
                None => true,
                Some(current) => {
                    entry.path().len() > current.path().len()
                        || (entry.path().len() == current.path().len()
                            && entry.path() < current.path())
                }
            };
            if better {
                best = Some(entry);
            }
        }

        best.map(|entry| {
            trace!(matched = %entry.path(), "resolved sub-command");
            Resolution {
                entry,
                args: tokens[entry.path().len()..].to_vec(),
            }
        })
    }
}
