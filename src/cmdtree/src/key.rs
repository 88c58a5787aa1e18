//! Path keys: the lowercase token sequences sub-commands are registered under.

use std::fmt;

/// An immutable, ordered sequence of non-empty lowercase tokens.
///
/// A `PathKey` identifies one registered sub-command, e.g. `["config", "set"]`.
/// Tokens are case-folded at construction, so two keys are equal iff they have
/// the same tokens in the same order regardless of the casing they were built
/// from. Ordering is lexicographic over the token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey {
    tokens: Vec<String>,
}

impl PathKey {
    /// Build a key from raw tokens, case-folding each to lowercase.
    ///
    /// Returns `None` if no tokens are given or any token is empty; a key
    /// always holds at least one non-empty token.
    pub fn new<I, S>(tokens: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|t| t.as_ref().to_lowercase())
            .collect();

        if tokens.is_empty() || tokens.iter().any(String::is_empty) {
            return None;
        }

        Some(Self { tokens })
    }

    /// Number of tokens in the key. Always ≥ 1.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// The tokens of this key, in order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether this key is a token-wise prefix of `input`.
    ///
    /// True iff `input` has at least as many tokens as the key and every key
    /// token equals the input token at the same index. `input` is expected to
    /// be lowercased by the caller.
    pub fn is_prefix_of(&self, input: &[String]) -> bool {
        input.len() >= self.tokens.len() && self.tokens == input[..self.tokens.len()]
    }
}

impl fmt::Display for PathKey {
    /// Space-joined canonical form, e.g. `config set`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}
