use std::fmt;

use super::predicate::Conjunction;
use super::rule::Rule;

/// A named OR-of-ANDs group of predicates, referenced as `%name`.
pub(crate) struct Tag<C> {
    pub(crate) name: String,
    pub(crate) groups: Vec<Conjunction<C>>,
}

impl<C> fmt::Debug for Tag<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tag")
            .field("name", &self.name)
            .field("groups", &self.groups)
            .finish()
    }
}

/// A loaded, immutable ruleset. Rules are stored in evaluation order:
/// descending level, then declaration order within a level.
///
/// Obtained from [`RulesEngine::ruleset()`](crate::RulesEngine::ruleset).
/// Thread-safe and shared behind `Arc` by every in-flight evaluation.
pub struct Ruleset<C> {
    pub(crate) rules: Vec<Rule<C>>,
    /// Indexed by the ids that tag reference predicates carry.
    pub(crate) tags: Vec<Tag<C>>,
    #[cfg(feature = "fingerprint")]
    pub(crate) source_hash: Option<blake3::Hash>,
}

impl<C> Ruleset<C> {
    pub(crate) fn new(rules: Vec<Rule<C>>, tags: Vec<Tag<C>>) -> Self {
        Self {
            rules,
            tags,
            #[cfg(feature = "fingerprint")]
            source_hash: None,
        }
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Distinct priority levels, highest first.
    #[must_use]
    pub fn levels(&self) -> Vec<i32> {
        let mut levels: Vec<i32> = self.rules.iter().map(|r| r.level).collect();
        levels.dedup();
        levels
    }

    /// `(level, line)` of every rule in evaluation order.
    #[must_use]
    pub fn rule_order(&self) -> Vec<(i32, usize)> {
        self.rules.iter().map(|r| (r.level, r.line)).collect()
    }

    /// Defined tag names, in order of first mention in the source.
    #[must_use]
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }

    /// BLAKE3 hash of the text this ruleset was loaded from.
    #[cfg(feature = "fingerprint")]
    #[must_use]
    pub fn source_hash(&self) -> Option<&blake3::Hash> {
        self.source_hash.as_ref()
    }
}

impl<C> fmt::Debug for Ruleset<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ruleset")
            .field("rules", &self.rules)
            .field("tags", &self.tags)
            .finish()
    }
}

impl<C> fmt::Display for Ruleset<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ruleset({} rules, {} levels, {} tags)",
            self.rules.len(),
            self.levels().len(),
            self.tags.len(),
        )
    }
}
