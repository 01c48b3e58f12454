use std::collections::{BTreeMap, HashMap};

use crate::parse::{ParseError, ParseErrorKind};
use crate::types::{Conjunction, Rule, Ruleset, Tag};

/// Rules declared at one priority level, in declaration order.
pub(crate) struct RulesLevel<C> {
    rules: Vec<Rule<C>>,
}

/// Groups rules by level while the text is being parsed.
pub(crate) struct RulesAggregator<C> {
    levels: BTreeMap<i32, RulesLevel<C>>,
}

impl<C> RulesAggregator<C> {
    pub(crate) fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    pub(crate) fn add(&mut self, rule: Rule<C>) {
        self.levels
            .entry(rule.level)
            .or_insert_with(|| RulesLevel { rules: Vec::new() })
            .rules
            .push(rule);
    }

    /// Highest level first, declaration order within a level.
    pub(crate) fn into_rules(self) -> Vec<Rule<C>> {
        self.levels
            .into_values()
            .rev()
            .flat_map(|level| level.rules)
            .collect()
    }
}

struct TagEntry<C> {
    name: String,
    groups: Option<Vec<Conjunction<C>>>,
    /// Line of the first `%name` predicate, for undefined-tag errors.
    first_reference: Option<usize>,
}

/// Tag names interned to ids on first mention, so `%name` can be parsed
/// before the tag is defined.
pub(crate) struct TagTable<C> {
    ids: HashMap<String, usize>,
    entries: Vec<TagEntry<C>>,
}

impl<C> TagTable<C> {
    pub(crate) fn new() -> Self {
        Self {
            ids: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn intern(&mut self, name: &str) -> usize {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.entries.len();
        self.ids.insert(name.to_owned(), id);
        self.entries.push(TagEntry {
            name: name.to_owned(),
            groups: None,
            first_reference: None,
        });
        id
    }

    pub(crate) fn reference(&mut self, name: &str, line: usize) -> usize {
        let id = self.intern(name);
        self.entries[id].first_reference.get_or_insert(line);
        id
    }

    pub(crate) fn is_defined(&self, id: usize) -> bool {
        self.entries[id].groups.is_some()
    }

    pub(crate) fn define(&mut self, id: usize, groups: Vec<Conjunction<C>>) {
        self.entries[id].groups = Some(groups);
    }

    /// Every interned tag must have been defined somewhere in the text.
    fn resolve(self) -> Result<Vec<Tag<C>>, ParseError> {
        self.entries
            .into_iter()
            .map(|entry| match entry.groups {
                Some(groups) => Ok(Tag {
                    name: entry.name,
                    groups,
                }),
                None => Err(ParseError::new(
                    entry.first_reference.unwrap_or_default(),
                    ParseErrorKind::UndefinedTag(entry.name),
                )),
            })
            .collect()
    }
}

/// Freeze a fully parsed text into an evaluation-ready [`Ruleset`].
pub(crate) fn compile<C>(
    rules: RulesAggregator<C>,
    tags: TagTable<C>,
) -> Result<Ruleset<C>, ParseError> {
    let tags = tags.resolve()?;
    Ok(Ruleset::new(rules.into_rules(), tags))
}
