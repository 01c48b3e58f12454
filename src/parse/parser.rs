use std::collections::HashMap;
use std::sync::Arc;

use crate::compile::{compile, RulesAggregator, TagTable};
use crate::types::{Conjunction, Domain, Pred, Rule, Ruleset};

use super::error::{ParseError, ParseErrorKind};
use super::lexer::{is_comment, is_tag_name, level, tokenize};

/// State of one load. Dropped once the text is compiled into a [`Ruleset`].
pub(crate) struct Parser<'d, C> {
    pub(super) domain: &'d Domain<C>,
    /// Predicates by literal source text.
    pub(super) cache: HashMap<String, Arc<Pred<C>>>,
    pub(super) tags: TagTable<C>,
    rules: RulesAggregator<C>,
}

impl<'d, C> Parser<'d, C> {
    pub(crate) fn new(domain: &'d Domain<C>) -> Self {
        Self {
            domain,
            cache: HashMap::new(),
            tags: TagTable::new(),
            rules: RulesAggregator::new(),
        }
    }

    /// Parse the whole text. The first error aborts the load.
    pub(crate) fn parse(mut self, text: &str) -> Result<Ruleset<C>, ParseError> {
        let mut lines = text.lines().enumerate();
        while let Some((index, raw)) = lines.next() {
            self.line(index + 1, raw, &mut lines)?;
        }
        compile(self.rules, self.tags)
    }

    fn line<'a, I>(&mut self, line: usize, raw: &'a str, rest: &mut I) -> Result<(), ParseError>
    where
        I: Iterator<Item = (usize, &'a str)>,
    {
        let tokens = tokenize(raw);
        let Some(&first) = tokens.first() else {
            return Ok(());
        };
        if is_comment(first) {
            return Ok(());
        }

        if let Some(level) = level(first) {
            let rule = self
                .rule(level, line, &tokens[1..])
                .map_err(|kind| ParseError::new(line, kind))?;
            self.rules.add(rule);
            Ok(())
        } else if is_tag_name(first) {
            self.tag_block(first, line, &tokens[1..], rest)
        } else {
            Err(ParseError::new(
                line,
                ParseErrorKind::IllegalTagName(first.to_owned()),
            ))
        }
    }

    /// `<level> <predicate>... -> <effect>...`, with the level already read.
    fn rule(&mut self, level: i32, line: usize, tokens: &[&str]) -> Result<Rule<C>, ParseErrorKind> {
        let mut tokens = tokens.iter().copied();
        let mut predicates = Vec::new();
        loop {
            match tokens.next() {
                None => return Err(ParseErrorKind::NoArrow),
                Some("->") => break,
                Some(source) => predicates.push(self.predicate(source, line)?),
            }
        }

        let mut effects = Vec::new();
        for source in tokens {
            effects.extend((self.domain.effects)(source).map_err(ParseErrorKind::Effect)?);
        }
        if effects.is_empty() {
            return Err(ParseErrorKind::NoEffects);
        }

        Ok(Rule {
            level,
            line,
            predicates,
            effects,
        })
    }

    /// `<name> [ ... ]`, possibly spanning several lines. `tokens` starts
    /// after the name; continuation lines are pulled from `lines`.
    fn tag_block<'a, I>(
        &mut self,
        name: &str,
        start: usize,
        tokens: &[&'a str],
        lines: &mut I,
    ) -> Result<(), ParseError>
    where
        I: Iterator<Item = (usize, &'a str)>,
    {
        if tokens.first() != Some(&"[") {
            return Err(ParseError::new(start, ParseErrorKind::ExpectedBracket));
        }
        let id = self.tags.intern(name);
        if self.tags.is_defined(id) {
            return Err(ParseError::new(
                start,
                ParseErrorKind::DuplicateTag(name.to_owned()),
            ));
        }

        let mut line = start;
        let mut pending = tokens[1..].to_vec().into_iter();
        let mut groups: Vec<Conjunction<C>> = vec![Vec::new()];

        loop {
            let Some(token) = pending.next() else {
                let Some((index, raw)) = lines.next() else {
                    return Err(ParseError::new(
                        line,
                        ParseErrorKind::UnclosedTag(name.to_owned()),
                    ));
                };
                line = index + 1;
                let next = tokenize(raw);
                if !next.first().is_some_and(|first| is_comment(first)) {
                    pending = next.into_iter();
                }
                // A line break separates groups just like a comma.
                start_group(&mut groups);
                continue;
            };

            match token {
                "," => start_group(&mut groups),
                "]" => {
                    if !pending.as_slice().is_empty() {
                        return Err(ParseError::new(line, ParseErrorKind::MisplacedBracket));
                    }
                    if groups.last().is_some_and(Vec::is_empty) {
                        groups.pop();
                    }
                    if groups.is_empty() {
                        return Err(ParseError::new(
                            line,
                            ParseErrorKind::EmptyTag(name.to_owned()),
                        ));
                    }
                    self.tags.define(id, groups);
                    return Ok(());
                }
                source => {
                    let predicate = self
                        .predicate(source, line)
                        .map_err(|err| ParseError::new(line, err))?;
                    if let Some(group) = groups.last_mut() {
                        group.push(predicate);
                    }
                }
            }
        }
    }
}

fn start_group<C>(groups: &mut Vec<Conjunction<C>>) {
    if groups.last().map_or(true, |group| !group.is_empty()) {
        groups.push(Vec::new());
    }
}
