use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::types::{Effect, EvalError, Pred, Rule, Ruleset, SlotVerdict, Tag};

/// Per-evaluation state. Owned by exactly one evaluation and dropped with it,
/// so the ruleset it reads from stays shareable.
struct Scope<'a, C> {
    ctx: &'a C,
    numbers: &'a [f64],
    tags: &'a [Tag<C>],
    tag_cache: Vec<Option<bool>>,
    tag_stack: Vec<usize>,
}

impl<'a, C> Scope<'a, C> {
    fn new(ctx: &'a C, numbers: &'a [f64], tags: &'a [Tag<C>]) -> Self {
        Self {
            ctx,
            numbers,
            tags,
            tag_cache: vec![None; tags.len()],
            tag_stack: Vec::new(),
        }
    }

    fn test(&mut self, pred: &Pred<C>) -> Result<bool, EvalError> {
        match pred {
            Pred::Domain(p) => Ok(p.test(self.ctx)),
            Pred::Not(inner) => self.test(inner).map(|b| !b),
            Pred::Compare(cmp) => Ok(cmp.test(self.numbers)),
            Pred::Tag(id) => self.tag(*id),
        }
    }

    fn all(&mut self, preds: &[Arc<Pred<C>>]) -> Result<bool, EvalError> {
        for pred in preds {
            if !self.test(pred)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn tag(&mut self, id: usize) -> Result<bool, EvalError> {
        if let Some(hit) = self.tag_cache[id] {
            return Ok(hit);
        }
        let tags = self.tags;
        if self.tag_stack.contains(&id) {
            let mut path: Vec<String> = self
                .tag_stack
                .iter()
                .map(|&t| tags[t].name.clone())
                .collect();
            path.push(tags[id].name.clone());
            return Err(EvalError::CircularTag { path });
        }

        self.tag_stack.push(id);
        let mut result = false;
        for group in &tags[id].groups {
            if self.all(group)? {
                result = true;
                break;
            }
        }
        self.tag_stack.pop();

        self.tag_cache[id] = Some(result);
        Ok(result)
    }
}

/// Tracks the first effect claiming each expected slot.
pub(crate) struct EffectBuffer<'r, C> {
    expected: &'r BTreeSet<i32>,
    /// Winning effect and the index of the rule that supplied it, by slot.
    chosen: BTreeMap<i32, (&'r dyn Effect<C>, usize)>,
}

impl<'r, C> EffectBuffer<'r, C> {
    pub(crate) fn new(expected: &'r BTreeSet<i32>) -> Self {
        Self {
            expected,
            chosen: BTreeMap::new(),
        }
    }

    fn is_open(&self, slot: i32) -> bool {
        self.expected.contains(&slot) && !self.chosen.contains_key(&slot)
    }

    /// Whether any of `effects` could still fill a slot.
    pub(crate) fn cares_about(&self, effects: &[Box<dyn Effect<C>>]) -> bool {
        effects.iter().any(|e| self.is_open(e.slot()))
    }

    pub(crate) fn update(&mut self, rule: usize, effects: &'r [Box<dyn Effect<C>>]) {
        for effect in effects {
            let slot = effect.slot();
            if self.expected.contains(&slot) {
                self.chosen.entry(slot).or_insert((&**effect, rule));
            }
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.chosen.len() == self.expected.len()
    }

    pub(crate) fn verdicts(&self, rules: &[Rule<C>]) -> Vec<SlotVerdict> {
        self.chosen
            .iter()
            .map(|(&slot, &(_, idx))| SlotVerdict::new(slot, rules[idx].level, rules[idx].line))
            .collect()
    }

    /// Apply every chosen effect in ascending slot order.
    pub(crate) fn apply(&self, ctx: &mut C) {
        for (effect, _) in self.chosen.values() {
            effect.apply(ctx);
        }
    }
}

/// Outcome of scanning a ruleset for one context.
pub(crate) struct Resolution<'r, C> {
    pub(crate) buffer: EffectBuffer<'r, C>,
    /// Rules whose predicates were evaluated.
    pub(crate) examined: usize,
}

/// Walk the rules in priority order and pick one effect per expected slot.
///
/// Rules that cannot fill an open slot are skipped without evaluating their
/// predicates, and the scan stops as soon as every slot is filled.
pub(crate) fn resolve<'r, C>(
    ruleset: &'r Ruleset<C>,
    slots: &'r BTreeSet<i32>,
    ctx: &C,
    numbers: &[f64],
) -> Result<Resolution<'r, C>, EvalError> {
    let mut scope = Scope::new(ctx, numbers, &ruleset.tags);
    let mut buffer = EffectBuffer::new(slots);
    let mut examined = 0;

    for (idx, rule) in ruleset.rules.iter().enumerate() {
        if !buffer.cares_about(&rule.effects) {
            continue;
        }
        examined += 1;
        if scope.all(&rule.predicates)? {
            buffer.update(idx, &rule.effects);
            if buffer.is_full() {
                break;
            }
        }
    }

    Ok(Resolution { buffer, examined })
}
