use std::fmt;

use super::effect::Effect;
use super::predicate::Conjunction;

/// One parsed rule line: `<level> <predicate>... -> <effect>...`.
///
/// The predicates form a conjunction. Effects keep their declaration order,
/// which decides the winner when one rule carries two effects for the same
/// slot.
pub(crate) struct Rule<C> {
    pub(crate) level: i32,
    /// 1-based line of the declaration.
    pub(crate) line: usize,
    pub(crate) predicates: Conjunction<C>,
    pub(crate) effects: Vec<Box<dyn Effect<C>>>,
}

impl<C> fmt::Debug for Rule<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots: Vec<i32> = self.effects.iter().map(|e| e.slot()).collect();
        f.debug_struct("Rule")
            .field("level", &self.level)
            .field("line", &self.line)
            .field("predicates", &self.predicates)
            .field("slots", &slots)
            .finish()
    }
}
