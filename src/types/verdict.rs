use std::fmt;

/// The rule that won a slot during one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SlotVerdict {
    slot: i32,
    level: i32,
    line: usize,
}

impl fmt::Display for SlotVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slot {} <- level {} (line {})",
            self.slot, self.level, self.line
        )
    }
}

impl SlotVerdict {
    pub fn new(slot: i32, level: i32, line: usize) -> Self {
        Self { slot, level, line }
    }

    #[must_use]
    pub fn slot(&self) -> i32 {
        self.slot
    }

    /// Priority level of the winning rule.
    #[must_use]
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Source line of the winning rule.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_verdict() {
        let v = SlotVerdict::new(0, 5, 12);
        assert_eq!(v.slot(), 0);
        assert_eq!(v.level(), 5);
        assert_eq!(v.line(), 12);
    }

    #[test]
    fn verdict_display() {
        let v = SlotVerdict::new(2, -1, 3);
        assert_eq!(v.to_string(), "slot 2 <- level -1 (line 3)");
    }

    #[test]
    fn verdict_inequality() {
        assert_ne!(SlotVerdict::new(0, 5, 1), SlotVerdict::new(0, 5, 2));
    }
}
