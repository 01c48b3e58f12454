use std::fmt;
use std::time::Duration;

use super::verdict::SlotVerdict;

/// Detailed evaluation report returned by
/// [`RulesEngine::act_detailed()`](crate::RulesEngine::act_detailed) and
/// [`RulesEngine::explain()`](crate::RulesEngine::explain).
///
/// Lists the winning rule of every filled slot, how many rules had their
/// predicates evaluated, and the wall-clock duration of the evaluation.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    verdicts: Vec<SlotVerdict>,
    examined: usize,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(verdicts: Vec<SlotVerdict>, examined: usize, duration: Duration) -> Self {
        Self {
            verdicts,
            examined,
            duration,
        }
    }

    /// One verdict per filled slot, in ascending slot order.
    #[must_use]
    pub fn verdicts(&self) -> &[SlotVerdict] {
        &self.verdicts
    }

    /// The verdict for `slot`, if a rule filled it.
    #[must_use]
    pub fn verdict(&self, slot: i32) -> Option<&SlotVerdict> {
        self.verdicts.iter().find(|v| v.slot() == slot)
    }

    /// Number of rules whose predicates were evaluated. Rules skipped because
    /// none of their slots were still open are not counted.
    #[must_use]
    pub fn examined(&self) -> usize {
        self.examined
    }

    /// Wall-clock duration of the evaluation.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.verdicts.is_empty() {
            write!(f, "verdicts: none")?;
        } else {
            let joined: Vec<String> = self.verdicts.iter().map(ToString::to_string).collect();
            write!(f, "verdicts: [{}]", joined.join(", "))?;
        }
        write!(f, ", examined: {}", self.examined)?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_accessors() {
        let report = EvaluationReport::new(
            vec![SlotVerdict::new(0, 5, 1), SlotVerdict::new(1, 0, 4)],
            3,
            Duration::from_nanos(500),
        );

        assert_eq!(report.verdicts().len(), 2);
        assert_eq!(report.verdict(1), Some(&SlotVerdict::new(1, 0, 4)));
        assert_eq!(report.verdict(7), None);
        assert_eq!(report.examined(), 3);
        assert_eq!(report.duration(), Duration::from_nanos(500));
    }

    #[test]
    fn report_display_with_verdicts() {
        let report = EvaluationReport::new(
            vec![SlotVerdict::new(0, 5, 1)],
            2,
            Duration::from_nanos(500),
        );
        let s = report.to_string();
        assert!(s.contains("verdicts: [slot 0 <- level 5 (line 1)]"));
        assert!(s.contains("examined: 2"));
    }

    #[test]
    fn report_display_no_verdicts() {
        let report = EvaluationReport::new(vec![], 0, Duration::from_nanos(100));
        assert!(report.to_string().contains("verdicts: none"));
    }
}
