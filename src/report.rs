//! Per-run diagnostics.

/// What happened to one source during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// The source returned `found` proxies; `alive` is set when testing was enabled.
    Fetched { found: usize, alive: Option<usize> },
    /// The source failed; it contributed nothing.
    Failed(String),
    /// The source exceeded the configured deadline; it contributed nothing.
    TimedOut,
}

impl SourceOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SourceOutcome::Fetched { .. })
    }
}

/// Outcome of every source queried by a pool, in dispatch order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    outcomes: Vec<(String, SourceOutcome)>,
}

impl RunReport {
    pub(crate) fn record(&mut self, name: String, outcome: SourceOutcome) {
        self.outcomes.push((name, outcome));
    }

    pub fn outcomes(&self) -> &[(String, SourceOutcome)] {
        &self.outcomes
    }

    /// Outcome of the first dispatch of `name`.
    pub fn outcome(&self, name: &str) -> Option<&SourceOutcome> {
        self.outcomes
            .iter()
            .find(|(source, _)| source == name)
            .map(|(_, outcome)| outcome)
    }

    /// Names of sources that failed or timed out.
    pub fn failed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_success())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Proxies returned across all sources, before deduplication.
    pub fn total_found(&self) -> usize {
        self.outcomes
            .iter()
            .map(|(_, outcome)| match outcome {
                SourceOutcome::Fetched { found, .. } => *found,
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarises_outcomes() {
        let mut report = RunReport::default();
        report.record("a".into(), SourceOutcome::Fetched { found: 3, alive: None });
        report.record("b".into(), SourceOutcome::Failed("boom".into()));
        report.record("c".into(), SourceOutcome::TimedOut);
        report.record("d".into(), SourceOutcome::Fetched { found: 2, alive: Some(1) });

        assert_eq!(report.total_found(), 5);
        assert_eq!(report.failed(), vec!["b", "c"]);
        assert_eq!(report.outcome("c"), Some(&SourceOutcome::TimedOut));
        assert!(report.outcome("e").is_none());
    }
}
