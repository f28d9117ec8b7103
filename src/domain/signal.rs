//! Union of rule sets into per-bar decisions.

use crate::domain::frame::Frame;
use crate::domain::rule::Rule;
use crate::domain::rule_eval::evaluate;

/// A compiled, independently toggleable condition set.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub label: String,
    pub enabled: bool,
    pub rule: Rule,
}

/// OR over enabled sets on ready rows; `None` on rows still warming up.
pub fn aggregate(sets: &[RuleSet], frame: &Frame) -> Vec<Option<bool>> {
    let enabled: Vec<&RuleSet> = sets.iter().filter(|s| s.enabled).collect();
    (0..frame.len())
        .map(|i| {
            frame
                .is_ready(i)
                .then(|| enabled.iter().any(|s| evaluate(&s.rule, frame, i)))
        })
        .collect()
}

/// Labels of the enabled sets that fire on row `index`.
pub fn firing<'a>(sets: &'a [RuleSet], frame: &Frame, index: usize) -> Vec<&'a str> {
    sets.iter()
        .filter(|s| s.enabled && evaluate(&s.rule, frame, index))
        .map(|s| s.label.as_str())
        .collect()
}

/// Entry tags: the firing labels joined by commas where `decisions` is
/// `Some(true)`, empty elsewhere.
pub fn tags(sets: &[RuleSet], frame: &Frame, decisions: &[Option<bool>]) -> Vec<String> {
    decisions
        .iter()
        .enumerate()
        .map(|(i, d)| match d {
            Some(true) => firing(sets, frame, i).join(","),
            _ => String::new(),
        })
        .collect()
}
