//! Immutable rule snapshot.

use std::collections::{BTreeSet, HashMap};

use bookstore_core::types::{Action, PolicyRule};

/// Rules indexed by subject and resource class.
///
/// Never mutated after construction; the enforcer swaps whole snapshots.
#[derive(Debug, Clone, Default)]
pub struct RuleIndex {
    /// subject → resource → actions.
    by_subject: HashMap<String, HashMap<String, BTreeSet<Action>>>,
    /// Sorted, deduplicated rules (the persisted form).
    rules: Vec<PolicyRule>,
}

impl RuleIndex {
    /// Builds an index, dropping duplicates.
    pub fn from_rules(rules: impl IntoIterator<Item = PolicyRule>) -> Self {
        let rules: BTreeSet<PolicyRule> = rules.into_iter().collect();

        let mut by_subject: HashMap<String, HashMap<String, BTreeSet<Action>>> = HashMap::new();
        for rule in &rules {
            by_subject
                .entry(rule.subject.clone())
                .or_default()
                .entry(rule.resource.clone())
                .or_default()
                .insert(rule.action);
        }

        Self {
            by_subject,
            rules: rules.into_iter().collect(),
        }
    }

    /// Whether a rule grants `action` on `resource` to `subject`.
    pub fn allows(&self, subject: &str, resource: &str, action: Action) -> bool {
        self.by_subject
            .get(subject)
            .and_then(|resources| resources.get(resource))
            .is_some_and(|actions| actions.contains(&action))
    }

    /// Whether the exact rule is present.
    pub fn contains(&self, rule: &PolicyRule) -> bool {
        self.allows(&rule.subject, &rule.resource, rule.action)
    }

    /// A new index with `added` included and `removed` excluded.
    pub fn apply(&self, added: &[PolicyRule], removed: &[PolicyRule]) -> Self {
        Self::from_rules(
            self.rules
                .iter()
                .filter(|r| !removed.contains(r))
                .chain(added.iter())
                .cloned(),
        )
    }

    /// All rules, sorted.
    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    /// Rules for one subject.
    pub fn rules_for<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a PolicyRule> + 'a {
        self.rules.iter().filter(move |r| r.subject == subject)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the index holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows() {
        let index = RuleIndex::from_rules([
            PolicyRule::new("u1", "resource", Action::Read),
            PolicyRule::new("u1", "resource", Action::Read),
            PolicyRule::new("u2", "resource", Action::Write),
        ]);
        assert_eq!(index.len(), 2);
        assert!(index.allows("u1", "resource", Action::Read));
        assert!(!index.allows("u1", "resource", Action::Write));
        assert!(!index.allows("u3", "resource", Action::Read));
        assert!(!index.allows("u1", "other", Action::Read));
    }

    #[test]
    fn test_apply_keeps_base_snapshot() {
        let read = PolicyRule::new("u1", "resource", Action::Read);
        let write = PolicyRule::new("u1", "resource", Action::Write);
        let base = RuleIndex::from_rules([read.clone()]);

        let next = base.apply(std::slice::from_ref(&write), std::slice::from_ref(&read));
        assert!(next.contains(&write));
        assert!(!next.contains(&read));
        assert!(base.contains(&read));
        assert!(!base.contains(&write));
    }

    #[test]
    fn test_rules_for_subject() {
        let index = RuleIndex::from_rules([
            PolicyRule::new("u2", "resource", Action::Read),
            PolicyRule::new("u1", "resource", Action::Write),
            PolicyRule::new("u1", "resource", Action::Read),
        ]);
        let u1: Vec<_> = index.rules_for("u1").map(|r| r.action).collect();
        assert_eq!(u1, vec![Action::Read, Action::Write]);
    }
}
