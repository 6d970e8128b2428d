//! Running an ordered rule list over one word.
//!
//! The runner is a fold: rule *i*'s output becomes rule *i + 1*'s input, in
//! list order. There is no backtracking and no retrying; rules are ordered
//! deliberately so later rules can clean up the artifacts of earlier ones.
//! Rules that do not participate in the requested pass are skipped.
//!
//! A compiled rule set is read-only after construction, so one set may be
//! run concurrently over many different words.

use super::applier::apply_orientation;
use super::compiler::CompiledRule;
use crate::Pass;

/// Fold `rules` over `input` for the given pass.
pub(crate) fn apply_rule_set(rules: &[CompiledRule], input: &str, pass: Pass) -> String {
    let debug = crate::debug_enabled();
    let mut word = input.to_string();

    for rule in rules {
        let Some(orientation) = rule.orientation_for(pass) else {
            continue;
        };
        let next = apply_orientation(orientation, rule.context(), rule.anticontext(), &word);
        if debug && next != word {
            eprintln!("[rule:applied] id={:?} {:?} -> {:?}", rule.id(), word, next);
        }
        word = next;
    }

    word
}

/// Move the element at `from` to position `to`, returning the new ordering.
///
/// Pure: the input list is consumed and a reordered list returned, so a
/// caller always holds a fully-formed snapshot. Out-of-range indexes are
/// clamped; an out-of-range `from` returns the list unchanged.
pub fn reorder<T>(mut list: Vec<T>, from: usize, to: usize) -> Vec<T> {
    if from >= list.len() || from == to {
        return list;
    }
    let item = list.remove(from);
    let to = to.min(list.len());
    list.insert(to, item);
    list
}

/// An ordered, id-addressed list of compiled rules.
///
/// Order is semantically meaningful and changes only through [`RuleSet::reorder`];
/// ids address rules for edit/delete, never for matching.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        RuleSet::default()
    }

    /// Append an accepted rule, or replace the rule with the same id in
    /// place (an edit keeps its position).
    pub fn upsert(&mut self, rule: CompiledRule) {
        match self.rules.iter_mut().find(|r| r.id() == rule.id()) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn get(&self, id: &str) -> Option<&CompiledRule> {
        self.rules.iter().find(|r| r.id() == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<CompiledRule> {
        let index = self.rules.iter().position(|r| r.id() == id)?;
        Some(self.rules.remove(index))
    }

    /// Reorder by index, returning the new set and leaving `self` untouched.
    pub fn reorder(&self, from: usize, to: usize) -> RuleSet {
        RuleSet { rules: reorder(self.rules.clone(), from, to) }
    }

    /// The rules in application order.
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run the whole set over `input` for `pass`.
    pub fn run(&self, input: &str, pass: Pass) -> String {
        apply_rule_set(&self.rules, input, pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compiler::compile;
    use crate::{Direction, GroupTable, RawRuleInput, RuleKind};

    fn rule(id: &str, seek: &str, replace: &str) -> CompiledRule {
        let input = RawRuleInput::new(id, RuleKind::SoundChange, seek, replace);
        compile(&input, &GroupTable::new()).unwrap()
    }

    fn transform(id: &str, seek: &str, replace: &str, direction: Direction) -> CompiledRule {
        let input = RawRuleInput::new(id, RuleKind::Transform, seek, replace)
            .with_direction(direction);
        compile(&input, &GroupTable::new()).unwrap()
    }

    #[test]
    fn order_is_semantically_meaningful() {
        let a = rule("a", "a", "b");
        let b = rule("b", "b", "c");

        assert_eq!(apply_rule_set(&[a.clone(), b.clone()], "a", Pass::Forward), "c");
        assert_eq!(apply_rule_set(&[b, a], "a", Pass::Forward), "b");
    }

    #[test]
    fn later_rules_clean_up_earlier_output() {
        let geminate = rule("g", "s", "ss");
        let degeminate = rule("d", "ss+", "s");
        assert_eq!(apply_rule_set(&[geminate, degeminate], "asa", Pass::Forward), "asa");
    }

    #[test]
    fn pass_filters_by_direction() {
        let rules = [
            transform("in", "a", "1", Direction::In),
            transform("out", "b", "2", Direction::Out),
            transform("both", "c", "3", Direction::Both),
        ];

        assert_eq!(apply_rule_set(&rules, "abc", Pass::Forward), "1b3");
        // Reverse: the out rule applies swapped (its replace "2" becomes the
        // pattern, its seek "b" the template).
        assert_eq!(apply_rule_set(&rules, "a2c", Pass::Reverse), "ab3");
    }

    #[test]
    fn double_applies_on_both_passes() {
        let rules = [transform("d", "k", "q", Direction::Double)];
        assert_eq!(apply_rule_set(&rules, "ka", Pass::Forward), "qa");
        assert_eq!(apply_rule_set(&rules, "ka", Pass::Reverse), "qa");
    }

    #[test]
    fn empty_rule_list_is_identity() {
        assert_eq!(apply_rule_set(&[], "word", Pass::Forward), "word");
    }

    #[test]
    fn reorder_moves_and_clamps() {
        let list = vec!["a", "b", "c", "d"];
        assert_eq!(reorder(list.clone(), 0, 2), vec!["b", "c", "a", "d"]);
        assert_eq!(reorder(list.clone(), 3, 0), vec!["d", "a", "b", "c"]);
        assert_eq!(reorder(list.clone(), 1, 99), vec!["a", "c", "d", "b"]);
        assert_eq!(reorder(list.clone(), 99, 0), list);
    }

    #[test]
    fn rule_set_addresses_rules_by_id() {
        let mut set = RuleSet::new();
        set.upsert(rule("first", "a", "b"));
        set.upsert(rule("second", "b", "c"));
        assert_eq!(set.run("a", Pass::Forward), "c");

        // An edit keeps its position.
        set.upsert(rule("first", "a", "x"));
        assert_eq!(set.rules()[0].id(), "first");
        assert_eq!(set.run("a", Pass::Forward), "x");

        set.remove("first").unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.run("a", Pass::Forward), "a");
    }

    #[test]
    fn rule_set_reorder_is_a_snapshot() {
        let mut set = RuleSet::new();
        set.upsert(rule("a", "a", "b"));
        set.upsert(rule("b", "b", "c"));

        let swapped = set.reorder(0, 1);
        assert_eq!(set.run("a", Pass::Forward), "c");
        assert_eq!(swapped.run("a", Pass::Forward), "b");
    }

    #[test]
    fn compiled_set_is_shareable_across_threads() {
        let set = RuleSet {
            rules: vec![rule("a", "a", "b"), rule("b", "b", "c")],
        };

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| set.run("a", Pass::Forward)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), "c");
            }
        });
    }
}
