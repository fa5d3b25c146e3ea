use sequence::Utility;
use std::convert::Infallible;
use std::fmt;
use utility_tree::{TreeNode, UtilityTree};

/// A rule grown from the utility tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Rule {
    /// `antecedent -> consequent` for one parent to child edge of a branching
    /// node, carrying the child's statistics.
    Edge {
        antecedent: String,
        consequent: String,
        sequence_id: usize,
        utility: Utility,
        previous_utility: Utility,
        remaining_utility: Utility,
    },
    /// A whole chain below a node with exactly one child.
    SinglePath {
        path: String,
        cumulative_utility: Utility,
    },
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Rule::Edge {
                ref antecedent,
                ref consequent,
                sequence_id,
                utility,
                previous_utility,
                remaining_utility,
            } => write!(
                f,
                "Rule: {} -> {} [SID: {}, Utility: {}, PUT: {}, RUT: {}]",
                antecedent, consequent, sequence_id, utility, previous_utility, remaining_utility
            ),
            Rule::SinglePath {
                ref path,
                cumulative_utility,
            } => write!(
                f,
                "Single Path Rule: {} [Cumulative Utility: {}]",
                path, cumulative_utility
            ),
        }
    }
}

/// Destination for rules as they are generated.
pub trait RuleSink {
    type Error;

    fn accept(&mut self, rule: Rule) -> Result<(), Self::Error>;
}

impl RuleSink for Vec<Rule> {
    type Error = Infallible;

    fn accept(&mut self, rule: Rule) -> Result<(), Infallible> {
        self.push(rule);
        Ok(())
    }
}

/// Depth-first, pre-order rule growth below `node`.
///
/// A node with a single child collapses the chain under it into one
/// `SinglePath` rule, always following the first child, and stops there. The
/// chain's utilities are summed without a threshold check, saturating at the
/// `i64` bounds.
/// Otherwise every child meeting `min_utility` yields an `Edge` rule and is
/// grown in turn with its label appended to the antecedent.
pub fn generate_rules<S: RuleSink + ?Sized>(
    node: Option<&TreeNode>,
    antecedent: &str,
    min_utility: f64,
    sink: &mut S,
) -> Result<(), S::Error> {
    let node = match node {
        Some(node) => node,
        None => return Ok(()),
    };

    if node.child_count() == 1 {
        let mut path = antecedent.to_string();
        let mut cumulative_utility = 0;

        let mut current = node.children().next();
        while let Some(chain_node) = current {
            path.push_str(" -> ");
            path.push_str(chain_node.label());
            cumulative_utility = chain_node.utility().saturating_add(cumulative_utility);
            current = chain_node.children().next();
        }

        return sink.accept(Rule::SinglePath {
            path,
            cumulative_utility,
        });
    }

    for child in node.children() {
        if (child.utility() as f64) < min_utility {
            continue;
        }

        sink.accept(Rule::Edge {
            antecedent: antecedent.to_string(),
            consequent: child.label().to_string(),
            sequence_id: child.sequence_id(),
            utility: child.utility(),
            previous_utility: child.previous_utility(),
            remaining_utility: child.remaining_utility(),
        })?;

        let grown = format!("{}{}", antecedent, child.label());
        generate_rules(Some(child), &grown, min_utility, sink)?;
    }

    Ok(())
}

impl UtilityTree {
    /// Grows rules from the root with an empty antecedent.
    pub fn grow<S: RuleSink + ?Sized>(&self, sink: &mut S) -> Result<(), S::Error> {
        generate_rules(Some(self.root()), "", self.min_utility(), sink)
    }

    /// Collects every rule into memory.
    pub fn rules(&self) -> Vec<Rule> {
        let mut rules = Vec::new();
        match self.grow(&mut rules) {
            Ok(()) => rules,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{generate_rules, Rule};
    use sequence::Sequence;
    use utility_tree::UtilityTree;

    fn tree(min_utility: f64, lines: &[&str]) -> UtilityTree {
        let sequences: Vec<Sequence> = lines.iter().map(|line| line.parse().unwrap()).collect();
        UtilityTree::build(min_utility, &sequences)
    }

    fn lines(rules: &[Rule]) -> Vec<String> {
        rules.iter().map(|rule| rule.to_string()).collect()
    }

    #[test]
    fn test_chain_collapses_into_single_path() {
        let tree = tree(10.0, &["1[5] 2[3] -1 SUtility:20"]);

        assert_eq!(
            tree.rules(),
            vec![Rule::SinglePath {
                path: " -> 1 -> 2".to_string(),
                cumulative_utility: 40,
            }]
        );
        assert_eq!(
            lines(&tree.rules()),
            vec!["Single Path Rule:  -> 1 -> 2 [Cumulative Utility: 40]"]
        );
    }

    #[test]
    fn test_pruned_tree_has_no_rules() {
        let tree = tree(25.0, &["1[5] 2[3] -1 SUtility:20"]);

        assert!(tree.rules().is_empty());
    }

    #[test]
    fn test_branching_root_emits_edges() {
        let tree = tree(
            10.0,
            &[
                "1[5] 2[3] -1 SUtility:20",
                "3[4] 4[2] 5[1] -1 SUtility:15",
                "3[1] 6[2] -1 SUtility:12",
            ],
        );

        assert_eq!(
            lines(&tree.rules()),
            vec![
                "Rule:  -> 1 [SID: 1, Utility: 20, PUT: 0, RUT: 20]",
                "Single Path Rule: 1 -> 2 [Cumulative Utility: 20]",
                "Rule:  -> 3 [SID: 2, Utility: 12, PUT: 0, RUT: 12]",
                "Rule: 3 -> 4 [SID: 2, Utility: 15, PUT: 4, RUT: 11]",
                "Single Path Rule: 34 -> 5 [Cumulative Utility: 15]",
                "Rule: 3 -> 6 [SID: 3, Utility: 12, PUT: 1, RUT: 11]",
            ]
        );
    }

    #[test]
    fn test_single_path_follows_first_child() {
        let tree = tree(
            0.0,
            &["1[1] 2[1] -1 SUtility:5", "1[1] 3[1] 4[1] -1 SUtility:7"],
        );

        assert_eq!(
            lines(&tree.rules()),
            vec!["Single Path Rule:  -> 1 -> 2 [Cumulative Utility: 12]"]
        );
    }

    #[test]
    fn test_revisited_low_utility_node_is_skipped_when_branching() {
        let tree = tree(
            10.0,
            &[
                "1[1] -1 SUtility:20",
                "2[1] -1 SUtility:30",
                "1[4] -1 SUtility:3",
            ],
        );

        assert_eq!(tree.root().child("1").unwrap().utility(), 3);
        assert_eq!(
            lines(&tree.rules()),
            vec!["Rule:  -> 2 [SID: 2, Utility: 30, PUT: 0, RUT: 30]"]
        );
    }

    #[test]
    fn test_revisited_low_utility_node_stays_in_single_path() {
        let tree = tree(10.0, &["1[5] -1 SUtility:30", "1[2] -1 SUtility:5"]);

        assert_eq!(
            lines(&tree.rules()),
            vec!["Single Path Rule:  -> 1 [Cumulative Utility: 5]"]
        );
    }

    #[test]
    fn test_single_path_utility_saturates() {
        let tree = tree(0.0, &["1[1] 2[1] -1 SUtility:9223372036854775807"]);

        assert_eq!(
            tree.rules(),
            vec![Rule::SinglePath {
                path: " -> 1 -> 2".to_string(),
                cumulative_utility: i64::max_value(),
            }]
        );
    }

    #[test]
    fn test_leaf_and_missing_node_emit_nothing() {
        let tree = tree(0.0, &["1[1] 2[1] -1 SUtility:5", "3[1] -1 SUtility:5"]);
        let leaf = tree.root().child("3").unwrap();
        let mut rules: Vec<Rule> = Vec::new();

        generate_rules(Some(leaf), "3", 0.0, &mut rules).unwrap();
        generate_rules(None, "", 0.0, &mut rules).unwrap();

        assert!(rules.is_empty());
    }

    #[test]
    fn test_generation_rechecks_threshold() {
        let tree = tree(0.0, &["1[1] -1 SUtility:5", "2[1] -1 SUtility:50"]);
        let mut rules: Vec<Rule> = Vec::new();

        generate_rules(Some(tree.root()), "", 10.0, &mut rules).unwrap();

        assert_eq!(
            lines(&rules),
            vec!["Rule:  -> 2 [SID: 2, Utility: 50, PUT: 0, RUT: 50]"]
        );
    }
}
