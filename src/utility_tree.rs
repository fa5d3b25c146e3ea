use indexmap::map::Entry;
use indexmap::IndexMap;
use sequence::{Item, ItemId, Sequence, Utility};
use std::fmt;

const ROOT_LABEL: &str = "root";

/// One item position of a prefix path shared by the inserted sequences.
///
/// `utility`, `previous_utility` and `remaining_utility` always hold the values
/// computed by the most recent insertion through this node, while
/// `sequence_id` stays with the sequence that created it.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    item: Option<ItemId>,
    label: String,
    sequence_id: usize,
    utility: Utility,
    previous_utility: Utility,
    remaining_utility: Utility,
    children: IndexMap<String, TreeNode>,
}

impl TreeNode {
    fn root() -> Self {
        Self {
            item: None,
            label: ROOT_LABEL.to_string(),
            sequence_id: 0,
            utility: 0,
            previous_utility: 0,
            remaining_utility: 0,
            children: IndexMap::new(),
        }
    }

    fn new(item: ItemId, sequence_id: usize) -> Self {
        Self {
            item: Some(item),
            label: item.to_string(),
            sequence_id,
            utility: 0,
            previous_utility: 0,
            remaining_utility: 0,
            children: IndexMap::new(),
        }
    }

    /// Item id at this position, `None` for the root.
    pub fn item(&self) -> Option<ItemId> {
        self.item
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sequence_id(&self) -> usize {
        self.sequence_id
    }

    pub fn utility(&self) -> Utility {
        self.utility
    }

    pub fn previous_utility(&self) -> Utility {
        self.previous_utility
    }

    pub fn remaining_utility(&self) -> Utility {
        self.remaining_utility
    }

    /// Children in the order they were first attached.
    pub fn children(&self) -> impl Iterator<Item = &TreeNode> {
        self.children.values()
    }

    pub fn child(&self, label: &str) -> Option<&TreeNode> {
        self.children.get(label)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    // Walks `transaction` from `position`, attaching one node per surviving
    // item. Returns the number of nodes created.
    fn insert(
        &mut self,
        transaction: &[Item],
        position: usize,
        sequence_utility: Utility,
        sequence_id: usize,
        min_utility: f64,
    ) -> usize {
        let item = match transaction.get(position) {
            Some(item) => item,
            None => return 0,
        };

        let (utility, previous_utility, remaining_utility) =
            calculate_utilities(item.id, transaction, sequence_utility);

        let pruned = (utility as f64) < min_utility;

        let mut created = 0;
        let child = match self.children.entry(item.id.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                if pruned {
                    debug!(
                        "sequence {}: pruned item {} at depth {} (utility {} < {})",
                        sequence_id,
                        item.id,
                        position + 1,
                        utility,
                        min_utility
                    );
                    return 0;
                }
                trace!("sequence {}: new node {} at depth {}", sequence_id, item.id, position + 1);
                created = 1;
                entry.insert(TreeNode::new(item.id, sequence_id))
            }
        };

        // A shared node takes the statistics of every sequence reaching it,
        // pruned or not
        child.utility = utility;
        child.previous_utility = previous_utility;
        child.remaining_utility = remaining_utility;

        // A pruned node takes the rest of the transaction with it
        if pruned {
            debug!(
                "sequence {}: stopped at shared item {} at depth {} (utility {} < {})",
                sequence_id,
                item.id,
                position + 1,
                utility,
                min_utility
            );
            return 0;
        }

        created + child.insert(
            transaction,
            position + 1,
            sequence_utility,
            sequence_id,
            min_utility,
        )
    }

    fn visit<F: FnMut(&TreeNode, usize)>(&self, depth: usize, f: &mut F) {
        f(self, depth);
        for child in self.children.values() {
            child.visit(depth + 1, f);
        }
    }
}

/// Returns `(UT, PUT, RUT)` for a node holding `id`.
///
/// PUT sums the internal utilities of the full transaction up to the first
/// item carrying `id`, so a repeated id always measures from its first
/// occurrence. Sums saturate at the `i64` bounds.
fn calculate_utilities(
    id: ItemId,
    transaction: &[Item],
    sequence_utility: Utility,
) -> (Utility, Utility, Utility) {
    let previous_utility = transaction
        .iter()
        .take_while(|item| item.id != id)
        .fold(0, |sum: Utility, item| sum.saturating_add(item.internal_utility));

    (
        sequence_utility,
        previous_utility,
        sequence_utility.saturating_sub(previous_utility),
    )
}

/// Shape of a built tree, logged after construction.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TreeStats {
    /// Attached nodes, the root excluded.
    pub nodes: usize,
    pub depth: usize,
    pub leaves: usize,
}

/// Prefix tree over the item orderings of all inserted sequences, annotated
/// with utility statistics and pruned against a minimum utility at insertion
/// time.
///
/// # Example:
/// ```rust
/// # use sequential_utility_rules::{Sequence, UtilityTree};
/// let sequences: Vec<Sequence> = vec![
///     "1[5] 2[3] -1 SUtility:20".parse().unwrap(),
///     "1[2] 4[1] -1 SUtility:8".parse().unwrap(),
/// ];
///
/// let tree = UtilityTree::build(10.0, &sequences);
///
/// let node = tree.root().child("1").unwrap().child("2").unwrap();
/// assert_eq!(node.previous_utility(), 5);
/// assert!(tree.root().child("1").unwrap().child("4").is_none());
/// ```
pub struct UtilityTree {
    root: TreeNode,
    min_utility: f64,
    sequences: usize,
    nodes: usize,
}

impl UtilityTree {
    pub fn new(min_utility: f64) -> Self {
        Self {
            root: TreeNode::root(),
            min_utility,
            sequences: 0,
            nodes: 0,
        }
    }

    /// Inserts every sequence in order, numbering them from 1.
    pub fn build<'a, I>(min_utility: f64, sequences: I) -> Self
    where
        I: IntoIterator<Item = &'a Sequence>,
    {
        let mut tree = Self::new(min_utility);
        tree.extend(sequences);
        info!(
            "utility tree built from {} sequences: {:?}",
            tree.sequences,
            tree.stats()
        );
        tree
    }

    /// Inserts one transaction below the root.
    ///
    /// Statistics of nodes already on the path are overwritten with this
    /// transaction's values. The walk stops at the first item whose utility
    /// falls below the minimum utility: an existing node there still takes
    /// the new values, a missing one is never attached. An empty transaction
    /// is a no-op.
    pub fn insert(&mut self, transaction: &[Item], sequence_utility: Utility, sequence_id: usize) {
        self.nodes += self.root.insert(
            transaction,
            0,
            sequence_utility,
            sequence_id,
            self.min_utility,
        );
    }

    /// Inserts a sequence under the next sequence id.
    pub fn push(&mut self, sequence: &Sequence) {
        self.sequences += 1;
        let sequence_id = self.sequences;
        self.insert(sequence.items(), sequence.utility(), sequence_id);
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    pub fn min_utility(&self) -> f64 {
        self.min_utility
    }

    /// Number of sequences pushed so far.
    pub fn sequences(&self) -> usize {
        self.sequences
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            nodes: self.nodes,
            ..TreeStats::default()
        };
        self.root.visit(0, &mut |node: &TreeNode, depth: usize| {
            if depth > stats.depth {
                stats.depth = depth;
            }
            if depth > 0 && node.is_leaf() {
                stats.leaves += 1;
            }
        });
        stats
    }
}

impl<'a> Extend<&'a Sequence> for UtilityTree {
    fn extend<I: IntoIterator<Item = &'a Sequence>>(&mut self, iter: I) {
        for sequence in iter {
            self.push(sequence);
        }
    }
}

impl fmt::Debug for UtilityTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\nUtility Tree, Min Utility: {}\n\n", self.min_utility)?;

        let mut result = Ok(());
        self.root.visit(0, &mut |node: &TreeNode, depth: usize| {
            if result.is_err() {
                return;
            }
            result = if depth == 0 {
                writeln!(f, "{}", node.label)
            } else {
                writeln!(
                    f,
                    "{:indent$}{} [SID: {}, UT: {}, PUT: {}, RUT: {}]",
                    "",
                    node.label,
                    node.sequence_id,
                    node.utility,
                    node.previous_utility,
                    node.remaining_utility,
                    indent = depth * 2
                )
            };
        });
        result
    }
}
