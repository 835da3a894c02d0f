//! Hierarchy builder: turns flat parent-linked records into a forest.

use std::collections::{HashMap, HashSet};

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::Forest;
use crate::domain::error::{DomainError, DomainResult};

/// A record that may reference a parent record by identifier.
pub trait Hierarchical {
    fn id(&self) -> &str;
    fn parent_id(&self) -> Option<&str>;
}

/// Constructs a forest from records carrying optional parent references.
///
/// Roots are records without a parent, or whose parent id matches no record
/// in the input. A record's children are exactly the records naming it as
/// parent, kept in input order. The builder holds no state, so one instance
/// can serve concurrent builds.
#[derive(Debug, Default, Clone, Copy)]
pub struct HierarchyBuilder;

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the forest. Root order follows the input order.
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build<T: Hierarchical>(&self, records: Vec<T>) -> DomainResult<Forest<T>> {
        let mut positions: HashMap<&str, usize> = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if positions.insert(record.id(), pos).is_some() {
                return Err(DomainError::DuplicateIdentifier(record.id().to_string()));
            }
        }

        // Children by parent position; dangling parents make a root
        let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();
        for (pos, record) in records.iter().enumerate() {
            match record.parent_id().and_then(|p| positions.get(p)) {
                Some(&parent_pos) => children.entry(parent_pos).or_default().push(pos),
                None => roots.push(pos),
            }
        }
        debug!("build: {} roots, {} parents", roots.len(), children.len());

        let mut layout: Vec<(usize, Option<usize>)> = Vec::with_capacity(records.len());
        for &root in &roots {
            walk_tree(root, &children, &mut layout);
        }

        // Every record left unreached from a root sits on, or below, a cycle
        if layout.len() < records.len() {
            let mut reached = vec![false; records.len()];
            for &(pos, _) in &layout {
                reached[pos] = true;
            }
            let unreached = reached.iter().position(|r| !r).unwrap_or_default();
            return Err(DomainError::CyclicHierarchy(
                find_cycle_member(&records, &positions, unreached).to_string(),
            ));
        }

        Ok(assemble(records, layout))
    }
}

/// Depth-first walk from `root`, recording (position, parent position)
/// pairs in the order nodes must be inserted.
///
/// Each position has at most one parent in `children`, so a walk from a
/// root never revisits a node.
fn walk_tree(
    root: usize,
    children: &HashMap<usize, Vec<usize>>,
    layout: &mut Vec<(usize, Option<usize>)>,
) {
    let mut stack = vec![(root, None)];

    while let Some((current, parent)) = stack.pop() {
        layout.push((current, parent));

        if let Some(kids) = children.get(&current) {
            // Reverse so siblings are popped in input order
            for &kid in kids.iter().rev() {
                stack.push((kid, Some(current)));
            }
        }
    }
}

/// Follow parent links from `start` until a record repeats; that record is on the cycle.
fn find_cycle_member<'a, T: Hierarchical>(
    records: &'a [T],
    positions: &HashMap<&str, usize>,
    start: usize,
) -> &'a str {
    let mut seen = HashSet::new();
    let mut current = start;
    while seen.insert(current) {
        match records[current].parent_id().and_then(|p| positions.get(p)) {
            Some(&parent) => current = parent,
            None => break,
        }
    }
    records[current].id()
}

fn assemble<T>(records: Vec<T>, layout: Vec<(usize, Option<usize>)>) -> Forest<T> {
    let mut slots: Vec<Option<T>> = records.into_iter().map(Some).collect();
    let mut indices: HashMap<usize, Index> = HashMap::with_capacity(layout.len());
    let mut forest = Forest::new();

    for (pos, parent) in layout {
        if let Some(data) = slots[pos].take() {
            let parent_idx = parent.and_then(|p| indices.get(&p).copied());
            indices.insert(pos, forest.insert_node(data, parent_idx));
        }
    }

    forest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Rec(&'static str, Option<&'static str>);

    impl Hierarchical for Rec {
        fn id(&self) -> &str {
            self.0
        }
        fn parent_id(&self) -> Option<&str> {
            self.1
        }
    }

    #[test]
    fn given_children_listed_before_parent_when_building_then_still_attached() {
        let records = vec![Rec("c", Some("p")), Rec("p", None)];
        let forest = HierarchyBuilder::new().build(records).unwrap();

        assert_eq!(forest.roots().len(), 1);
        let root = forest.roots()[0];
        assert_eq!(forest.get_node(root).unwrap().data.0, "p");
        assert_eq!(forest.children_data(root)[0].0, "c");
    }

    #[test]
    fn given_self_parent_when_building_then_cycle_error() {
        let records = vec![Rec("root", None), Rec("a", Some("a"))];
        let result = HierarchyBuilder::new().build(records);
        assert_eq!(result.unwrap_err(), DomainError::CyclicHierarchy("a".into()));
    }

    #[test]
    fn given_duplicate_ids_when_building_then_errors() {
        let records = vec![Rec("a", None), Rec("a", None)];
        let result = HierarchyBuilder::new().build(records);
        assert_eq!(
            result.unwrap_err(),
            DomainError::DuplicateIdentifier("a".into())
        );
    }
}
