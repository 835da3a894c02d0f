use std::cmp::Ordering;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

/// Tree node in the arena-based forest.
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    /// Record wrapped by this node
    pub data: T,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in display order
    pub children: Vec<Index>,
    /// Distance from the root, roots have depth 0
    pub depth: usize,
}

/// Arena-based forest: one tree per root, all nodes in a single arena.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Every node is owned by the arena and referenced by exactly one parent
/// (or by the root list), so the structure is a tree and never a DAG.
#[derive(Debug, Clone)]
pub struct Forest<T> {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode<T>>,
    /// Root indices in display order
    roots: Vec<Index>,
}

impl<T> Default for Forest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Forest<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    /// Insert a node below `parent`, or as a new root when `parent` is None.
    ///
    /// A parent index that is no longer in the arena also yields a root.
    pub fn insert_node(&mut self, data: T, parent: Option<Index>) -> Index {
        let parent_depth = parent.and_then(|idx| self.arena.get(idx)).map(|p| p.depth);
        let node = TreeNode {
            data,
            parent: parent_depth.and(parent),
            children: Vec::new(),
            depth: parent_depth.map_or(0, |d| d + 1),
        };
        let node_idx = self.arena.insert(node);

        match parent.and_then(|idx| self.arena.get_mut(idx)) {
            Some(parent_node) => parent_node.children.push(node_idx),
            None => self.roots.push(node_idx),
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode<T>> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode<T>> {
        self.arena.get_mut(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    /// Data of the root nodes, in order.
    pub fn root_data(&self) -> Vec<&T> {
        self.roots
            .iter()
            .filter_map(|&idx| self.arena.get(idx))
            .map(|node| &node.data)
            .collect()
    }

    /// Data of the direct children of `idx`, in order.
    pub fn children_data(&self, idx: Index) -> Vec<&T> {
        self.arena
            .get(idx)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&child| self.arena.get(child))
                    .map(|child| &child.data)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal over all trees, roots left to right.
    pub fn iter(&self) -> TreeIterator<'_, T> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_, T> {
        PostOrderIterator::new(self)
    }

    /// Number of levels of the deepest tree, 0 for an empty forest.
    pub fn depth(&self) -> usize {
        self.iter()
            .map(|(_, node)| node.depth + 1)
            .max()
            .unwrap_or(0)
    }

    /// Collects the data of all leaf nodes (nodes with no children), in pre-order.
    pub fn leaf_nodes(&self) -> Vec<&T> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| &node.data)
            .collect()
    }

    /// Remove every node whose data fails `keep`, together with its subtree.
    #[instrument(level = "trace", skip_all)]
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut pruned = Vec::new();
        let mut stack: Vec<Index> = self.roots.iter().rev().copied().collect();

        while let Some(idx) = stack.pop() {
            if let Some(node) = self.arena.get(idx) {
                if keep(&node.data) {
                    stack.extend(node.children.iter().rev().copied());
                } else {
                    pruned.push((idx, node.parent));
                }
            }
        }

        for (idx, parent) in pruned {
            match parent.and_then(|p| self.arena.get_mut(p)) {
                Some(parent_node) => parent_node.children.retain(|&c| c != idx),
                None => self.roots.retain(|&r| r != idx),
            }
            self.remove_subtree(idx);
        }
    }

    fn remove_subtree(&mut self, idx: Index) {
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                stack.extend(node.children);
            }
        }
    }

    /// Stable sort of the root list and of every child list.
    ///
    /// The comparator need not be a total order. The first comparator error
    /// aborts the sort and is returned; sibling lists may then be partially sorted.
    #[instrument(level = "trace", skip_all)]
    pub fn try_sort_siblings_by<E, F>(&mut self, mut cmp: F) -> Result<(), E>
    where
        F: FnMut(&T, &T) -> Result<Ordering, E>,
    {
        sort_siblings(&self.arena, &mut self.roots, &mut cmp)?;

        let parents: Vec<Index> = self
            .iter()
            .filter(|(_, node)| node.children.len() > 1)
            .map(|(idx, _)| idx)
            .collect();

        for idx in parents {
            let mut children = match self.arena.get_mut(idx) {
                Some(node) => std::mem::take(&mut node.children),
                None => continue,
            };
            let sorted = sort_siblings(&self.arena, &mut children, &mut cmp);
            if let Some(node) = self.arena.get_mut(idx) {
                node.children = children;
            }
            sorted?;
        }

        Ok(())
    }
}

/// Insertion sort: stable, and well defined for comparators that are not
/// total orders.
fn sort_siblings<T, E, F>(
    arena: &Arena<TreeNode<T>>,
    siblings: &mut [Index],
    cmp: &mut F,
) -> Result<(), E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    for i in 1..siblings.len() {
        let mut j = i;
        while j > 0 {
            let (Some(prev), Some(current)) = (arena.get(siblings[j - 1]), arena.get(siblings[j]))
            else {
                break;
            };
            if cmp(&prev.data, &current.data)? != Ordering::Greater {
                break;
            }
            siblings.swap(j - 1, j);
            j -= 1;
        }
    }
    Ok(())
}

impl<T: fmt::Display> fmt::Display for Forest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, node) in self.iter() {
            writeln!(f, "{}{}", "  ".repeat(node.depth), node.data)?;
        }
        Ok(())
    }
}

pub struct TreeIterator<'a, T> {
    forest: &'a Forest<T>,
    stack: Vec<Index>,
}

impl<'a, T> TreeIterator<'a, T> {
    fn new(forest: &'a Forest<T>) -> Self {
        // Reverse so the first root is popped first
        let stack = forest.roots.iter().rev().copied().collect();
        Self { forest, stack }
    }
}

impl<'a, T> Iterator for TreeIterator<'a, T> {
    type Item = (Index, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a, T> {
    forest: &'a Forest<T>,
    stack: Vec<(Index, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(forest: &'a Forest<T>) -> Self {
        let stack = forest.roots.iter().rev().map(|&idx| (idx, false)).collect();
        Self { forest, stack }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (Index, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
