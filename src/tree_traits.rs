//! Conversion of forests into printable `termtree` trees.

use std::fmt::Display;

use generational_arena::Index;
use termtree::Tree;

use crate::domain::Forest;

pub trait ForestConvert {
    /// One printable tree per root, in root order.
    fn to_tree_strings(&self) -> Vec<Tree<String>>;
}

impl<T: Display> ForestConvert for Forest<T> {
    fn to_tree_strings(&self) -> Vec<Tree<String>> {
        fn build_tree<T: Display>(forest: &Forest<T>, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = forest.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = forest.get_node(child_idx) {
                        let mut child_tree = Tree::new(child.data.to_string());
                        build_tree(forest, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        self.roots()
            .iter()
            .filter_map(|&root_idx| {
                let root = self.get_node(root_idx)?;
                let mut tree = Tree::new(root.data.to_string());
                build_tree(self, root_idx, &mut tree);
                Some(tree)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_forest_when_converted_then_renders_branches() {
        let mut forest = Forest::new();
        let root = forest.insert_node("Revenue", None);
        forest.insert_node("Sales", Some(root));
        forest.insert_node("Marketing", Some(root));
        forest.insert_node("Hiring", None);

        let trees = forest.to_tree_strings();

        assert_eq!(trees.len(), 2);
        let rendered = trees[0].to_string();
        assert!(rendered.starts_with("Revenue\n"));
        assert!(rendered.contains("├── Sales"));
        assert!(rendered.contains("└── Marketing"));
        assert_eq!(trees[1].to_string(), "Hiring\n");
    }
}
