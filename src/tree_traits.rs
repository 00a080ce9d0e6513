/*
Display helpers for the `tree` command.

termtree::Tree is a foreign type, so the conversion lives in a local trait
implemented for the forest types instead of an inherent impl.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::{Forest, NodeRef};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for NodeRef<'_> {
    #[instrument(level = "trace")]
    fn to_tree_string(&self) -> Tree<String> {
        // Label with the record line, without the trailing newline
        let label = self.line();

        let leaves: Vec<_> = self.children().map(|c| c.to_tree_string()).collect();

        Tree::new(label).with_leaves(leaves)
    }
}

impl TreeNodeConvert for Forest {
    fn to_tree_string(&self) -> Tree<String> {
        if self.is_empty() {
            return Tree::new("Empty forest".to_string());
        }
        let leaves: Vec<_> = self.root_refs().map(|r| r.to_tree_string()).collect();
        Tree::new(format!("{} trees, {} records", self.roots().len(), self.size()))
            .with_leaves(leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineFormat, Record};

    #[test]
    fn test_forest_to_tree_string() {
        let mut forest = Forest::new();
        let root = forest.push_root(Record::new(["0000", "a"]).unwrap());
        forest
            .insert_record(root, Record::new(["0001", "b"]).unwrap())
            .unwrap();

        let rendered = forest.to_tree_string().to_string();

        assert!(rendered.starts_with("1 trees, 2 records"));
        assert!(rendered.contains("|0000|a|"));
        assert!(rendered.contains("└── |0001|b|"));
    }

    #[test]
    fn test_tree_labels_use_forest_delimiter() {
        let format = LineFormat {
            delimiter: ';',
            type_tag_width: 4,
        };
        let mut forest = Forest::with_format(format);
        let root = forest.push_root(Record::new(["0000", "a"]).unwrap());
        forest
            .insert_record(root, Record::new(["0001", "b"]).unwrap())
            .unwrap();

        let rendered = forest.to_tree_string().to_string();

        assert!(rendered.contains(";0000;a;"));
        assert!(rendered.contains("└── ;0001;b;"));
        assert!(!rendered.contains('|'));
    }

    #[test]
    fn test_empty_forest() {
        assert_eq!(
            Forest::new().to_tree_string().to_string().trim(),
            "Empty forest"
        );
    }
}
