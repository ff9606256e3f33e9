//! # Category Tree Builder
//!
//! Turns the flat category list, as stored, into the nested forest the
//! hierarchy endpoint serves.
//!
//! ## Contract
//! - A node is a root iff `parent_id` is None.
//! - Children keep the input order of the flat list (stable, no sorting),
//!   and so do the roots.
//! - A `parent_id` pointing at an id that is not in the input is dropped
//!   silently: the node is neither attached nor promoted to root. This is a
//!   deliberate fail-silent policy, not an error.
//! - No cycle detection. Cycles cannot be created through the supported
//!   operations (a parent must already exist when a child is created, and
//!   categories are never re-parented), so the builder trusts its input.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Category;

// =============================================================================
// Tree Node
// =============================================================================

/// A category with its children nested under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Direct children, in flat-list input order.
    pub children: Vec<CategoryNode>,
}

impl From<Category> for CategoryNode {
    fn from(category: Category) -> Self {
        CategoryNode {
            id: category.id,
            name: category.name,
            parent_id: category.parent_id,
            created_at: category.created_at,
            children: Vec::new(),
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds the category forest from a flat list.
///
/// Two passes over the input: the first registers every id, the second
/// groups each category under its parent (or into the root list). Nodes are
/// then assembled recursively, consuming the grouping map so each category
/// lands in exactly one place.
pub fn build_tree(categories: Vec<Category>) -> Vec<CategoryNode> {
    let known_ids: HashSet<String> = categories.iter().map(|c| c.id.clone()).collect();

    let mut roots: Vec<Category> = Vec::new();
    let mut by_parent: HashMap<String, Vec<Category>> = HashMap::new();

    for category in categories {
        match &category.parent_id {
            None => roots.push(category),
            Some(parent) if known_ids.contains(parent) => {
                by_parent.entry(parent.clone()).or_default().push(category);
            }
            // Dangling parent reference: dropped, along with anything
            // grouped under this node
            Some(_) => {}
        }
    }

    roots
        .into_iter()
        .map(|root| attach_children(root, &mut by_parent))
        .collect()
}

fn attach_children(
    category: Category,
    by_parent: &mut HashMap<String, Vec<Category>>,
) -> CategoryNode {
    let children = by_parent.remove(&category.id).unwrap_or_default();
    let mut node = CategoryNode::from(category);
    node.children = children
        .into_iter()
        .map(|child| attach_children(child, by_parent))
        .collect();
    node
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str, parent_id: Option<&str>) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            parent_id: parent_id.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    fn count_nodes(forest: &[CategoryNode]) -> usize {
        forest
            .iter()
            .map(|node| 1 + count_nodes(&node.children))
            .sum()
    }

    fn assert_children_link_back(node: &CategoryNode) {
        for child in &node.children {
            assert_eq!(child.parent_id.as_deref(), Some(node.id.as_str()));
            assert_children_link_back(child);
        }
    }

    #[test]
    fn test_empty_input_gives_empty_forest() {
        assert!(build_tree(Vec::new()).is_empty());
    }

    #[test]
    fn test_nests_a_b_c_chain() {
        let forest = build_tree(vec![
            category("a", "A", None),
            category("b", "B", Some("a")),
            category("c", "C", Some("b")),
        ]);

        assert_eq!(forest.len(), 1);
        let a = &forest[0];
        assert_eq!(a.name, "A");
        assert_eq!(a.children.len(), 1);
        let b = &a.children[0];
        assert_eq!(b.name, "B");
        assert_eq!(b.children.len(), 1);
        let c = &b.children[0];
        assert_eq!(c.name, "C");
        assert!(c.children.is_empty());
    }

    #[test]
    fn test_node_count_preserved_without_dangling_refs() {
        let input = vec![
            category("r1", "Mobiliario", None),
            category("r2", "Electrónica", None),
            category("c1", "Sillas", Some("r1")),
            category("c2", "Mesas", Some("r1")),
            category("c3", "Proyectores", Some("r2")),
            category("g1", "Sillas plegables", Some("c1")),
        ];
        let expected = input.len();

        let forest = build_tree(input);
        assert_eq!(count_nodes(&forest), expected);
        for root in &forest {
            assert_children_link_back(root);
        }
    }

    #[test]
    fn test_preserves_input_order() {
        let forest = build_tree(vec![
            category("r2", "Zeta", None),
            category("r1", "Alfa", None),
            category("c2", "Segunda", Some("r2")),
            category("c1", "Primera", Some("r2")),
        ]);

        // Roots in input order, not alphabetical
        assert_eq!(forest[0].name, "Zeta");
        assert_eq!(forest[1].name, "Alfa");
        // Children in input order too
        assert_eq!(forest[0].children[0].name, "Segunda");
        assert_eq!(forest[0].children[1].name, "Primera");
    }

    #[test]
    fn test_child_listed_before_parent_still_attaches() {
        let forest = build_tree(vec![
            category("c", "Hija", Some("r")),
            category("r", "Raíz", None),
        ]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].name, "Raíz");
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].name, "Hija");
    }

    #[test]
    fn test_dangling_parent_is_dropped_silently() {
        let forest = build_tree(vec![
            category("a", "A", None),
            category("x", "Huérfana", Some("missing")),
        ]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].name, "A");
        assert_eq!(count_nodes(&forest), 1);
    }

    #[test]
    fn test_subtree_under_dangling_parent_is_dropped_too() {
        let forest = build_tree(vec![
            category("a", "A", None),
            category("x", "Huérfana", Some("missing")),
            category("y", "Nieta", Some("x")),
        ]);

        // "y" points at a real input id, but its parent never attaches, so
        // the whole orphaned branch stays out of the forest
        assert_eq!(count_nodes(&forest), 1);
    }
}
