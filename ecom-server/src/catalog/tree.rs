//! Tree ⇄ nested-set conversion
//!
//! Both directions are linear-time and iterative. Sibling order in the
//! input tree is authoritative and survives the round trip: pre-order over
//! the nested set (`ORDER BY lft`) is exactly document order.

use shared::models::{Category, CategoryTreeNode, NewCategoryNode, ProductRef};
use std::collections::HashMap;
use uuid::Uuid;

use crate::utils::AppError;

/// Flatten an input tree to nested-set rows in pre-order.
///
/// `lft` is assigned on descent, `rgt` on ascent, `depth` is the nesting
/// level, and `path` is the slash-joined segment chain.
pub fn flatten(root: &NewCategoryNode) -> Vec<Category> {
    // Explicit enter/exit stack instead of recursion; the tree depth is
    // caller-controlled input.
    enum Step<'a> {
        Enter(&'a NewCategoryNode, Option<String>, i64),
        Exit(usize),
    }

    let mut rows: Vec<Category> = Vec::new();
    let mut counter: i64 = 0;
    let mut stack = vec![Step::Enter(root, None, 0)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(node, parent_path, depth) => {
                counter += 1;
                let path = match &parent_path {
                    Some(p) => format!("{p}/{}", node.segment),
                    None => node.segment.clone(),
                };
                let index = rows.len();
                rows.push(Category {
                    id: Uuid::new_v4().to_string(),
                    segment: node.segment.clone(),
                    name: node.name.clone(),
                    path: path.clone(),
                    lft: counter,
                    rgt: 0, // assigned on exit
                    depth,
                });
                stack.push(Step::Exit(index));
                for child in node.children.iter().rev() {
                    stack.push(Step::Enter(child, Some(path.clone()), depth + 1));
                }
            }
            Step::Exit(index) => {
                counter += 1;
                rows[index].rgt = counter;
            }
        }
    }

    rows
}

/// Rebuild the tree from rows in pre-order, attaching `products` lists to
/// leaves from `assoc`.
///
/// Iterative: a stack of open parents, where an incoming row nests under
/// the top while its interval fits inside; finished subtrees pop onto
/// their parent's child list.
pub fn build(
    rows: &[Category],
    assoc: &HashMap<String, Vec<ProductRef>>,
) -> Result<CategoryTreeNode, AppError> {
    let mut stack: Vec<(CategoryTreeNode, i64)> = Vec::new();

    for row in rows {
        // Close every open parent whose interval ends before this row.
        while let Some((_, open_rgt)) = stack.last() {
            if row.lft < *open_rgt {
                break;
            }
            let (done, _) = stack
                .pop()
                .ok_or_else(|| AppError::internal("category stack underflow"))?;
            match stack.last_mut() {
                Some((parent, _)) => parent.children.push(done),
                None => return Err(AppError::internal("category rows contain multiple roots")),
            }
        }

        let products = if row.is_leaf() {
            Some(assoc.get(&row.id).cloned().unwrap_or_default())
        } else {
            None
        };
        let node = CategoryTreeNode {
            id: row.id.clone(),
            segment: row.segment.clone(),
            name: row.name.clone(),
            path: row.path.clone(),
            products,
            children: Vec::new(),
        };
        stack.push((node, row.rgt));
    }

    // Drain: everything still open closes into its parent; the last node
    // standing is the root.
    loop {
        match stack.pop() {
            Some((done, _)) => match stack.last_mut() {
                Some((parent, _)) => parent.children.push(done),
                None => return Ok(done),
            },
            None => return Err(AppError::internal("category rows were empty")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(segment: &str, name: &str, children: Vec<NewCategoryNode>) -> NewCategoryNode {
        NewCategoryNode {
            segment: segment.into(),
            name: name.into(),
            children,
        }
    }

    fn fixture() -> NewCategoryNode {
        node(
            "a",
            "A",
            vec![
                node("b", "B", vec![]),
                node("c", "C", vec![node("d", "D", vec![])]),
            ],
        )
    }

    #[test]
    fn flatten_assigns_preorder_intervals() {
        let rows = flatten(&fixture());
        let coords: Vec<(&str, &str, i64, i64, i64)> = rows
            .iter()
            .map(|r| (r.segment.as_str(), r.path.as_str(), r.lft, r.rgt, r.depth))
            .collect();
        assert_eq!(
            coords,
            vec![
                ("a", "a", 1, 8, 0),
                ("b", "a/b", 2, 3, 1),
                ("c", "a/c", 4, 7, 1),
                ("d", "a/c/d", 5, 6, 2),
            ]
        );
    }

    #[test]
    fn flatten_containment_invariant() {
        let rows = flatten(&fixture());
        for node in &rows {
            assert!(node.lft < node.rgt);
            for other in &rows {
                let inside = other.lft > node.lft && other.lft < node.rgt;
                if inside {
                    assert!(other.rgt < node.rgt);
                }
            }
        }
    }

    #[test]
    fn leaf_iff_adjacent_interval() {
        let rows = flatten(&fixture());
        let leaves: Vec<&str> = rows
            .iter()
            .filter(|r| r.is_leaf())
            .map(|r| r.segment.as_str())
            .collect();
        assert_eq!(leaves, vec!["b", "d"]);
    }

    #[test]
    fn round_trip_preserves_shape_and_sibling_order() {
        let rows = flatten(&fixture());
        let tree = build(&rows, &HashMap::new()).unwrap();

        assert_eq!(tree.segment, "a");
        assert!(!tree.is_leaf());
        let first: Vec<&str> = tree.children.iter().map(|c| c.segment.as_str()).collect();
        assert_eq!(first, vec!["b", "c"]);
        assert!(tree.children[0].is_leaf());
        assert_eq!(tree.children[1].children[0].segment, "d");
        assert!(tree.children[1].children[0].is_leaf());

        // Second trip is stable too.
        let again = flatten_tree_node(&tree);
        let rows2 = flatten(&again);
        let coords: Vec<(&str, i64, i64)> =
            rows2.iter().map(|r| (r.path.as_str(), r.lft, r.rgt)).collect();
        let orig: Vec<(&str, i64, i64)> =
            rows.iter().map(|r| (r.path.as_str(), r.lft, r.rgt)).collect();
        assert_eq!(coords, orig);
    }

    #[test]
    fn leaves_get_products_non_leaves_do_not() {
        let rows = flatten(&fixture());
        let leaf_b = rows.iter().find(|r| r.segment == "b").unwrap();
        let mut assoc = HashMap::new();
        assoc.insert(
            leaf_b.id.clone(),
            vec![ProductRef {
                id: "p1".into(),
                path: "widget".into(),
                sku: "W-1".into(),
                name: "Widget".into(),
                created: chrono::Utc::now(),
                modified: chrono::Utc::now(),
            }],
        );
        let tree = build(&rows, &assoc).unwrap();
        assert!(tree.products.is_none());
        let b = &tree.children[0];
        assert_eq!(b.products.as_ref().unwrap().len(), 1);
        let d = &tree.children[1].children[0];
        // leaf with no relations: empty list, not absent
        assert_eq!(d.products.as_deref(), Some(&[][..]));
    }

    #[test]
    fn single_node_tree() {
        let rows = flatten(&node("root", "Root", vec![]));
        assert_eq!(rows.len(), 1);
        assert_eq!((rows[0].lft, rows[0].rgt, rows[0].depth), (1, 2, 0));
        let tree = build(&rows, &HashMap::new()).unwrap();
        assert!(tree.is_leaf());
    }

    // Helper for the round-trip test: fold a serialized tree back into an
    // input tree.
    fn flatten_tree_node(node: &CategoryTreeNode) -> NewCategoryNode {
        NewCategoryNode {
            segment: node.segment.clone(),
            name: node.name.clone(),
            children: node.children.iter().map(flatten_tree_node).collect(),
        }
    }
}
