//! Navigation tree: turns the flat list of pages into an ordered forest.
//!
//! Pages reference their parent by id. The builder attaches every page to its
//! parent when the parent is part of the input, promotes it to a root when it
//! is not (missing, or filtered out for the current viewer), and orders every
//! sibling group by `order`, keeping input order for ties.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::content::Page;
use crate::i18n::Language;

/// A page together with its ordered children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavNode {
    #[serde(flatten)]
    pub page: Page,
    pub children: Vec<NavNode>,
}

impl NavNode {
    /// Title in the requested display language.
    pub fn title_for(&self, language: Language) -> &str {
        language.pick(&self.page.title, self.page.title_native.as_deref())
    }

    /// Link target for this page.
    pub fn href(&self) -> String {
        format!("/{}", self.page.slug)
    }
}

/// Build the navigation forest.
///
/// Every input page appears exactly once in the output. Parent cycles, which
/// the content store does not prevent, are broken by promoting the first page
/// of each unreachable group (in input order) to a root.
pub fn build_nav_tree(pages: Vec<Page>) -> Vec<NavNode> {
    // First occurrence owns an id
    let mut index_of: HashMap<&str, usize> = HashMap::with_capacity(pages.len());
    for (i, page) in pages.iter().enumerate() {
        index_of.entry(page.id.as_str()).or_insert(i);
    }

    let mut parent: Vec<Option<usize>> = pages
        .iter()
        .map(|page| {
            page.parent_id
                .as_deref()
                .and_then(|id| index_of.get(id).copied())
        })
        .collect();
    drop(index_of);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); pages.len()];
    let mut roots: Vec<usize> = Vec::new();
    for (i, p) in parent.iter().enumerate() {
        match p {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }

    break_cycles(&pages, &mut parent, &mut children, &mut roots);

    // Promoted pages were appended out of input order, so ties fall back to
    // the input index rather than to the current position
    roots.sort_by_key(|&i| (pages[i].order, i));
    for group in &mut children {
        group.sort_by_key(|&i| (pages[i].order, i));
    }

    assemble(pages, &roots, &children)
}

/// Detach pages that cannot be reached from any root and promote them.
fn break_cycles(
    pages: &[Page],
    parent: &mut [Option<usize>],
    children: &mut [Vec<usize>],
    roots: &mut Vec<usize>,
) {
    let mut reached = vec![false; pages.len()];
    let mut stack: Vec<usize> = roots.clone();
    mark_reachable(&mut stack, children, &mut reached);

    for i in 0..pages.len() {
        if reached[i] {
            continue;
        }

        if let Some(p) = parent[i].take() {
            children[p].retain(|&c| c != i);
        }
        warn!(
            "Page {} ({}) is part of a parent cycle, showing it at the top level",
            pages[i].id, pages[i].slug
        );
        roots.push(i);

        stack.push(i);
        mark_reachable(&mut stack, children, &mut reached);
    }
}

fn mark_reachable(stack: &mut Vec<usize>, children: &[Vec<usize>], reached: &mut [bool]) {
    while let Some(i) = stack.pop() {
        if reached[i] {
            continue;
        }
        reached[i] = true;
        stack.extend(children[i].iter().copied());
    }
}

/// Build the nodes bottom-up in post-order, so arbitrarily long parent
/// chains do not grow the call stack.
fn assemble(pages: Vec<Page>, roots: &[usize], children: &[Vec<usize>]) -> Vec<NavNode> {
    let mut post_order = Vec::with_capacity(pages.len());
    let mut stack: Vec<(usize, bool)> = roots.iter().rev().map(|&i| (i, false)).collect();
    while let Some((i, expanded)) = stack.pop() {
        if expanded {
            post_order.push(i);
        } else {
            stack.push((i, true));
            stack.extend(children[i].iter().rev().map(|&c| (c, false)));
        }
    }

    let mut built: Vec<Option<NavNode>> = pages
        .into_iter()
        .map(|page| {
            Some(NavNode {
                page,
                children: Vec::new(),
            })
        })
        .collect();
    for i in post_order {
        let kids: Vec<NavNode> = children[i]
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        if let Some(node) = built[i].as_mut() {
            node.children = kids;
        }
    }

    roots.iter().filter_map(|&i| built[i].take()).collect()
}

/// Total number of nodes in the forest.
pub fn count(forest: &[NavNode]) -> usize {
    let mut total = 0;
    let mut stack: Vec<&NavNode> = forest.iter().collect();
    while let Some(node) = stack.pop() {
        total += 1;
        stack.extend(node.children.iter());
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn page(id: &str, parent: Option<&str>, order: i32) -> Page {
        Page {
            id: id.to_string(),
            title: format!("Title {}", id),
            slug: id.to_string(),
            parent_id: parent.map(str::to_string),
            order,
            ..Page::default()
        }
    }

    fn root_ids(forest: &[NavNode]) -> Vec<&str> {
        forest.iter().map(|n| n.page.id.as_str()).collect()
    }

    /// Ids of all nodes, pre-order.
    fn ids(forest: &[NavNode]) -> Vec<String> {
        let mut out = Vec::new();
        for node in forest {
            out.push(node.page.id.clone());
            out.extend(ids(&node.children));
        }
        out
    }

    // ==================== Scenario Tests ====================

    #[test]
    fn test_children_attached_and_roots_ordered() {
        let forest = build_nav_tree(vec![
            page("a", None, 1),
            page("b", Some("a"), 0),
            page("c", None, 0),
        ]);

        assert_eq!(root_ids(&forest), vec!["c", "a"]);
        assert_eq!(root_ids(&forest[1].children), vec!["b"]);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_orphan_promoted_to_root() {
        let forest = build_nav_tree(vec![page("x", Some("missing"), 0)]);
        assert_eq!(root_ids(&forest), vec!["x"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let forest = build_nav_tree(vec![page("p2", None, 0), page("p1", None, 0)]);
        assert_eq!(root_ids(&forest), vec!["p2", "p1"]);
    }

    #[test]
    fn test_child_listed_before_parent() {
        let forest = build_nav_tree(vec![
            page("child", Some("parent"), 0),
            page("parent", None, 0),
        ]);
        assert_eq!(root_ids(&forest), vec!["parent"]);
        assert_eq!(root_ids(&forest[0].children), vec!["child"]);
    }

    #[test]
    fn test_multi_level_ordering() {
        let forest = build_nav_tree(vec![
            page("root", None, 0),
            page("b", Some("root"), 2),
            page("a", Some("root"), 1),
            page("b2", Some("b"), 5),
            page("b1", Some("b"), -1),
        ]);
        let root = &forest[0];
        assert_eq!(root_ids(&root.children), vec!["a", "b"]);
        assert_eq!(root_ids(&root.children[1].children), vec!["b1", "b2"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_nav_tree(Vec::new()).is_empty());
    }

    // ==================== Cycle Tests ====================

    #[test]
    fn test_self_parent_becomes_root() {
        let forest = build_nav_tree(vec![page("loop", Some("loop"), 0)]);
        assert_eq!(root_ids(&forest), vec!["loop"]);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_promoted_page_keeps_input_order_among_ties() {
        let forest = build_nav_tree(vec![
            page("first", None, 0),
            page("loop", Some("loop"), 1),
            page("later", None, 1),
        ]);
        assert_eq!(root_ids(&forest), vec!["first", "loop", "later"]);
    }

    #[test]
    fn test_two_page_cycle_is_broken_at_first_page() {
        let forest = build_nav_tree(vec![
            page("a", Some("b"), 0),
            page("b", Some("a"), 0),
            page("c", None, 1),
        ]);
        assert_eq!(root_ids(&forest), vec!["a", "c"]);
        assert_eq!(root_ids(&forest[0].children), vec!["b"]);
        assert_eq!(count(&forest), 3);
    }

    #[test]
    fn test_subtree_hanging_off_cycle_is_kept() {
        let forest = build_nav_tree(vec![
            page("x", Some("y"), 0),
            page("y", Some("x"), 0),
            page("leaf", Some("y"), 0),
        ]);
        assert_eq!(count(&forest), 3);
        assert_eq!(root_ids(&forest), vec!["x"]);
        assert_eq!(root_ids(&forest[0].children[0].children), vec!["leaf"]);
    }

    // ==================== Duplicate Id Tests ====================

    #[test]
    fn test_duplicate_ids_each_appear_once() {
        let forest = build_nav_tree(vec![
            page("dup", None, 0),
            page("dup", None, 1),
            page("kid", Some("dup"), 0),
        ]);
        assert_eq!(count(&forest), 3);
        assert_eq!(root_ids(&forest[0].children), vec!["kid"]);
    }

    // ==================== Helper Tests ====================

    #[test]
    fn test_href_and_count() {
        let forest = build_nav_tree(vec![page("a", None, 0), page("deep", Some("a"), 0)]);
        assert_eq!(forest[0].children[0].href(), "/deep");
        assert_eq!(count(&forest), 2);
    }

    #[test]
    fn test_long_parent_chain() {
        let depth = 2_000;
        let pages: Vec<Page> = (0..depth)
            .map(|i| {
                let parent = (i > 0).then(|| format!("p{}", i - 1));
                page(&format!("p{}", i), parent.as_deref(), 0)
            })
            .collect();

        let forest = build_nav_tree(pages);
        assert_eq!(count(&forest), depth);

        let mut node = &forest[0];
        let mut levels = 1;
        while let Some(child) = node.children.first() {
            node = child;
            levels += 1;
        }
        assert_eq!(levels, depth);
        assert_eq!(node.page.id, format!("p{}", depth - 1));
    }

    #[test]
    fn test_title_for_language() {
        let mut p = page("a", None, 0);
        p.title_native = Some("Ա".to_string());
        let node = NavNode {
            page: p,
            children: Vec::new(),
        };
        assert_eq!(node.title_for(Language::English), "Title a");
        assert_eq!(node.title_for(Language::Native), "Ա");
    }

    #[test]
    fn test_serializes_page_fields_flat() {
        let forest = build_nav_tree(vec![page("a", None, 0)]);
        let value = serde_json::to_value(&forest).unwrap();
        assert_eq!(value[0]["id"], "a");
        assert_eq!(value[0]["slug"], "a");
        assert!(value[0]["children"].as_array().unwrap().is_empty());
    }

    // ==================== Property Tests ====================

    fn arb_pages() -> impl Strategy<Value = Vec<Page>> {
        prop::collection::vec((prop::option::of(0usize..14), -3i32..4), 0..24)
            .prop_map(|rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, (parent, order))| {
                        let id = format!("p{}", i);
                        let parent = parent.map(|p| format!("p{}", p));
                        page(&id, parent.as_deref(), order)
                    })
                    .collect()
            })
    }

    fn check_sibling_order(forest: &[NavNode], input: &[Page]) {
        let position = |id: &str| input.iter().position(|p| p.id == id).unwrap();
        for pair in forest.windows(2) {
            let (a, b) = (&pair[0].page, &pair[1].page);
            assert!(a.order <= b.order);
            if a.order == b.order {
                assert!(position(&a.id) < position(&b.id));
            }
        }
        for node in forest {
            check_sibling_order(&node.children, input);
        }
    }

    fn check_parent_links(forest: &[NavNode], parent: Option<&str>) {
        for node in forest {
            if let Some(parent) = parent {
                assert_eq!(node.page.parent_id.as_deref(), Some(parent));
            }
            check_parent_links(&node.children, Some(&node.page.id));
        }
    }

    proptest! {
        #[test]
        fn prop_every_page_appears_exactly_once(pages in arb_pages()) {
            let forest = build_nav_tree(pages.clone());
            let mut out = ids(&forest);
            let mut expected: Vec<String> = pages.iter().map(|p| p.id.clone()).collect();
            out.sort();
            expected.sort();
            prop_assert_eq!(out, expected);
        }

        #[test]
        fn prop_unresolved_parents_are_roots(pages in arb_pages()) {
            let forest = build_nav_tree(pages.clone());
            let known: HashSet<&str> = pages.iter().map(|p| p.id.as_str()).collect();
            let roots: HashSet<&str> = forest.iter().map(|n| n.page.id.as_str()).collect();
            for p in &pages {
                let resolves = p.parent_id.as_deref().map(|id| known.contains(id)).unwrap_or(false);
                if !resolves {
                    prop_assert!(roots.contains(p.id.as_str()));
                }
            }
        }

        #[test]
        fn prop_siblings_sorted_and_stable(pages in arb_pages()) {
            let forest = build_nav_tree(pages.clone());
            check_sibling_order(&forest, &pages);
        }

        #[test]
        fn prop_children_sit_under_their_parent(pages in arb_pages()) {
            let forest = build_nav_tree(pages);
            check_parent_links(&forest, None);
        }

        #[test]
        fn prop_idempotent(pages in arb_pages()) {
            prop_assert_eq!(build_nav_tree(pages.clone()), build_nav_tree(pages));
        }
    }
}
