// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Nesting of flat route descriptors into a route tree.
//!
//! Descriptors are visited in ascending order of path depth so that a parent
//! is always registered before its children look it up. A route whose
//! parent path (`/` + all but the last segment) was registered becomes a
//! child with a path relative to that parent; otherwise it stays at the top
//! level. Single-segment routes are always top-level. Every node is
//! registered under its own path, relative once reparented, so only
//! top-level nodes can parent deeper routes.
//!
//! Paths are unique among siblings. An index page whose path collides with
//! an existing sibling (`user.vue` + `user/index.vue`) becomes that
//! sibling's default child `""`; any other collision keeps the first route.
//!
//! ```text
//! /            → /
//! /user        → /user
//! /user/:id    → /user { :id }
//! /docs/intro  → /docs/intro   (no /docs page)
//! /a/b/c       → /a/b/c        (/a/b was reparented to `b`)
//! ```

use std::collections::HashMap;
use tracing::{trace, warn};

use crate::route::{RouteDescriptor, RouteNode};

/// Arena slot: the node without children plus its child indices.
struct Slot {
    node: RouteNode,
    children: Vec<usize>,
}

fn segment_count(path: &str) -> usize {
    path.split('/').filter(|s| !s.is_empty()).count()
}

/// Build the nested route tree from flat descriptors.
pub fn build_route_tree(descriptors: Vec<RouteDescriptor>) -> Vec<RouteNode> {
    let mut sorted = descriptors;
    // stable: equal depth keeps input order
    sorted.sort_by_key(|d| segment_count(&d.route_path));

    let mut arena: Vec<Slot> = Vec::with_capacity(sorted.len());
    let mut lookup: HashMap<String, usize> = HashMap::new();
    // (parent, path) of every placed node
    let mut siblings: HashMap<(Option<usize>, String), usize> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();

    for descriptor in sorted {
        let full_path = descriptor.route_path.clone();
        let is_index = descriptor.is_index;
        let segments: Vec<&str> = full_path.split('/').filter(|s| !s.is_empty()).collect();
        let index = arena.len();
        let mut node = RouteNode::from(descriptor);

        let mut parent = match segments.split_last() {
            Some((last, parents)) if !parents.is_empty() => {
                let parent_path = format!("/{}", parents.join("/"));
                lookup.get(&parent_path).map(|&p| {
                    node.path = last.to_string();
                    p
                })
            }
            _ => None,
        };
        if segments.is_empty() {
            node.path = "/".to_string();
        }

        if let Some(&existing) = siblings.get(&(parent, node.path.clone())) {
            let default_child = (Some(existing), String::new());
            if !is_index || siblings.contains_key(&default_child) {
                warn!("Skipping {}: duplicate of route {}", full_path, arena[existing].node.path);
                continue;
            }
            trace!("Nesting index {} as default child", full_path);
            node.path = String::new();
            parent = Some(existing);
        }

        match parent {
            Some(parent_index) => {
                trace!("Nesting {} under {}", full_path, arena[parent_index].node.path);
                arena[parent_index].children.push(index);
            }
            None => roots.push(index),
        }

        siblings.insert((parent, node.path.clone()), index);
        lookup.entry(node.path.clone()).or_insert(index);
        arena.push(Slot {
            node,
            children: Vec::new(),
        });
    }

    let mut slots: Vec<Option<Slot>> = arena.into_iter().map(Some).collect();
    roots
        .into_iter()
        .filter_map(|i| materialize(&mut slots, i))
        .collect()
}

/// Move a slot and its descendants out of the arena into an owned node.
fn materialize(slots: &mut [Option<Slot>], index: usize) -> Option<RouteNode> {
    let Slot { mut node, children } = slots.get_mut(index)?.take()?;
    node.children = children
        .into_iter()
        .filter_map(|child| materialize(slots, child))
        .collect();
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ImportMode;
    use crate::route::ComponentImport;
    use serde_json::Map;
    use std::path::PathBuf;

    fn descriptor(path: &str, name: &str) -> RouteDescriptor {
        RouteDescriptor {
            relative_path: format!("{}.vue", name),
            absolute_path: PathBuf::from(format!("/pages/{}.vue", name)),
            route_path: path.to_string(),
            route_name: name.to_string(),
            component: ComponentImport::new(format!("@/pages/{}.vue", name), ImportMode::Async),
            is_dynamic: path.contains(':'),
            is_index: false,
            is_catch_all: false,
            param_names: Vec::new(),
            meta: Map::new(),
            redirect: None,
            alias: None,
        }
    }

    #[test]
    fn test_nests_child_under_parent() {
        let tree = build_route_tree(vec![
            descriptor("/user/:id", "user-id"),
            descriptor("/", "index"),
            descriptor("/user", "user"),
        ]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].path, "/");
        assert_eq!(tree[1].path, "/user");
        assert_eq!(tree[1].children.len(), 1);
        assert_eq!(tree[1].children[0].path, ":id");
        assert_eq!(tree[1].children[0].name.as_deref(), Some("user-id"));
    }

    #[test]
    fn test_missing_parent_degrades_to_top_level() {
        let tree = build_route_tree(vec![descriptor("/docs/intro", "docs-intro")]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].path, "/docs/intro");
    }

    #[test]
    fn test_reparented_nodes_do_not_parent_deeper_routes() {
        let tree = build_route_tree(vec![
            descriptor("/a", "a"),
            descriptor("/a/b", "a-b"),
            descriptor("/a/b/c", "a-b-c"),
        ]);
        let paths: Vec<&str> = tree.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["/a", "/a/b/c"]);
        assert!(tree[0].child("b").unwrap().children.is_empty());
    }

    #[test]
    fn test_index_page_becomes_default_child() {
        let mut index = descriptor("/user", "user-index");
        index.is_index = true;
        let tree = build_route_tree(vec![
            descriptor("/user", "user"),
            index,
            descriptor("/user/:id", "user-id"),
        ]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name.as_deref(), Some("user"));
        let children: Vec<&str> = tree[0].children.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(children, vec!["", ":id"]);
        assert_eq!(tree[0].child("").unwrap().name.as_deref(), Some("user-index"));
    }

    #[test]
    fn test_duplicate_paths_keep_first() {
        let tree = build_route_tree(vec![
            descriptor("/a", "a"),
            descriptor("/a/b", "first"),
            descriptor("/a/b", "second"),
            descriptor("/about", "about"),
            descriptor("/about", "about-again"),
        ]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[1].name.as_deref(), Some("about"));
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].name.as_deref(), Some("first"));
    }

    #[test]
    fn test_siblings_keep_input_order() {
        let tree = build_route_tree(vec![
            descriptor("/z", "z"),
            descriptor("/a", "a"),
            descriptor("/z/2", "z-2"),
            descriptor("/z/1", "z-1"),
        ]);
        let paths: Vec<&str> = tree.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["/z", "/a"]);
        let children: Vec<&str> = tree[0].children.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(children, vec!["2", "1"]);
    }

    #[test]
    fn test_every_route_appears_once() {
        let paths = ["/", "/a", "/a/:id", "/a/:id/edit", "/b/c", "/:slug(.*)"];
        let tree = build_route_tree(paths.iter().map(|p| descriptor(p, p)).collect());
        let total: usize = tree.iter().map(RouteNode::count).sum();
        assert_eq!(total, paths.len());
    }
}
