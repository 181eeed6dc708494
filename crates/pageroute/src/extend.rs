// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! User transform over the route tree.

use tracing::debug;

use crate::options::ExtendRoute;
use crate::route::RouteNode;

/// Apply `extend` to every node, pre-order.
///
/// The callback owns each node it receives. Returning `None` drops the node
/// together with its subtree. Otherwise recursion continues into the
/// children of the returned node, so children added by the callback are
/// visited too.
pub fn apply_route_extension(routes: Vec<RouteNode>, extend: Option<&ExtendRoute>) -> Vec<RouteNode> {
    match extend {
        Some(extend) => routes
            .into_iter()
            .filter_map(|route| extend_node(route, extend))
            .collect(),
        None => routes,
    }
}

fn extend_node(route: RouteNode, extend: &ExtendRoute) -> Option<RouteNode> {
    let path = route.path.clone();
    let Some(mut node) = extend(route) else {
        debug!("Route {} removed by extend hook", path);
        return None;
    };

    let children = std::mem::take(&mut node.children);
    node.children = children
        .into_iter()
        .filter_map(|child| extend_node(child, extend))
        .collect();
    Some(node)
}
