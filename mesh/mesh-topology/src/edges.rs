//! Edge synthesis and edge neighbor links.

use mesh_types::{Edge, FeMesh};
use tracing::debug;

use crate::NodeLookup;

/// Synthesize the edge array from the faces and beams.
///
/// Face edges are taken from exterior faces with no neighbor across the edge
/// and from neighboring face pairs, where the lower face index owns the
/// pair. An edge gets gid 0 when it separates face partitions (no neighbor,
/// or a neighbor with a different gid) and -1 otherwise. Every beam adds one
/// two-node edge with gid 0. Duplicate node pairs are emitted once.
///
/// Ends with [`rebuild_edge_data`]. Returns the number of edges.
pub fn build_edges(mesh: &mut FeMesh) -> usize {
    let mut edges: Vec<Edge> = Vec::new();
    let mut by_node: Vec<Vec<usize>> = vec![Vec::new(); mesh.node_count()];

    let mut push = |edge: Edge, edges: &mut Vec<Edge>| {
        let (n0, n1) = (edge.n0(), edge.n1());
        if n0 >= by_node.len() || n1 >= by_node.len() {
            return;
        }
        if by_node[n0].iter().any(|&k| edges[k].matches(&edge)) {
            return;
        }
        let index = edges.len();
        by_node[n0].push(index);
        if n1 != n0 {
            by_node[n1].push(index);
        }
        edges.push(edge);
    };

    for (i, face) in mesh.faces.iter().enumerate() {
        for j in 0..face.edge_count() {
            let nbr = face.nbr[j];
            let emit = match nbr {
                None => face.exterior,
                Some(k) => i < k,
            };
            if !emit {
                continue;
            }
            let mut edge = face.edge(j);
            edge.gid = match nbr {
                Some(k) if mesh.faces[k].gid == face.gid => -1,
                _ => 0,
            };
            edge.exterior = edge.gid == 0;
            push(edge, &mut edges);
        }
    }

    for (i, el) in mesh.elements.iter().enumerate() {
        if !el.is_beam() || el.nodes.len() < 2 {
            continue;
        }
        let mut edge = Edge::new(&el.nodes[..2]);
        edge.gid = 0;
        edge.exterior = true;
        edge.element = Some(i);
        push(edge, &mut edges);
    }

    mesh.edges = edges;
    rebuild_edge_data(mesh);
    debug!("Built {} edges", mesh.edge_count());
    mesh.edge_count()
}

/// Re-derive beam ownership, exterior flags, and neighbor links of edges.
pub fn rebuild_edge_data(mesh: &mut FeMesh) {
    update_edge_element_table(mesh);
    mark_exterior_edges(mesh);
    update_edge_neighbors(mesh);
}

/// Link every edge to the beam element lying on it, if any.
pub fn update_edge_element_table(mesh: &mut FeMesh) {
    let lookup = NodeLookup::for_elements(mesh);
    let owners: Vec<Option<usize>> = mesh
        .edges
        .iter()
        .map(|edge| {
            let (a, b) = (edge.n0(), edge.n1());
            lookup.items(a).find(|&k| {
                let el = &mesh.elements[k];
                el.is_beam()
                    && ((el.nodes[0] == a && el.nodes[1] == b)
                        || (el.nodes[0] == b && el.nodes[1] == a))
            })
        })
        .collect();

    for (edge, owner) in mesh.edges.iter_mut().zip(owners) {
        edge.element = owner;
    }
}

/// Edges with an assigned partition are exterior. Returns the exterior count.
pub fn mark_exterior_edges(mesh: &mut FeMesh) -> usize {
    let mut count = 0;
    for edge in &mut mesh.edges {
        edge.exterior = edge.gid >= 0;
        count += usize::from(edge.exterior);
    }
    count
}

/// Link exterior edges that meet at a node shared by exactly two exterior
/// edges of the same partition.
pub fn update_edge_neighbors(mesh: &mut FeMesh) {
    let lookup = NodeLookup::for_edges(mesh, true);
    let mut links: Vec<[Option<usize>; 2]> = vec![[None; 2]; mesh.edge_count()];

    for (i, edge) in mesh.edges.iter().enumerate() {
        if edge.gid < 0 || !edge.exterior {
            continue;
        }
        for j in 0..2 {
            let node = edge.nodes[j];
            if lookup.valence(node) != 2 {
                continue;
            }
            links[i][j] = lookup
                .items(node)
                .find(|&k| k != i && mesh.edges[k].gid == edge.gid);
        }
    }

    for (edge, nbr) in mesh.edges.iter_mut().zip(links) {
        edge.nbr = nbr;
    }
}
