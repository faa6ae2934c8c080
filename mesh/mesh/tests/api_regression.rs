//! API Regression Tests for the Mesh Crates
//!
//! These tests pin down the public API across the workspace. They are
//! organized in tiers of increasing scope:
//!
//! - Tier 1: Data model (mesh-types)
//! - Tier 2: Topology reconstruction (mesh-topology)
//! - Tier 3: Partitioning passes (mesh-topology)
//! - Tier 4: Editing (mesh-edit)
//! - Tier 5: Errors and reports
//!
//! A failure here after an API change marks a breaking change that needs a
//! version bump.

// Allow test-specific patterns
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::uninlined_format_args)]

use mesh::{edit, prelude::*, topology, types};

fn rebuilt(nx: usize, ny: usize, nz: usize) -> FeMesh {
    let mut mesh = hex_block(nx, ny, nz);
    MeshBuilder::default().rebuild(&mut mesh).unwrap();
    mesh
}

// =============================================================================
// TIER 1: Data Model
// =============================================================================

mod tier1_data_model {
    use super::*;

    #[test]
    fn node_and_element_construction() {
        let mut mesh = FeMesh::new();
        assert!(mesh.is_empty());

        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]] {
            mesh.add_node(Point3::from(p));
        }
        // each new node is its own feature point
        assert_eq!(mesh.count_node_partitions(), 4);
        assert!(mesh.nodes.iter().all(|n| n.exterior));

        let index = mesh.add_element(ElementType::Tet4, &[0, 1, 2, 3]).unwrap();
        assert_eq!(index, 0);
        assert_eq!(mesh.elements[0].gid, 0);
        assert!(mesh.elements[0].is_solid());
    }

    #[test]
    fn hex_block_layout() {
        let mesh = hex_block(2, 3, 4);
        assert_eq!(mesh.node_count(), 3 * 4 * 5);
        assert_eq!(mesh.element_count(), 24);
        assert!(mesh.nodes.iter().all(|n| n.gid == -1));
        assert!(mesh.faces.is_empty());
    }

    #[test]
    fn element_registry_lookup() {
        let registry = ElementRegistry::standard();
        assert!(registry.contains(ElementType::Hex8));
        let shape = registry.shape(ElementType::Hex8).unwrap();
        assert_eq!(shape.face_count(), 6);
        assert_eq!(shape.neighbor_slots(), 6);

        let registry = registry.without(ElementType::Hex8);
        assert!(registry.shape(ElementType::Hex8).is_err());
    }

    #[test]
    fn item_lists_validate_and_remap() {
        let mut mesh = hex_block(1, 1, 1);
        let set = types::NodeSet::new("fixed", vec![0, 1, 9]);
        assert!(set.validate(&mesh).is_err());

        mesh.node_sets.push(types::NodeSet::new("fixed", vec![0, 1]));
        let mut keep = vec![true; 8];
        keep[0] = false;
        mesh.elements.clear();
        mesh.retain_nodes(&keep);
        assert_eq!(mesh.node_sets[0].items, vec![0]);
    }

    #[test]
    fn transform_round_trip() {
        let t = MeshTransform::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let p = Point3::new(0.5, 0.5, 0.5);
        let back = t.global_to_local(&t.local_to_global(&p));
        assert!((back - p).norm() < 1e-12);
    }
}

// =============================================================================
// TIER 2: Topology Reconstruction
// =============================================================================

mod tier2_topology {
    use super::*;

    #[test]
    fn rebuild_params_builder_pattern() {
        let params = RebuildParams::default();
        assert!((params.smoothing_angle - 60.0).abs() < f64::EPSILON);
        assert!(!params.partition_elements);
        assert!(params.crease_internal);
        assert!(params.feature_angle.is_none());
        assert!(!params.strict_manifold);

        let params = RebuildParams::default()
            .with_smoothing_angle(30.0)
            .with_partition_elements(true)
            .with_crease_internal(false)
            .with_feature_angle(45.0)
            .with_strict_manifold(true);
        assert!((params.smoothing_angle - 30.0).abs() < f64::EPSILON);
        assert_eq!(params.feature_angle, Some(45.0));

        assert!(RebuildParams::auto_parts().partition_elements);
        assert!((RebuildParams::single_surface().smoothing_angle - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rebuild_summary_usage() {
        let mut mesh = hex_block(2, 2, 2);
        let summary = MeshBuilder::default().rebuild(&mut mesh).unwrap();
        assert_eq!(summary.elements, 8);
        assert_eq!(summary.faces, 24);
        assert_eq!(summary.exterior_faces, 24);
        assert_eq!(summary.face_partitions, 6);
        assert_eq!(summary.edge_partitions, 12);
        assert_eq!(summary.node_partitions, 8);
        assert!(!summary.had_ambiguities());
        assert!(summary.to_string().starts_with("Rebuild:"));
    }

    #[test]
    fn node_lookup_tables() {
        let mesh = rebuilt(2, 1, 1);
        let lookup = topology::NodeLookup::for_elements(&mesh);
        // node 1 sits between the two elements
        assert_eq!(lookup.valence(1), 2);
        assert_eq!(lookup.items(0).collect::<Vec<_>>(), vec![0]);

        let faces = topology::NodeLookup::for_faces(&mesh);
        assert_eq!(faces.valence(0), 3);
    }

    #[test]
    fn element_neighbors_are_symmetric() {
        let mesh = rebuilt(3, 1, 1);
        let middle = &mesh.elements[1];
        assert_eq!(middle.nbr.iter().flatten().count(), 2);
        for &k in middle.nbr.iter().flatten() {
            assert!(mesh.elements[k].nbr.contains(&Some(1)));
        }
        assert!(mesh.elements.iter().all(|e| e.exterior));
    }

    #[test]
    fn sub_pipelines() {
        let builder = MeshBuilder::default();
        let mut mesh = rebuilt(2, 2, 1);
        let faces = mesh.face_count();

        builder.rebuild_element_data(&mut mesh).unwrap();
        builder.rebuild_face_data(&mut mesh).unwrap();
        builder.rebuild_edge_data(&mut mesh);
        let exterior = builder.rebuild_node_data(&mut mesh);
        assert_eq!(mesh.face_count(), faces);
        assert_eq!(exterior, mesh.node_count());

        let surfaces = builder.auto_partition(&mut mesh, 180.0);
        assert_eq!(surfaces, 1);
        builder.repair_edges(&mut mesh);
        assert_eq!(mesh.count_edge_partitions(), 0);
        assert!(validate_topology(&mesh).is_consistent());
    }
}

// =============================================================================
// TIER 3: Partitioning
// =============================================================================

mod tier3_partitioning {
    use super::*;

    #[test]
    fn parts_from_connectivity() {
        let mut mesh = hex_block(2, 1, 1);
        for el in &mut mesh.elements {
            el.gid = 5;
        }
        let builder = MeshBuilder::default().with_params(RebuildParams::auto_parts());
        let summary = builder.rebuild(&mut mesh).unwrap();
        assert_eq!(summary.element_partitions, 1);
        assert!(mesh.elements.iter().all(|e| e.gid == 0));
    }

    #[test]
    fn preserved_parts_get_interfaces() {
        let mut mesh = hex_block(2, 1, 1);
        mesh.elements[1].gid = 3;
        let builder = MeshBuilder::default().with_params(RebuildParams::preserve_parts());
        let summary = builder.rebuild(&mut mesh).unwrap();
        assert_eq!(summary.element_partitions, 2);
        assert_eq!(mesh.elements[1].gid, 1);
        assert_eq!(summary.faces, 11);
        assert_eq!(summary.exterior_faces, 10);
    }

    #[test]
    fn renumbering_closes_gaps() {
        let mut mesh = rebuilt(1, 1, 1);
        for face in &mut mesh.faces {
            face.gid *= 10;
        }
        assert_eq!(topology::update_face_partitions(&mut mesh), 6);
        assert_eq!(mesh.count_face_partitions(), 6);
        assert_eq!(topology::update_smoothing_groups(&mut mesh), mesh.count_smoothing_groups());
    }

    #[test]
    fn selective_surface_split() {
        let mut mesh = rebuilt(2, 2, 1);
        let top: Vec<usize> = (0..mesh.face_count())
            .filter(|&i| mesh.face_normal(i).z > 0.5)
            .collect();
        assert_eq!(top.len(), 4);
        // a flat subset never splits
        assert!(topology::auto_partition_face_set(&mut mesh, 10.0, &top).unwrap());
        let gid = mesh.faces[top[0]].gid;
        assert!(top.iter().all(|&i| mesh.faces[i].gid == gid));
    }
}

// =============================================================================
// TIER 4: Editing
// =============================================================================

mod tier4_editing {
    use super::*;

    #[test]
    fn attach_then_weld() {
        let builder = MeshBuilder::default();
        let mut mesh = rebuilt(1, 1, 1);
        let mut other = rebuilt(1, 1, 1);
        other.transform = MeshTransform::from_translation(Vector3::new(1.0, 0.0, 0.0));

        let mut plain = mesh.clone();
        let offsets = attach(&mut plain, &other);
        assert_eq!(offsets.nodes, 8);
        assert_eq!(plain.node_count(), 16);

        let summary: WeldSummary = attach_and_weld(&mut mesh, &other, 1e-6, &builder).unwrap();
        assert_eq!(summary.nodes_merged, 4);
        assert_eq!(mesh.node_count(), 12);
        assert!(summary.to_string().starts_with("Weld:"));
    }

    #[test]
    fn delete_and_clean_up() {
        let builder = MeshBuilder::default();
        let mut mesh = rebuilt(3, 1, 1);
        mesh.elements[0].tag = 1;
        assert_eq!(edit::delete_tagged_elements(&mut mesh, 1, &builder).unwrap(), 1);
        assert_eq!(mesh.node_count(), 12);

        mesh.faces[0].tag = 2;
        edit::delete_tagged_faces(&mut mesh, 2, &builder).unwrap();
        assert_eq!(mesh.element_count(), 1);

        mesh.add_node(Point3::new(9.0, 9.0, 9.0));
        mesh.nodes.last_mut().unwrap().gid = -1;
        let map = edit::remove_isolated_nodes(&mut mesh);
        assert_eq!(map.removed_count(), 1);
    }

    #[test]
    fn delete_parts_works_on_a_copy() {
        let mut mesh = hex_block(2, 1, 1);
        mesh.elements[1].gid = 1;
        let builder = MeshBuilder::default();
        builder.rebuild(&mut mesh).unwrap();

        let rest = edit::delete_parts(&mesh, &[1], &builder).unwrap();
        assert_eq!(rest.element_count(), 1);
        assert_eq!(mesh.element_count(), 2);
    }

    #[test]
    fn invert_and_detach() {
        let builder = MeshBuilder::default();
        let mut mesh = rebuilt(2, 1, 1);
        mesh.elements[1].tag = 1;
        assert_eq!(edit::invert_tagged_elements(&mut mesh, 1, &builder).unwrap(), 1);

        let part = edit::detach_tagged_elements(&mut mesh, 1, &builder).unwrap().unwrap();
        assert_eq!(part.element_count(), 1);
        assert_eq!(mesh.element_count(), 1);
    }

    #[test]
    fn duplicate_removal() {
        let mut mesh = rebuilt(1, 1, 1);
        let copy = mesh.faces[0].clone();
        mesh.faces.push(copy);
        let edge = mesh.edges[0].clone();
        mesh.edges.push(edge);

        assert_eq!(edit::remove_duplicate_faces(&mut mesh, &MeshBuilder::default()).unwrap(), 1);
        assert_eq!(edit::remove_duplicate_edges(&mut mesh), 1);
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.edge_count(), 12);
    }

    #[test]
    fn selection_partitioning() {
        let mut mesh = rebuilt(2, 1, 1);
        mesh.faces[0].tag = 1;
        let surface = edit::partition_face_selection(&mut mesh, 1, None).unwrap();
        assert_eq!(mesh.faces[0].gid, surface);

        mesh.edges[0].tag = 1;
        edit::partition_edge_selection(&mut mesh, 1, None).unwrap();
        assert!(validate_topology(&mesh).is_consistent());

        // node 1 is the midpoint of a feature curve, not yet a feature point
        let mut mesh = rebuilt(2, 1, 1);
        let points = mesh.count_node_partitions();
        assert!(edit::partition_node(&mut mesh, 1).unwrap());
        assert!(!edit::partition_node(&mut mesh, 1).unwrap());
        assert_eq!(mesh.count_node_partitions(), points + 1);
    }

    #[test]
    fn add_triangles_builds_shells() {
        let mut shells = FeMesh::new();
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]] {
            shells.add_node(Point3::from(p));
        }
        let builder = MeshBuilder::default();
        let summary = edit::add_triangles(&mut shells, &[0, 1, 2], &builder).unwrap();
        assert_eq!(summary.faces, 1);
        assert_eq!(shells.element_count(), 1);
    }
}

// =============================================================================
// TIER 5: Errors and Reports
// =============================================================================

mod tier5_errors {
    use super::*;

    #[test]
    fn mesh_error_display() {
        let err = MeshError::invalid(ItemKind::Node, 7, 2);
        assert_eq!(err.to_string(), "invalid node index 7 (mesh has 2 nodes)");

        let mut mesh = FeMesh::new();
        let err = mesh.add_element(ElementType::Tet4, &[0, 1]).unwrap_err();
        assert!(matches!(err, MeshError::NodeCountMismatch { expected: 4, actual: 2, .. }));
    }

    #[test]
    fn unregistered_type_is_rejected() {
        let builder = MeshBuilder::new(ElementRegistry::standard().without(ElementType::Hex8));
        let mut mesh = hex_block(1, 1, 1);
        let err = builder.rebuild(&mut mesh).unwrap_err();
        assert!(matches!(
            err,
            TopologyError::Mesh(MeshError::UnsupportedElementType { .. })
        ));
        assert!(mesh.faces.is_empty());
    }

    #[test]
    fn edit_errors_wrap_lower_layers() {
        let builder = MeshBuilder::new(ElementRegistry::standard().without(ElementType::Hex8));
        let mut mesh = hex_block(1, 1, 1);
        mesh.elements[0].tag = 1;
        let err = edit::delete_tagged_elements(&mut mesh, 1, &builder).unwrap_err();
        assert!(matches!(err, EditError::Topology(TopologyError::Mesh(_))));

        let err = edit::partition_face_selection(&mut mesh, 1, None).unwrap_err();
        assert!(matches!(err, EditError::EmptySelection { .. }));
    }

    #[test]
    fn topology_report() {
        let mesh = rebuilt(2, 2, 2);
        let report: TopologyReport = validate_topology(&mesh);
        assert!(report.is_consistent());
        assert!(!report.has_issues());
        assert_eq!(report.issue_count(), 0);
        assert!(report.to_string().starts_with("Topology Report:"));
    }
}
