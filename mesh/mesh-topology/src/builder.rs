//! The rebuild pipeline.
//!
//! [`MeshBuilder`] drives the passes of this crate in the order that keeps
//! every derived structure consistent with the nodes and elements it came
//! from. The sub-pipelines re-derive one layer after a targeted edit.

use mesh_types::{ElementRegistry, FeMesh, ShapeTable};
use tracing::{info, warn};

use crate::{
    NeighborReport, TopologyError, TopologyResult, auto_partition_edges,
    auto_partition_elements, auto_partition_nodes, auto_partition_surface, build_edges,
    build_faces, mark_exterior_elements, mark_exterior_nodes, update_element_neighbors,
    update_element_partitions,
};

/// Parameters for a full topology rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct RebuildParams {
    /// Largest dihedral angle, in degrees, between two faces of one surface.
    ///
    /// Default: `60.0`
    pub smoothing_angle: f64,

    /// Re-derive element partitions from connectivity instead of keeping the
    /// existing part ids.
    ///
    /// Default: `false`
    pub partition_elements: bool,

    /// Apply the smoothing angle between interior faces too.
    ///
    /// Default: `true`
    pub crease_internal: bool,

    /// Largest turn, in degrees, between consecutive edges of one feature
    /// curve. `None` joins curves by connectivity alone.
    ///
    /// Default: `None`
    pub feature_angle: Option<f64>,

    /// Fail with [`TopologyError::NonManifoldAmbiguity`] instead of keeping
    /// the first candidate when a neighbor slot is ambiguous.
    ///
    /// Default: `false`
    pub strict_manifold: bool,
}

impl Default for RebuildParams {
    fn default() -> Self {
        Self {
            smoothing_angle: 60.0,
            partition_elements: false,
            crease_internal: true,
            feature_angle: None,
            strict_manifold: false,
        }
    }
}

impl RebuildParams {
    /// Keep the element partitions the mesh already has.
    #[must_use]
    pub fn preserve_parts() -> Self {
        Self::default()
    }

    /// Split elements into parts by connectivity.
    #[must_use]
    pub fn auto_parts() -> Self {
        Self {
            partition_elements: true,
            ..Default::default()
        }
    }

    /// Merge each connected surface of a part into one face partition.
    #[must_use]
    pub fn single_surface() -> Self {
        Self {
            smoothing_angle: 180.0,
            ..Default::default()
        }
    }

    /// Set the smoothing angle in degrees.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_topology::RebuildParams;
    ///
    /// let params = RebuildParams::default().with_smoothing_angle(30.0);
    /// assert_eq!(params.smoothing_angle, 30.0);
    /// ```
    #[must_use]
    pub fn with_smoothing_angle(mut self, degrees: f64) -> Self {
        self.smoothing_angle = degrees;
        self
    }

    /// Set whether element partitions are re-derived.
    #[must_use]
    pub fn with_partition_elements(mut self, enabled: bool) -> Self {
        self.partition_elements = enabled;
        self
    }

    /// Set whether interior faces are split by angle.
    #[must_use]
    pub fn with_crease_internal(mut self, enabled: bool) -> Self {
        self.crease_internal = enabled;
        self
    }

    /// Split feature curves where they turn by more than `degrees`.
    #[must_use]
    pub fn with_feature_angle(mut self, degrees: f64) -> Self {
        self.feature_angle = Some(degrees);
        self
    }

    /// Set whether ambiguous neighbors abort the rebuild.
    #[must_use]
    pub fn with_strict_manifold(mut self, enabled: bool) -> Self {
        self.strict_manifold = enabled;
        self
    }
}

/// Result of a full rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildSummary {
    /// Number of elements.
    pub elements: usize,
    /// Number of exterior elements.
    pub exterior_elements: usize,
    /// Number of synthesized faces.
    pub faces: usize,
    /// Number of exterior faces.
    pub exterior_faces: usize,
    /// Number of synthesized edges.
    pub edges: usize,
    /// Number of exterior nodes.
    pub exterior_nodes: usize,
    /// Element partitions (parts).
    pub element_partitions: usize,
    /// Face partitions (surfaces).
    pub face_partitions: usize,
    /// Edge partitions (feature curves).
    pub edge_partitions: usize,
    /// Node partitions (feature points).
    pub node_partitions: usize,
    /// Element neighbor slots resolved by the first-match rule.
    pub ambiguous_elements: usize,
    /// Face neighbor slots resolved by the first-match rule.
    pub ambiguous_faces: usize,
}

impl RebuildSummary {
    /// Check if any neighbor slot had more than one candidate.
    #[must_use]
    pub fn had_ambiguities(&self) -> bool {
        self.ambiguous_elements > 0 || self.ambiguous_faces > 0
    }
}

impl std::fmt::Display for RebuildSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rebuild: {} elements in {} parts, {} faces in {} surfaces, {} edges in {} curves, {} feature nodes",
            self.elements,
            self.element_partitions,
            self.faces,
            self.face_partitions,
            self.edges,
            self.edge_partitions,
            self.node_partitions
        )?;
        if self.had_ambiguities() {
            write!(
                f,
                " ({} ambiguous element slots, {} ambiguous face slots)",
                self.ambiguous_elements, self.ambiguous_faces
            )?;
        }
        Ok(())
    }
}

/// Derives and maintains the topology of an [`FeMesh`].
///
/// Element shapes are resolved through the builder's registry before any
/// pass mutates the mesh, so an unregistered element type leaves the mesh
/// untouched.
///
/// # Example
///
/// ```
/// use mesh_topology::{MeshBuilder, RebuildParams};
/// use mesh_types::hex_block;
///
/// let mut mesh = hex_block(2, 2, 2);
/// let builder = MeshBuilder::default().with_params(RebuildParams::default());
/// let summary = builder.rebuild(&mut mesh).unwrap();
///
/// assert_eq!(summary.faces, 24);
/// assert_eq!(summary.face_partitions, 6);
/// assert_eq!(summary.edge_partitions, 12);
/// assert_eq!(summary.node_partitions, 8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    registry: ElementRegistry,
    params: RebuildParams,
}

impl MeshBuilder {
    /// Create a builder that resolves shapes through `registry`.
    #[must_use]
    pub fn new(registry: ElementRegistry) -> Self {
        Self {
            registry,
            params: RebuildParams::default(),
        }
    }

    /// Replace the rebuild parameters.
    #[must_use]
    pub fn with_params(mut self, params: RebuildParams) -> Self {
        self.params = params;
        self
    }

    /// The rebuild parameters.
    #[must_use]
    pub fn params(&self) -> &RebuildParams {
        &self.params
    }

    /// The element registry.
    #[must_use]
    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Resolve the shape of every element.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Mesh`] for an unregistered element type.
    pub fn shapes(&self, mesh: &FeMesh) -> TopologyResult<ShapeTable> {
        Ok(self.registry.resolve(mesh)?)
    }

    /// Derive all topology from nodes and elements.
    ///
    /// 1. Clear faces, edges, and element slots
    /// 2. Resolve element neighbors
    /// 3. Re-derive or renumber element partitions
    /// 4. Synthesize faces with owners and neighbors
    /// 5. Partition the surface by smoothing angle
    /// 6. Synthesize edges and partition them into feature curves
    /// 7. Partition feature nodes and mark exterior nodes
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Mesh`] if an element type is not registered;
    /// the mesh is not modified in that case. With `strict_manifold`,
    /// returns [`TopologyError::NonManifoldAmbiguity`] after the pass that
    /// found the ambiguity, leaving the topology partially derived.
    pub fn rebuild(&self, mesh: &mut FeMesh) -> TopologyResult<RebuildSummary> {
        let shapes = self.shapes(mesh)?;
        let params = &self.params;

        mesh.clear_topology();

        let neighbors = update_element_neighbors(mesh, &shapes);
        self.check_manifold(neighbors.ambiguous, 0)?;
        let exterior_elements = mark_exterior_elements(mesh, &shapes);

        let element_partitions = if params.partition_elements {
            auto_partition_elements(mesh, &shapes)
        } else {
            update_element_partitions(mesh)
        };

        let faces = build_faces(mesh, &shapes);
        self.check_manifold(neighbors.ambiguous, faces.ambiguous_neighbors)?;

        let face_partitions =
            auto_partition_surface(mesh, params.smoothing_angle, params.crease_internal);
        let edges = build_edges(mesh);
        let edge_partitions = auto_partition_edges(mesh, params.feature_angle);
        let node_partitions = auto_partition_nodes(mesh);
        let exterior_nodes = mark_exterior_nodes(mesh);

        let summary = RebuildSummary {
            elements: mesh.element_count(),
            exterior_elements,
            faces: faces.faces,
            exterior_faces: faces.exterior,
            edges,
            exterior_nodes,
            element_partitions,
            face_partitions,
            edge_partitions,
            node_partitions,
            ambiguous_elements: neighbors.ambiguous,
            ambiguous_faces: faces.ambiguous_neighbors,
        };
        debug_assert!(summary.had_ambiguities() || crate::validate_topology(mesh).is_consistent());
        info!("{}", summary);
        Ok(summary)
    }

    fn check_manifold(&self, elements: usize, faces: usize) -> TopologyResult<()> {
        if self.params.strict_manifold && (elements > 0 || faces > 0) {
            warn!(
                "Aborting rebuild: {} ambiguous element slot(s), {} ambiguous face slot(s)",
                elements, faces
            );
            return Err(TopologyError::NonManifoldAmbiguity { elements, faces });
        }
        Ok(())
    }

    /// Renumber element partitions, resolve neighbors, and mark exterior
    /// elements.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Mesh`] for an unregistered element type.
    pub fn rebuild_element_data(&self, mesh: &mut FeMesh) -> TopologyResult<NeighborReport> {
        let shapes = self.shapes(mesh)?;
        update_element_partitions(mesh);
        let report = update_element_neighbors(mesh, &shapes);
        mark_exterior_elements(mesh, &shapes);
        Ok(report)
    }

    /// Re-derive face ownership and face neighbors.
    ///
    /// Returns the number of ambiguous face neighbor slots.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Mesh`] for an unregistered element type.
    pub fn rebuild_face_data(&self, mesh: &mut FeMesh) -> TopologyResult<usize> {
        let shapes = self.shapes(mesh)?;
        Ok(crate::rebuild_face_data(mesh, &shapes))
    }

    /// Re-derive beam ownership, exterior flags, and neighbors of edges.
    #[allow(clippy::unused_self)]
    pub fn rebuild_edge_data(&self, mesh: &mut FeMesh) {
        crate::rebuild_edge_data(mesh);
    }

    /// Re-mark exterior nodes. Returns the exterior node count.
    #[allow(clippy::unused_self)]
    pub fn rebuild_node_data(&self, mesh: &mut FeMesh) -> usize {
        mark_exterior_nodes(mesh)
    }

    /// Re-partition the surface, then re-derive edges and feature nodes.
    ///
    /// Returns the number of face partitions.
    pub fn auto_partition(&self, mesh: &mut FeMesh, smoothing_angle: f64) -> usize {
        let count = auto_partition_surface(mesh, smoothing_angle, true);
        self.repair_edges(mesh);
        count
    }

    /// Rebuild edges from the current face partitions, then feature curves
    /// and feature nodes.
    pub fn repair_edges(&self, mesh: &mut FeMesh) {
        build_edges(mesh);
        auto_partition_edges(mesh, self.params.feature_angle);
        auto_partition_nodes(mesh);
        self.rebuild_node_data(mesh);
    }
}
