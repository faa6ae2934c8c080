//! Element shape registry.

use hashbrown::HashMap;

use crate::shape::builtin_shape;
use crate::{ElementShape, ElementType, FeMesh, MeshError, MeshResult};

/// Maps element types to their topology tables.
///
/// The registry is an explicit value handed to whatever needs shape
/// information, so callers can restrict which element types an operation
/// accepts. [`ElementRegistry::standard`] registers every built-in type.
///
/// # Example
///
/// ```
/// use mesh_types::{ElementRegistry, ElementType};
///
/// let registry = ElementRegistry::standard().without(ElementType::Tet20);
/// assert!(registry.shape(ElementType::Hex8).is_ok());
/// assert!(registry.shape(ElementType::Tet20).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ElementRegistry {
    shapes: HashMap<ElementType, &'static ElementShape>,
}

impl ElementRegistry {
    /// Create a registry with no element types.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            shapes: HashMap::new(),
        }
    }

    /// Create a registry containing every built-in element type.
    #[must_use]
    pub fn standard() -> Self {
        ElementType::ALL
            .into_iter()
            .fold(Self::empty(), Self::with)
    }

    /// Register the built-in shape for `element_type`.
    #[must_use]
    pub fn with(mut self, element_type: ElementType) -> Self {
        self.shapes.insert(element_type, builtin_shape(element_type));
        self
    }

    /// Remove `element_type` from the registry.
    #[must_use]
    pub fn without(mut self, element_type: ElementType) -> Self {
        self.shapes.remove(&element_type);
        self
    }

    /// Returns `true` if `element_type` is registered.
    #[must_use]
    pub fn contains(&self, element_type: ElementType) -> bool {
        self.shapes.contains_key(&element_type)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Look up the shape of `element_type`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::UnsupportedElementType`] if the type is not registered.
    pub fn shape(&self, element_type: ElementType) -> MeshResult<&'static ElementShape> {
        self.shapes
            .get(&element_type)
            .copied()
            .ok_or(MeshError::UnsupportedElementType {
                element_type,
                operation: "shape lookup",
            })
    }

    /// Resolve the shape of every element in `mesh`.
    ///
    /// Either every element resolves or nothing is returned, so callers can
    /// resolve up front and mutate afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::UnsupportedElementType`] for the first element
    /// whose type is not registered.
    pub fn resolve(&self, mesh: &FeMesh) -> MeshResult<ShapeTable> {
        let shapes = mesh
            .elements
            .iter()
            .map(|el| self.shape(el.element_type))
            .collect::<MeshResult<Vec<_>>>()?;
        Ok(ShapeTable { shapes })
    }
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Per-element shapes resolved from a registry, indexed like `mesh.elements`.
#[derive(Debug, Clone, Default)]
pub struct ShapeTable {
    shapes: Vec<&'static ElementShape>,
}

impl ShapeTable {
    /// Shape of element `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> &'static ElementShape {
        self.shapes[index]
    }

    /// Number of resolved elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if no elements were resolved.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Point3;

    #[test]
    fn standard_registers_everything() {
        let reg = ElementRegistry::standard();
        assert_eq!(reg.len(), ElementType::ALL.len());
        assert!(ElementType::ALL.iter().all(|&t| reg.contains(t)));
    }

    #[test]
    fn resolve_fails_on_unregistered_type() {
        let mut mesh = FeMesh::new();
        for i in 0..4 {
            mesh.add_node(Point3::new(f64::from(i), 0.0, 0.0));
        }
        mesh.add_element(ElementType::Quad4, &[0, 1, 2, 3]).unwrap();

        let reg = ElementRegistry::empty().with(ElementType::Hex8);
        let err = reg.resolve(&mesh).unwrap_err();
        assert!(matches!(
            err,
            MeshError::UnsupportedElementType {
                element_type: ElementType::Quad4,
                ..
            }
        ));

        let table = ElementRegistry::standard().resolve(&mesh).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0).element_type, ElementType::Quad4);
    }
}
