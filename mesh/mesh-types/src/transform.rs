//! Placement of a mesh in the global frame.

use nalgebra::{Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maps mesh-local coordinates to global coordinates.
///
/// Applied in the order scale, rotate, translate. Attaching one mesh to
/// another maps positions through the source's `local_to_global` and then
/// the target's `global_to_local`.
///
/// # Example
///
/// ```
/// use mesh_types::{MeshTransform, Point3, Vector3};
///
/// let t = MeshTransform::from_translation(Vector3::new(1.0, 0.0, 0.0));
/// let p = t.local_to_global(&Point3::origin());
/// assert!((p.x - 1.0).abs() < 1e-12);
/// assert!((t.global_to_local(&p) - Point3::origin()).norm() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshTransform {
    /// Rotation.
    pub rotation: UnitQuaternion<f64>,
    /// Translation.
    pub translation: Vector3<f64>,
    /// Uniform scale.
    pub scale: f64,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl MeshTransform {
    /// Rotation followed by translation, unit scale.
    #[must_use]
    pub const fn new(rotation: UnitQuaternion<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
            scale: 1.0,
        }
    }

    /// The identity placement.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(UnitQuaternion::identity(), Vector3::zeros())
    }

    /// Pure translation.
    #[must_use]
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self::new(UnitQuaternion::identity(), translation)
    }

    /// Pure rotation.
    #[must_use]
    pub fn from_rotation(rotation: UnitQuaternion<f64>) -> Self {
        Self::new(rotation, Vector3::zeros())
    }

    /// Set the uniform scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Map a local point to the global frame.
    #[must_use]
    pub fn local_to_global(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * (point.coords * self.scale) + self.translation)
    }

    /// Map a global point into the local frame.
    ///
    /// A zero scale is treated as unit scale.
    #[must_use]
    pub fn global_to_local(&self, point: &Point3<f64>) -> Point3<f64> {
        let unrotated = self.rotation.inverse() * (point.coords - self.translation);
        let scale = if self.scale == 0.0 { 1.0 } else { self.scale };
        Point3::from(unrotated / scale)
    }

    /// Returns `true` if this is the identity within `epsilon`.
    #[must_use]
    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.rotation.angle().abs() < epsilon
            && self.translation.norm() < epsilon
            && (self.scale - 1.0).abs() < epsilon
    }
}
