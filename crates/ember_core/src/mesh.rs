//! Triangle batches handed to the renderer by external loaders.
//!
//! A mesh is a flat list of vertex positions, optional per-vertex UVs and a
//! triangle index list. The renderer turns each indexed triangle into its own
//! primitive.

use ember_math::{Aabb, Vec3};

use crate::{CoreError, Result};

/// A mesh consisting of vertex positions, optional UVs, and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// UV coordinates (optional - one [u, v] per vertex)
    pub uvs: Option<Vec<[f32; 2]>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and indices.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self::new_with_uvs(positions, indices, None)
    }

    /// Create a new mesh with UV coordinates.
    pub fn new_with_uvs(positions: Vec<Vec3>, indices: Vec<u32>, uvs: Option<Vec<[f32; 2]>>) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            uvs,
            indices,
            bounds,
        }
    }

    /// Check index ranges and UV counts.
    ///
    /// Loaders call this once so the renderer can index without checks.
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(CoreError::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }

        let vertex_count = self.positions.len();
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(CoreError::InvalidMesh(format!(
                "index {} out of range for {} vertices",
                bad, vertex_count
            )));
        }

        if let Some(uvs) = &self.uvs {
            if uvs.len() != vertex_count {
                return Err(CoreError::InvalidMesh(format!(
                    "{} uvs for {} vertices",
                    uvs.len(),
                    vertex_count
                )));
            }
        }

        Ok(())
    }

    /// Get number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex positions and UVs of triangle `n`.
    ///
    /// Vertices without UVs get the corners (0,0), (1,0), (0,1).
    pub fn triangle(&self, n: usize) -> ([Vec3; 3], [[f32; 2]; 3]) {
        let idx = [
            self.indices[3 * n] as usize,
            self.indices[3 * n + 1] as usize,
            self.indices[3 * n + 2] as usize,
        ];
        let positions = idx.map(|i| self.positions[i]);
        let uvs = match &self.uvs {
            Some(uvs) => idx.map(|i| uvs[i]),
            None => [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
        };
        (positions, uvs)
    }

    /// Compute axis-aligned bounding box from positions.
    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        if positions.is_empty() {
            return Aabb::EMPTY;
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for pos in positions {
            min = min.min(*pos);
            max = max.max(*pos);
        }

        Aabb::from_points(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Mesh {
        Mesh::new_with_uvs(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
            Some(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
        )
    }

    #[test]
    fn test_mesh_bounds() {
        let mesh = unit_square();
        assert_eq!(mesh.bounds.x.min, 0.0);
        assert_eq!(mesh.bounds.y.max, 1.0);
        // Flat in z, so padded
        assert!(mesh.bounds.z.size() > 0.0);
    }

    #[test]
    fn test_triangle_access() {
        let mesh = unit_square();
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.triangle_count(), 2);

        let (positions, uvs) = mesh.triangle(1);
        assert_eq!(positions[1], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(uvs[2], [0.0, 1.0]);
    }

    #[test]
    fn test_validate_rejects_bad_indices() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 3]);
        assert!(matches!(mesh.validate(), Err(CoreError::InvalidMesh(_))));

        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1]);
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_uv_count_mismatch() {
        let mesh = Mesh::new_with_uvs(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![0, 1, 2],
            Some(vec![[0.0, 0.0]]),
        );
        assert!(mesh.validate().is_err());
    }
}
