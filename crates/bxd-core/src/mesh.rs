//! Node mesh geometry and the binary mesh writer collaborator

use std::collections::HashMap;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::math::Vector3;

/// Indexed triangle mesh owned by a rigid node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<[f32; 3]>,
    /// One normal per triangle
    #[serde(default)]
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

/// Physical dimensions of a mesh measured about a rotation axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    pub radius: f32,
    pub width: f32,
    pub center: Vector3,
}

impl Mesh {
    pub fn new(vertices: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            normals: Vec::new(),
            indices,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounding box, `None` for a mesh without vertices
    pub fn bounding_box(&self) -> Option<(Vector3, Vector3)> {
        if self.vertices.is_empty() {
            return None;
        }

        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }

        Some((min.into(), max.into()))
    }

    /// Measure radius, width and center of this mesh treated as a wheel
    /// spinning about `axis` through `base_point`.
    ///
    /// Returns `None` for an empty mesh or a degenerate axis.
    pub fn measure_wheel(&self, base_point: Vector3, axis: Vector3) -> Option<WheelGeometry> {
        let axis = axis.normalize()?;
        if self.vertices.is_empty() {
            return None;
        }

        let mut min_t = f32::MAX;
        let mut max_t = f32::MIN;
        let mut radius = 0.0_f32;
        for v in &self.vertices {
            let offset = Vector3::from(*v) - base_point;
            let t = offset.dot(axis);
            min_t = min_t.min(t);
            max_t = max_t.max(t);
            radius = radius.max((offset - axis * t).length());
        }

        Some(WheelGeometry {
            radius,
            width: max_t - min_t,
            center: base_point + axis * ((min_t + max_t) / 2.0),
        })
    }

    fn triangle_normal(&self, triangle: usize, v: [[f32; 3]; 3]) -> [f32; 3] {
        if let Some(n) = self.normals.get(triangle) {
            return *n;
        }

        let a = Vector3::from(v[0]);
        let cross = (Vector3::from(v[1]) - a).cross(Vector3::from(v[2]) - a);
        let n = cross.normalize().unwrap_or(Vector3::Z);
        [n.x, n.y, n.z]
    }
}

/// Load an STL file into an indexed mesh
pub fn load_stl(path: impl AsRef<Path>) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| MeshError::Io(e.to_string()))?;
    let mut reader = BufReader::new(file);

    let stl = stl_io::read_stl(&mut reader).map_err(|e| MeshError::Parse(e.to_string()))?;
    Ok(index_mesh(&stl))
}

/// Merge coincident STL vertices into an indexed mesh
fn index_mesh(stl: &stl_io::IndexedMesh) -> Mesh {
    let mut mesh = Mesh::default();
    let mut vertex_map: HashMap<[i32; 3], u32> = HashMap::new();

    const PRECISION: f32 = 10000.0;

    for face in &stl.faces {
        mesh.normals
            .push([face.normal[0], face.normal[1], face.normal[2]]);

        for &vertex_idx in &face.vertices {
            let vertex = stl.vertices[vertex_idx];
            let v = [vertex[0], vertex[1], vertex[2]];
            let key = [
                (v[0] * PRECISION) as i32,
                (v[1] * PRECISION) as i32,
                (v[2] * PRECISION) as i32,
            ];

            let index = *vertex_map.entry(key).or_insert_with(|| {
                mesh.vertices.push(v);
                (mesh.vertices.len() - 1) as u32
            });
            mesh.indices.push(index);
        }
    }

    mesh
}

/// Writes a node mesh to the binary payload that accompanies the skeleton file
pub trait MeshWriter {
    fn write_mesh(&mut self, mesh: &Mesh, dest: &Path) -> Result<(), MeshError>;
}

/// Binary STL mesh writer
#[derive(Debug, Clone, Copy, Default)]
pub struct StlMeshWriter;

impl StlMeshWriter {
    fn triangles(mesh: &Mesh) -> Result<Vec<stl_io::Triangle>, MeshError> {
        let vertex = |index: u32| {
            mesh.vertices
                .get(index as usize)
                .copied()
                .ok_or(MeshError::InvalidIndex {
                    index,
                    vertex_count: mesh.vertices.len(),
                })
        };

        mesh.indices
            .chunks_exact(3)
            .enumerate()
            .map(|(i, chunk)| {
                let v = [vertex(chunk[0])?, vertex(chunk[1])?, vertex(chunk[2])?];
                Ok(stl_io::Triangle {
                    normal: stl_io::Normal::new(mesh.triangle_normal(i, v)),
                    vertices: [
                        stl_io::Vertex::new(v[0]),
                        stl_io::Vertex::new(v[1]),
                        stl_io::Vertex::new(v[2]),
                    ],
                })
            })
            .collect()
    }
}

impl MeshWriter for StlMeshWriter {
    fn write_mesh(&mut self, mesh: &Mesh, dest: &Path) -> Result<(), MeshError> {
        let triangles = Self::triangles(mesh)?;

        let mut file = std::fs::File::create(dest).map_err(|e| MeshError::Io(e.to_string()))?;
        stl_io::write_stl(&mut file, triangles.iter())
            .map_err(|e| MeshError::Write(e.to_string()))?;

        tracing::debug!(
            "Wrote {} triangles to {}",
            triangles.len(),
            dest.display()
        );
        Ok(())
    }
}

/// Mesh-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Write error: {0}")]
    Write(String),
    #[error("Triangle index {index} out of range ({vertex_count} vertices)")]
    InvalidIndex { index: u32, vertex_count: usize },
}
