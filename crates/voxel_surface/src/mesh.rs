//! Indexed triangle mesh accumulator with vertex deduplication.
//!
//! Vertices are deduplicated on exact (position, material) equality through a
//! hash map, so adjacent cubes that compute the same edge crossing share one
//! vertex. No tolerance is applied: the extractor computes shared crossings
//! from identical inputs, which makes them bit-identical.
//!
//! Extraction and [`SurfaceMesh::merge`] only ever append. The owner can
//! rebuild the mesh afterwards with [`SurfaceMesh::clear`] or
//! [`SurfaceMesh::remove_unused_vertices`].

use std::collections::HashMap;

use crate::error::{Result, VoxelError};
use crate::types::{MinMaxAABB, Vertex};
use crate::vector::{Vector3DFloat, Vector3DInt32};

/// Hash key: canonical bit pattern of the position plus material.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct VertexKey {
  position: [u32; 3],
  material: u16,
}

impl VertexKey {
  #[inline]
  fn new(position: Vector3DFloat, material: u16) -> Self {
    // +0.0 folds -0.0 into +0.0 so both land on the same key
    let bits = |v: f32| (v + 0.0).to_bits();
    Self {
      position: [bits(position.x()), bits(position.y()), bits(position.z())],
      material,
    }
  }
}

/// Triangle mesh produced by surface extraction.
#[derive(Clone, Debug, Default)]
pub struct SurfaceMesh {
  vertices: Vec<Vertex>,
  indices: Vec<u32>,
  lookup: HashMap<VertexKey, u32>,
  bounds: MinMaxAABB,
  offset: Vector3DInt32,
}

impl std::fmt::Debug for VertexKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("VertexKey")
      .field("position", &self.position.map(f32::from_bits))
      .field("material", &self.material)
      .finish()
  }
}

impl SurfaceMesh {
  pub fn new() -> Self {
    Self::default()
  }

  /// Preallocate room for `vertices` vertices and `indices` indices.
  pub fn with_capacity(vertices: usize, indices: usize) -> Self {
    Self {
      vertices: Vec::with_capacity(vertices),
      indices: Vec::with_capacity(indices),
      lookup: HashMap::with_capacity(vertices),
      bounds: MinMaxAABB::empty(),
      offset: Vector3DInt32::default(),
    }
  }

  /// Insert a vertex, reusing an existing one with the same position and
  /// material.
  ///
  /// When reused, the existing vertex's normal is kept. A vertex at the same
  /// position with a different material is added separately, preserving the
  /// hard material boundary.
  pub fn add_vertex(&mut self, position: Vector3DFloat, normal: Vector3DFloat, material: u16) -> u32 {
    let key = VertexKey::new(position, material);
    if let Some(&index) = self.lookup.get(&key) {
      return index;
    }

    let index = self.vertices.len() as u32;
    self.vertices.push(Vertex {
      position,
      normal,
      material,
    });
    self.bounds.encapsulate(position.to_array());
    self.lookup.insert(key, index);
    index
  }

  /// Append a triangle.
  ///
  /// Fails with [`VoxelError::InvalidIndex`] if any index was never returned
  /// by [`add_vertex`](Self::add_vertex); the mesh is left unchanged.
  pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) -> Result<()> {
    let vertex_count = self.no_of_vertices();
    for index in [i0, i1, i2] {
      if index >= vertex_count {
        return Err(VoxelError::InvalidIndex {
          index,
          vertex_count,
        });
      }
    }
    self.indices.extend_from_slice(&[i0, i1, i2]);
    Ok(())
  }

  /// Append every vertex and triangle of `other`, deduplicating vertices
  /// against this mesh and remapping the indices. The receiver's offset is
  /// kept.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "mesh::merge"))]
  pub fn merge(&mut self, other: &SurfaceMesh) -> Result<()> {
    let remap: Vec<u32> = other
      .vertices
      .iter()
      .map(|v| self.add_vertex(v.position, v.normal, v.material))
      .collect();

    for tri in other.indices.chunks_exact(3) {
      let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| remap[i as usize]);
      // Arbitrary input meshes can collapse under dedup
      if a == b || b == c || a == c {
        continue;
      }
      self.add_triangle(a, b, c)?;
    }
    Ok(())
  }

  /// Drop every vertex and index. The offset is kept.
  pub fn clear(&mut self) {
    self.vertices.clear();
    self.indices.clear();
    self.lookup.clear();
    self.bounds = MinMaxAABB::empty();
  }

  /// Remove vertices no triangle references, compacting the rest in their
  /// existing order and rewriting the indices. Returns the number removed.
  pub fn remove_unused_vertices(&mut self) -> usize {
    let mut used = vec![false; self.vertices.len()];
    for &index in &self.indices {
      used[index as usize] = true;
    }

    let removed = used.iter().filter(|u| !**u).count();
    if removed == 0 {
      return 0;
    }

    let mut remap = vec![u32::MAX; self.vertices.len()];
    let mut kept = Vec::with_capacity(self.vertices.len() - removed);
    for (old, vertex) in self.vertices.iter().enumerate() {
      if used[old] {
        remap[old] = kept.len() as u32;
        kept.push(*vertex);
      }
    }
    for index in &mut self.indices {
      *index = remap[*index as usize];
    }

    self.vertices = kept;
    self.lookup.clear();
    self.bounds = MinMaxAABB::empty();
    for (index, vertex) in self.vertices.iter().enumerate() {
      self.lookup.insert(VertexKey::new(vertex.position, vertex.material), index as u32);
      self.bounds.encapsulate(vertex.position.to_array());
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(removed, remaining = self.vertices.len(), "removed unused vertices");

    removed
  }

  /// Translation from mesh space to the caller's world space. Vertex
  /// positions are never rewritten by it.
  #[inline]
  pub fn offset(&self) -> Vector3DInt32 {
    self.offset
  }

  pub fn set_offset(&mut self, offset: Vector3DInt32) {
    self.offset = offset;
  }

  #[inline]
  pub fn no_of_vertices(&self) -> u32 {
    self.vertices.len() as u32
  }

  #[inline]
  pub fn no_of_indices(&self) -> usize {
    self.indices.len()
  }

  /// Number of triangles in the mesh.
  #[inline]
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
  }

  pub fn vertex(&self, index: u32) -> Option<&Vertex> {
    self.vertices.get(index as usize)
  }

  pub fn index(&self, position: usize) -> Option<u32> {
    self.indices.get(position).copied()
  }

  pub fn vertices(&self) -> &[Vertex] {
    &self.vertices
  }

  pub fn indices(&self) -> &[u32] {
    &self.indices
  }

  /// Triangles as index triples.
  pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
    self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
  }

  /// Bounding box encompassing all vertices.
  pub fn bounds(&self) -> MinMaxAABB {
    self.bounds
  }
}

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;
