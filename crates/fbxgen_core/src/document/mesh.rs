//! Native polygon mesh: control points, polygons, layer elements and skins.

use fbxgen_math::{DMat4, DVec2, DVec3, DVec4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::DocNodeId;

/// How layer element values are associated with the geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappingMode {
    None,
    ByControlPoint,
    ByPolygonVertex,
    ByPolygon,
    ByEdge,
    AllSame,
}

/// How layer element values are looked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceMode {
    /// One direct value per mapped element
    Direct,
    Index,
    /// Index array into a deduplicated direct array
    IndexToDirect,
}

/// Weight normalization policy of a skin cluster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkMode {
    Normalize,
    Additive,
    #[default]
    TotalOne,
}

/// A mapped, referenced attribute channel on a mesh.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayerElement<T> {
    pub name: String,
    pub mapping_mode: MappingMode,
    pub reference_mode: ReferenceMode,
    pub direct: Vec<T>,
    pub index: Vec<usize>,
}

impl<T: Copy> LayerElement<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mapping_mode: MappingMode::ByControlPoint,
            reference_mode: ReferenceMode::Direct,
            direct: Vec::new(),
            index: Vec::new(),
        }
    }

    /// Values per mapped element after applying the reference mode.
    ///
    /// Returns `None` if an index points past the direct array.
    pub fn resolved_values(&self) -> Option<Vec<T>> {
        match self.reference_mode {
            ReferenceMode::Direct => Some(self.direct.clone()),
            ReferenceMode::Index | ReferenceMode::IndexToDirect => self
                .index
                .iter()
                .map(|&i| self.direct.get(i).copied())
                .collect(),
        }
    }
}

/// Per-polygon material assignment. Indices refer to the owning node's
/// connected materials.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MaterialLayer {
    pub mapping_mode: MappingMode,
    pub reference_mode: ReferenceMode,
    pub index: Vec<usize>,
}

/// A weighted influence of one joint over a set of control points.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cluster {
    pub link: DocNodeId,
    pub link_mode: LinkMode,
    /// (control point index, weight) pairs, in insertion order
    pub weights: Vec<(usize, f64)>,
    /// Global transform of the skinned mesh at bind time
    pub transform: DMat4,
    /// Global transform of the linked joint at bind time
    pub transform_link: DMat4,
}

impl Cluster {
    pub fn new(link: DocNodeId, link_mode: LinkMode) -> Self {
        Self {
            link,
            link_mode,
            weights: Vec::new(),
            transform: DMat4::IDENTITY,
            transform_link: DMat4::IDENTITY,
        }
    }

    pub fn add_control_point_index(&mut self, index: usize, weight: f64) {
        self.weights.push((index, weight));
    }
}

/// Skin deformer holding one cluster per influencing joint.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Skin {
    pub name: String,
    pub clusters: Vec<Cluster>,
}

/// Problems found by [`MeshGeometry::validate_topology`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopologyError {
    #[error("Polygon {polygon} references control point {index}, but only {control_points} exist")]
    IndexOutOfRange {
        polygon: usize,
        index: usize,
        control_points: usize,
    },

    #[error("Polygon {polygon} has {count} vertices, at least 3 are required")]
    Degenerate { polygon: usize, count: usize },

    #[error("A polygon was begun but never ended")]
    OpenPolygon,
}

/// Native polygon mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MeshGeometry {
    control_points: Vec<DVec3>,
    polygon_starts: Vec<usize>,
    polygon_vertices: Vec<usize>,
    open_polygon: Option<usize>,
    normals: Option<LayerElement<DVec3>>,
    uvs: Vec<LayerElement<DVec2>>,
    vertex_colors: Vec<LayerElement<DVec4>>,
    active_vertex_colors: Option<usize>,
    materials: Option<MaterialLayer>,
    skins: Vec<Skin>,
}

impl MeshGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize the control point array, filling with the origin.
    pub fn init_control_points(&mut self, count: usize) {
        self.control_points = vec![DVec3::ZERO; count];
    }

    /// Write a control point. Out-of-range writes grow the array.
    pub fn set_control_point(&mut self, index: usize, point: DVec3) {
        if index >= self.control_points.len() {
            self.control_points.resize(index + 1, DVec3::ZERO);
        }
        self.control_points[index] = point;
    }

    pub fn control_points(&self) -> &[DVec3] {
        &self.control_points
    }

    pub fn control_point_count(&self) -> usize {
        self.control_points.len()
    }

    /// Open a new polygon, closing any polygon still open.
    pub fn begin_polygon(&mut self) {
        self.end_polygon();
        self.open_polygon = Some(self.polygon_vertices.len());
    }

    /// Append a vertex to the open polygon, opening one if needed.
    pub fn add_polygon_vertex(&mut self, control_point: usize) {
        if self.open_polygon.is_none() {
            self.open_polygon = Some(self.polygon_vertices.len());
        }
        self.polygon_vertices.push(control_point);
    }

    pub fn end_polygon(&mut self) {
        if let Some(start) = self.open_polygon.take() {
            self.polygon_starts.push(start);
        }
    }

    pub fn polygon_count(&self) -> usize {
        self.polygon_starts.len()
    }

    /// Vertex indices of a closed polygon.
    pub fn polygon(&self, index: usize) -> Option<&[usize]> {
        let start = *self.polygon_starts.get(index)?;
        let end = self
            .polygon_starts
            .get(index + 1)
            .copied()
            .or(self.open_polygon)
            .unwrap_or(self.polygon_vertices.len());
        self.polygon_vertices.get(start..end)
    }

    pub fn face_vertex_counts(&self) -> Vec<usize> {
        (0..self.polygon_count())
            .map(|i| self.polygon(i).map_or(0, <[usize]>::len))
            .collect()
    }

    /// Flattened vertex indices of all closed polygons.
    pub fn face_vertex_indices(&self) -> Vec<usize> {
        (0..self.polygon_count())
            .filter_map(|i| self.polygon(i))
            .flatten()
            .copied()
            .collect()
    }

    /// Total number of polygon-vertex occurrences.
    pub fn polygon_vertex_count(&self) -> usize {
        self.face_vertex_counts().iter().sum()
    }

    pub fn validate_topology(&self) -> Result<(), TopologyError> {
        if self.open_polygon.is_some() {
            return Err(TopologyError::OpenPolygon);
        }
        for polygon in 0..self.polygon_count() {
            let vertices = self.polygon(polygon).unwrap_or(&[]);
            if vertices.len() < 3 {
                return Err(TopologyError::Degenerate {
                    polygon,
                    count: vertices.len(),
                });
            }
            if let Some(&index) = vertices.iter().find(|&&i| i >= self.control_points.len()) {
                return Err(TopologyError::IndexOutOfRange {
                    polygon,
                    index,
                    control_points: self.control_points.len(),
                });
            }
        }
        Ok(())
    }

    /// Create (or replace) the normal layer.
    pub fn create_normal_layer(&mut self) -> &mut LayerElement<DVec3> {
        self.normals.insert(LayerElement::new(""))
    }

    pub fn normals(&self) -> Option<&LayerElement<DVec3>> {
        self.normals.as_ref()
    }

    pub fn create_uv_layer(&mut self, name: impl Into<String>) -> &mut LayerElement<DVec2> {
        self.uvs.push(LayerElement::new(name));
        let last = self.uvs.len() - 1;
        &mut self.uvs[last]
    }

    pub fn uv_layers(&self) -> &[LayerElement<DVec2>] {
        &self.uvs
    }

    pub fn uv_layer(&self, name: &str) -> Option<&LayerElement<DVec2>> {
        self.uvs.iter().find(|uv| uv.name == name)
    }

    /// Create a vertex color layer. The newest layer becomes the active one.
    pub fn create_vertex_color_layer(
        &mut self,
        name: impl Into<String>,
    ) -> &mut LayerElement<DVec4> {
        self.vertex_colors.push(LayerElement::new(name));
        let last = self.vertex_colors.len() - 1;
        self.active_vertex_colors = Some(last);
        &mut self.vertex_colors[last]
    }

    pub fn vertex_color_layers(&self) -> &[LayerElement<DVec4>] {
        &self.vertex_colors
    }

    /// The color set consumers treat as the default one.
    pub fn active_vertex_colors(&self) -> Option<&LayerElement<DVec4>> {
        self.active_vertex_colors
            .and_then(|i| self.vertex_colors.get(i))
    }

    pub fn create_material_layer(&mut self) -> &mut MaterialLayer {
        self.materials.insert(MaterialLayer {
            mapping_mode: MappingMode::ByPolygon,
            reference_mode: ReferenceMode::IndexToDirect,
            index: Vec::new(),
        })
    }

    pub fn material_layer(&self) -> Option<&MaterialLayer> {
        self.materials.as_ref()
    }

    pub fn add_skin(&mut self, skin: Skin) {
        self.skins.push(skin);
    }

    pub fn skins(&self) -> &[Skin] {
        &self.skins
    }
}
