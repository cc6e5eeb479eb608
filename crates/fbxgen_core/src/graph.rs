//! Node graph types: the input contract of a build.
//!
//! Every entity of a build batch lives in one [`NodeGraph`] arena and is
//! addressed by [`NodeId`]. Parent links and skin-binding targets are ids
//! into the same arena, so a parent may be added after its children.

use fbxgen_math::{compose_trs, DMat4, DVec2, DVec3, DVec4, RotationOrder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{
    ApertureFormat, ApertureMode, CameraFormat, LinkMode, MappingMode, ProjectionType,
    ReferenceMode, StereoRole,
};
use crate::material::Material;
use crate::property::Property;

/// Index of a node in its graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Structural problems in a node graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node \"{node}\" declares parent #{parent}, which is not part of this graph")]
    DanglingParent { node: String, parent: usize },

    #[error("Mesh \"{node}\" binds joint #{joint}, which is not part of this graph")]
    DanglingJoint { node: String, joint: usize },

    #[error("Node \"{node}\" is its own ancestor")]
    Cycle { node: String },
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Transform components of a transformable node.
///
/// Rotation is Euler angles in degrees, applied in `rotation_order`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Translation
    pub translation: DVec3,

    /// Rotation (Euler degrees)
    pub rotation: DVec3,

    /// Scale
    pub scale: DVec3,

    /// Order the rotation axes are applied in
    pub rotation_order: RotationOrder,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
            rotation_order: RotationOrder::EulerXYZ,
        }
    }
}

impl Transform {
    /// Create a new transform with only translation.
    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> DMat4 {
        compose_trs(
            self.translation,
            self.rotation,
            self.scale,
            self.rotation_order,
        )
    }
}

/// A skeletal joint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    /// Display size
    pub size: f64,

    /// Marks the skeletal root of a hierarchy
    pub is_root: bool,
}

impl Default for Joint {
    fn default() -> Self {
        Self {
            size: 1.0,
            is_root: false,
        }
    }
}

impl Joint {
    pub fn root() -> Self {
        Self {
            is_root: true,
            ..Default::default()
        }
    }
}

/// Unique coordinates plus a per-element mapping into them.
///
/// Used for normals (3D), UV sets (2D) and vertex colors (RGBA).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MappedCoordinates<T> {
    /// Set name, e.g. the UV set name
    pub name: String,

    /// Unique coordinates
    pub coordinates: Vec<T>,

    /// One index into `coordinates` per mapped geometry element
    pub point_mapping: Vec<usize>,
}

impl<T: Copy> MappedCoordinates<T> {
    pub fn new(name: impl Into<String>, coordinates: Vec<T>, point_mapping: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            coordinates,
            point_mapping,
        }
    }

    /// `coordinates[i]` for each `i` in `point_mapping`. Indices past the
    /// end are skipped; encoding rejects them before this is called.
    pub fn mapped_values(&self) -> Vec<T> {
        self.point_mapping
            .iter()
            .filter_map(|&i| self.coordinates.get(i).copied())
            .collect()
    }
}

/// Influence of one joint over some of a mesh's control points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkinBinding {
    /// A joint in the same graph
    pub target_joint: NodeId,

    /// (control point index, weight) pairs
    pub vertex_weights: Vec<(usize, f64)>,

    /// Weight normalization policy
    pub link_mode: LinkMode,
}

impl SkinBinding {
    pub fn new(target_joint: NodeId, vertex_weights: Vec<(usize, f64)>) -> Self {
        Self {
            target_joint,
            vertex_weights,
            link_mode: LinkMode::default(),
        }
    }
}

/// A polygon mesh with its attribute layers, materials and skinning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Control point positions
    pub points: Vec<DVec3>,

    /// Variable-length polygons of control point indices
    pub polygons: Vec<Vec<usize>>,

    /// Optional normals, mapped with the mesh-wide modes
    pub normals: Option<MappedCoordinates<DVec3>>,

    /// Named UV sets
    pub uvs: Vec<MappedCoordinates<DVec2>>,

    /// Named vertex color sets
    pub vertex_colors: Vec<MappedCoordinates<DVec4>>,

    /// Mesh-wide mapping mode
    pub mapping_mode: MappingMode,

    /// Mesh-wide reference mode
    pub reference_mode: ReferenceMode,

    /// Joint influences
    pub skinbinding: Vec<SkinBinding>,

    /// Materials with the polygons each one covers
    pub materials: Vec<(Material, Vec<usize>)>,
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            polygons: Vec::new(),
            normals: None,
            uvs: Vec::new(),
            vertex_colors: Vec::new(),
            mapping_mode: MappingMode::ByPolygonVertex,
            reference_mode: ReferenceMode::IndexToDirect,
            skinbinding: Vec::new(),
            materials: Vec::new(),
        }
    }
}

impl Mesh {
    pub fn new(points: Vec<DVec3>, polygons: Vec<Vec<usize>>) -> Self {
        Self {
            points,
            polygons,
            ..Default::default()
        }
    }

    /// Get the number of polygon-vertex occurrences.
    pub fn polygon_vertex_count(&self) -> usize {
        self.polygons.iter().map(Vec::len).sum()
    }
}

/// Camera intrinsics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub camera_format: CameraFormat,
    /// Field of view in degrees
    pub fov: f64,
    pub aperture_mode: ApertureMode,
    pub aperture_format: ApertureFormat,
    /// Millimetres
    pub focal_length: f64,
    pub focus_distance: f64,
    /// (near, far)
    pub clipping_range: (f64, f64),
    pub projection: ProjectionType,
    pub role: StereoRole,
    /// Only used with `ApertureFormat::Custom`
    pub aperture_width: f64,
    /// Only used with `ApertureFormat::Custom`
    pub aperture_height: f64,
    /// Only used with `ApertureFormat::Custom`
    pub squeeze_ratio: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            camera_format: CameraFormat::Pal,
            fov: 45.0,
            aperture_mode: ApertureMode::Vertical,
            aperture_format: ApertureFormat::FullAperture35mm,
            focal_length: 50.0,
            focus_distance: 10.0,
            clipping_range: (10.0, 1000.0),
            projection: ProjectionType::Perspective,
            role: StereoRole::Mono,
            aperture_width: 1.0,
            aperture_height: 1.0,
            squeeze_ratio: 1.0,
        }
    }
}

/// The concrete kind of a scene node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Transform-only node
    Null,
    Joint(Joint),
    Mesh(Box<Mesh>),
    Camera(Box<Camera>),
    /// A kind no encoder exists for; skipped with a warning
    Other(String),
}

impl NodeKind {
    pub fn kind_name(&self) -> &str {
        match self {
            NodeKind::Null => "Null",
            NodeKind::Joint(_) => "Joint",
            NodeKind::Mesh(_) => "Mesh",
            NodeKind::Camera(_) => "Camera",
            NodeKind::Other(name) => name,
        }
    }
}

/// One entity of a build batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Node name
    pub name: String,

    /// Parent in the same graph, or `None` for a top-level node
    pub parent: Option<NodeId>,

    /// Properties to set or create on the native node
    pub properties: Vec<Property>,

    /// Local transform
    pub transform: Transform,

    /// Concrete kind
    pub kind: NodeKind,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            parent: None,
            properties: Vec::new(),
            transform: Transform::default(),
            kind,
        }
    }

    pub fn null(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Null)
    }

    pub fn joint(name: impl Into<String>, joint: Joint) -> Self {
        Self::new(name, NodeKind::Joint(joint))
    }

    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self::new(name, NodeKind::Mesh(Box::new(mesh)))
    }

    pub fn camera(name: impl Into<String>, camera: Camera) -> Self {
        Self::new(name, NodeKind::Camera(Box::new(camera)))
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn as_joint(&self) -> Option<&Joint> {
        match &self.kind {
            NodeKind::Joint(joint) => Some(joint),
            _ => None,
        }
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(&**mesh),
            _ => None,
        }
    }
}

/// Ordered arena of the nodes in one build batch.
///
/// Insertion order is the order nodes are instantiated in; hierarchy comes
/// only from parent links.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeGraph {
    nodes: Vec<SceneNode>,
}

impl NodeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id.
    pub fn add(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Get a node by id.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    /// Link `child` under `parent`. Both may be added in any order.
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> GraphResult<()> {
        let len = self.nodes.len();
        let node = self.nodes.get_mut(child.0).ok_or(GraphError::DanglingParent {
            node: format!("#{}", child.0),
            parent: parent.0,
        })?;
        if parent.0 >= len {
            return Err(GraphError::DanglingParent {
                node: node.name.clone(),
                parent: parent.0,
            });
        }
        node.parent = Some(parent);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Joints flagged as skeletal roots, in insertion order.
    pub fn root_joints(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(|(_, n)| n.as_joint().is_some_and(|j| j.is_root))
            .map(|(id, _)| id)
    }

    /// Check that every parent link points into this graph and that the
    /// hierarchy has no cycles.
    pub fn validate(&self) -> GraphResult<()> {
        for node in &self.nodes {
            if let Some(parent) = node.parent {
                if parent.0 >= self.nodes.len() {
                    return Err(GraphError::DanglingParent {
                        node: node.name.clone(),
                        parent: parent.0,
                    });
                }
            }
            if let Some(mesh) = node.as_mesh() {
                for binding in &mesh.skinbinding {
                    if binding.target_joint.0 >= self.nodes.len() {
                        return Err(GraphError::DanglingJoint {
                            node: node.name.clone(),
                            joint: binding.target_joint.0,
                        });
                    }
                }
            }
        }

        for (id, node) in self.iter() {
            let mut cursor = node.parent;
            let mut steps = 0;
            while let Some(current) = cursor {
                if current == id || steps > self.nodes.len() {
                    return Err(GraphError::Cycle {
                        node: node.name.clone(),
                    });
                }
                cursor = self.nodes[current.0].parent;
                steps += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_creation() {
        let mut graph = NodeGraph::new();
        let root = graph.add(SceneNode::joint("A", Joint::root()));
        let child = graph.add(SceneNode::joint("B", Joint::default()).with_parent(root));

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.get(child).unwrap().parent, Some(root));
        assert_eq!(graph.root_joints().collect::<Vec<_>>(), vec![root]);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_forward_parent_reference() {
        let mut graph = NodeGraph::new();
        let child = graph.add(SceneNode::null("child"));
        let parent = graph.add(SceneNode::null("parent"));
        graph.set_parent(child, parent).unwrap();
        assert!(graph.validate().is_ok());
        assert!(graph.set_parent(child, NodeId(9)).is_err());
    }

    #[test]
    fn test_dangling_parent_detected() {
        let mut graph = NodeGraph::new();
        graph.add(SceneNode::null("orphan").with_parent(NodeId(3)));
        assert_eq!(
            graph.validate(),
            Err(GraphError::DanglingParent {
                node: "orphan".to_string(),
                parent: 3
            })
        );
    }

    #[test]
    fn test_dangling_joint_detected() {
        let mut graph = NodeGraph::new();
        let mut mesh = Mesh::new(vec![DVec3::ZERO; 3], vec![vec![0, 1, 2]]);
        mesh.skinbinding
            .push(SkinBinding::new(NodeId(7), vec![(0, 1.0)]));
        graph.add(SceneNode::mesh("skinned", mesh));
        assert!(matches!(
            graph.validate(),
            Err(GraphError::DanglingJoint { joint: 7, .. })
        ));
    }

    #[test]
    fn test_cycle_detected() {
        let mut graph = NodeGraph::new();
        let a = graph.add(SceneNode::null("a"));
        let b = graph.add(SceneNode::null("b").with_parent(a));
        graph.set_parent(a, b).unwrap();
        assert!(matches!(graph.validate(), Err(GraphError::Cycle { .. })));
    }

    #[test]
    fn test_mapped_values() {
        let uvs = MappedCoordinates::new(
            "map1",
            vec![DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::Y],
            vec![0, 3, 2, 2, 1, 0],
        );
        assert_eq!(
            uvs.mapped_values(),
            vec![DVec2::ZERO, DVec2::Y, DVec2::ONE, DVec2::ONE, DVec2::X, DVec2::ZERO]
        );
    }

    #[test]
    fn test_transform_matrix() {
        let transform = Transform {
            translation: DVec3::new(1.0, 2.0, 3.0),
            rotation: DVec3::new(0.0, 90.0, 0.0),
            scale: DVec3::splat(2.0),
            rotation_order: RotationOrder::EulerXYZ,
        };
        let p = transform.to_matrix().transform_point3(DVec3::X);
        // X scaled to 2, rotated about Y onto -Z, then translated
        assert!((p - DVec3::new(1.0, 2.0, 1.0)).length() < 1e-9);
    }

    #[test]
    fn test_mesh_defaults() {
        let mesh = Mesh::new(vec![DVec3::ZERO; 3], vec![vec![0, 1, 2]]);
        assert_eq!(mesh.mapping_mode, MappingMode::ByPolygonVertex);
        assert_eq!(mesh.reference_mode, ReferenceMode::IndexToDirect);
        assert_eq!(mesh.polygon_vertex_count(), 3);
    }
}
