//! The native scene document.
//!
//! A [`Document`] owns every native object a build produces: the node tree
//! under a root node, geometry and attributes, animation stacks, poses,
//! materials and textures. It is the only thing the build orchestrator
//! mutates, and it is what the writer collaborator receives.

mod camera;
mod material;
mod mesh;
mod props;

use fbxgen_math::{compose_trs, DMat4, DVec3, RotationOrder};
use serde::Serialize;

use crate::diagnostics::BuildWarning;
use crate::property::PropertyValue;
use crate::settings::{AxisSystem, SystemUnit, UpVector};

pub use camera::*;
pub use material::*;
pub use mesh::*;
pub use props::*;

/// Index of a node in its document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DocNodeId(pub(crate) usize);

impl DocNodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node is, beyond its transform.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum NodeAttribute {
    Root,
    Null,
    Skeleton(SkeletonAttribute),
    Mesh(Box<MeshGeometry>),
    Camera(Box<CameraAttribute>),
}

/// A node of the native scene tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DocNode {
    pub name: String,
    pub attribute: NodeAttribute,
    pub properties: PropertyTable,
    parent: Option<DocNodeId>,
    children: Vec<DocNodeId>,
    materials: Vec<MaterialId>,
}

impl DocNode {
    fn new(name: impl Into<String>, attribute: NodeAttribute) -> Self {
        Self {
            name: name.into(),
            attribute,
            properties: PropertyTable::node_defaults(),
            parent: None,
            children: Vec::new(),
            materials: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<DocNodeId> {
        self.parent
    }

    pub fn children(&self) -> &[DocNodeId] {
        &self.children
    }

    pub fn materials(&self) -> &[MaterialId] {
        &self.materials
    }

    pub fn add_material(&mut self, material: MaterialId) {
        self.materials.push(material);
    }

    pub fn mesh(&self) -> Option<&MeshGeometry> {
        match &self.attribute {
            NodeAttribute::Mesh(mesh) => Some(&**mesh),
            _ => None,
        }
    }

    pub fn mesh_mut(&mut self) -> Option<&mut MeshGeometry> {
        match &mut self.attribute {
            NodeAttribute::Mesh(mesh) => Some(&mut **mesh),
            _ => None,
        }
    }

    pub fn skeleton(&self) -> Option<&SkeletonAttribute> {
        match &self.attribute {
            NodeAttribute::Skeleton(skeleton) => Some(skeleton),
            _ => None,
        }
    }

    pub fn camera(&self) -> Option<&CameraAttribute> {
        match &self.attribute {
            NodeAttribute::Camera(camera) => Some(&**camera),
            _ => None,
        }
    }

    fn set_double3(&mut self, name: &str, value: DVec3) {
        if let Some(property) = self.properties.find_mut(name) {
            property.value = PropertyValue::Double3(value);
        }
    }

    fn double3(&self, name: &str, fallback: DVec3) -> DVec3 {
        self.properties
            .find(name)
            .and_then(DocProperty::as_dvec3)
            .unwrap_or(fallback)
    }

    pub fn set_lcl_translation(&mut self, value: DVec3) {
        self.set_double3("LclTranslation", value);
    }

    pub fn set_lcl_rotation(&mut self, value: DVec3) {
        self.set_double3("LclRotation", value);
    }

    pub fn set_lcl_scaling(&mut self, value: DVec3) {
        self.set_double3("LclScaling", value);
    }

    pub fn lcl_translation(&self) -> DVec3 {
        self.double3("LclTranslation", DVec3::ZERO)
    }

    /// Euler angles in degrees.
    pub fn lcl_rotation(&self) -> DVec3 {
        self.double3("LclRotation", DVec3::ZERO)
    }

    pub fn lcl_scaling(&self) -> DVec3 {
        self.double3("LclScaling", DVec3::ONE)
    }

    pub fn set_rotation_order(&mut self, order: RotationOrder) {
        if let Some(property) = self.properties.find_mut("RotationOrder") {
            property.value = PropertyValue::Int(order.index());
        }
    }

    pub fn rotation_order(&self) -> RotationOrder {
        match self.properties.find("RotationOrder").map(|p| &p.value) {
            Some(PropertyValue::Int(i)) => RotationOrder::from_index(*i).unwrap_or_default(),
            _ => RotationOrder::default(),
        }
    }

    /// Local matrix from the node's transform properties.
    pub fn local_transform(&self) -> DMat4 {
        compose_trs(
            self.lcl_translation(),
            self.lcl_rotation(),
            self.lcl_scaling(),
            self.rotation_order(),
        )
    }
}

/// Document-wide coordinate system and unit.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GlobalSettings {
    pub axis_system: AxisSystem,
    pub original_up_axis: Option<UpVector>,
    pub system_unit: SystemUnit,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnimLayer {
    pub name: String,
}

/// A named take grouping animation layers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnimStack {
    pub name: String,
    pub layers: Vec<AnimLayer>,
}

/// One node's matrix in a pose.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PoseEntry {
    pub node: DocNodeId,
    pub matrix: DMat4,
    /// True if `matrix` is a local transform, false if global
    pub local: bool,
}

/// A bind pose or rest pose.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Pose {
    pub name: String,
    pub is_bind_pose: bool,
    entries: Vec<PoseEntry>,
}

impl Pose {
    pub fn new(name: impl Into<String>, is_bind_pose: bool) -> Self {
        Self {
            name: name.into(),
            is_bind_pose,
            entries: Vec::new(),
        }
    }

    /// Record `node`'s matrix. A node already in the pose keeps its first
    /// entry; the index of the node's entry is returned either way.
    pub fn add(&mut self, node: DocNodeId, matrix: DMat4, local: bool) -> usize {
        if let Some(i) = self.entries.iter().position(|e| e.node == node) {
            return i;
        }
        self.entries.push(PoseEntry {
            node,
            matrix,
            local,
        });
        self.entries.len() - 1
    }

    pub fn entries(&self) -> &[PoseEntry] {
        &self.entries
    }

    pub fn entry(&self, node: DocNodeId) -> Option<&PoseEntry> {
        self.entries.iter().find(|e| e.node == node)
    }

    pub fn contains(&self, node: DocNodeId) -> bool {
        self.entry(node).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The native scene document produced by a build.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Document {
    nodes: Vec<DocNode>,
    global_settings: GlobalSettings,
    anim_stacks: Vec<AnimStack>,
    current_anim_stack: Option<usize>,
    poses: Vec<Pose>,
    materials: Vec<SurfaceMaterial>,
    textures: Vec<FileTexture>,
    warnings: Vec<BuildWarning>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only its root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![DocNode::new("RootNode", NodeAttribute::Root)],
            global_settings: GlobalSettings::default(),
            anim_stacks: Vec::new(),
            current_anim_stack: None,
            poses: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn root(&self) -> DocNodeId {
        DocNodeId(0)
    }

    /// Create an unparented node.
    pub fn create_node(&mut self, name: impl Into<String>, attribute: NodeAttribute) -> DocNodeId {
        self.nodes.push(DocNode::new(name, attribute));
        DocNodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: DocNodeId) -> Option<&DocNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: DocNodeId) -> Option<&mut DocNode> {
        self.nodes.get_mut(id.0)
    }

    /// All nodes, root first, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (DocNodeId, &DocNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (DocNodeId(i), n))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// First node named `name`.
    pub fn find_node(&self, name: &str) -> Option<DocNodeId> {
        self.nodes.iter().position(|n| n.name == name).map(DocNodeId)
    }

    /// Attach `child` under `parent`, detaching it from any previous parent.
    ///
    /// Returns false and leaves the tree untouched if either id is unknown
    /// or the link would make `child` its own ancestor.
    pub fn add_child(&mut self, parent: DocNodeId, child: DocNodeId) -> bool {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() {
            return false;
        }
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return false;
            }
            cursor = self.nodes[id.0].parent;
        }

        if let Some(old) = self.nodes[child.0].parent {
            self.nodes[old.0].children.retain(|&c| c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        true
    }

    /// Slash-separated path from the root's children down to `id`.
    pub fn node_path(&self, id: DocNodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.root() {
                break;
            }
            let node = self.node(current)?;
            names.push(node.name.as_str());
            cursor = node.parent;
        }
        names.reverse();
        Some(names.join("/"))
    }

    pub fn global_settings(&self) -> &GlobalSettings {
        &self.global_settings
    }

    pub fn global_settings_mut(&mut self) -> &mut GlobalSettings {
        &mut self.global_settings
    }

    /// Create an animation stack and return its index.
    pub fn create_anim_stack(&mut self, name: impl Into<String>) -> usize {
        self.anim_stacks.push(AnimStack {
            name: name.into(),
            layers: Vec::new(),
        });
        self.anim_stacks.len() - 1
    }

    pub fn set_current_anim_stack(&mut self, stack: usize) {
        if stack < self.anim_stacks.len() {
            self.current_anim_stack = Some(stack);
        }
    }

    pub fn current_anim_stack(&self) -> Option<&AnimStack> {
        self.current_anim_stack.and_then(|i| self.anim_stacks.get(i))
    }

    pub fn anim_stacks(&self) -> &[AnimStack] {
        &self.anim_stacks
    }

    /// Add a layer to the current animation stack.
    pub fn add_anim_layer(&mut self, name: impl Into<String>) -> Option<AnimLayerRef> {
        let stack = self.current_anim_stack?;
        let layers = &mut self.anim_stacks[stack].layers;
        layers.push(AnimLayer { name: name.into() });
        Some(AnimLayerRef {
            stack,
            layer: layers.len() - 1,
        })
    }

    /// Find a layer by name on the current animation stack.
    pub fn find_anim_layer(&self, name: &str) -> Option<AnimLayerRef> {
        let stack = self.current_anim_stack?;
        let layer = self.anim_stacks[stack]
            .layers
            .iter()
            .position(|l| l.name == name)?;
        Some(AnimLayerRef { stack, layer })
    }

    pub fn add_pose(&mut self, pose: Pose) {
        self.poses.push(pose);
    }

    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    pub fn find_pose(&self, name: &str) -> Option<&Pose> {
        self.poses.iter().find(|p| p.name == name)
    }

    pub fn add_material(&mut self, material: SurfaceMaterial) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn material(&self, id: MaterialId) -> Option<&SurfaceMaterial> {
        self.materials.get(id.0)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut SurfaceMaterial> {
        self.materials.get_mut(id.0)
    }

    pub fn materials(&self) -> &[SurfaceMaterial] {
        &self.materials
    }

    pub fn add_texture(&mut self, texture: FileTexture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    pub fn texture(&self, id: TextureId) -> Option<&FileTexture> {
        self.textures.get(id.0)
    }

    /// Log an advisory diagnostic and keep it on the document.
    pub fn warn(&mut self, warning: BuildWarning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    /// Local matrix of a node, identity for unknown ids.
    pub fn local_transform(&self, id: DocNodeId) -> DMat4 {
        self.node(id)
            .map_or(DMat4::IDENTITY, DocNode::local_transform)
    }

    /// Global matrix of a node: its local matrix composed up the parent chain.
    pub fn global_transform(&self, id: DocNodeId) -> DMat4 {
        let mut matrix = DMat4::IDENTITY;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.node(current) else {
                break;
            };
            matrix = node.local_transform() * matrix;
            cursor = node.parent;
        }
        matrix
    }

    /// Tear the document down to a fresh, empty state.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Pretty JSON rendering of the whole document, for debugging and
    /// golden comparisons.
    pub fn to_json_snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn null(doc: &mut Document, name: &str, translation: DVec3) -> DocNodeId {
        let id = doc.create_node(name, NodeAttribute::Null);
        doc.node_mut(id).unwrap().set_lcl_translation(translation);
        id
    }

    #[test]
    fn test_new_document_has_root() {
        let doc = Document::new();
        assert_eq!(doc.node_count(), 1);
        assert_eq!(doc.node(doc.root()).unwrap().name, "RootNode");
        assert!(doc.current_anim_stack().is_none());
    }

    #[test]
    fn test_add_child_reparents() {
        let mut doc = Document::new();
        let a = null(&mut doc, "a", DVec3::ZERO);
        let b = null(&mut doc, "b", DVec3::ZERO);
        let root = doc.root();
        assert!(doc.add_child(root, a));
        assert!(doc.add_child(root, b));
        assert!(doc.add_child(a, b));
        assert_eq!(doc.node(root).unwrap().children(), &[a]);
        assert_eq!(doc.node(a).unwrap().children(), &[b]);
        assert_eq!(doc.node_path(b).as_deref(), Some("a/b"));
        // b is below a now, so a cannot go under b
        assert!(!doc.add_child(b, a));
    }

    #[test]
    fn test_global_transform_accumulates() {
        let mut doc = Document::new();
        let a = null(&mut doc, "a", DVec3::new(0.0, 40.0, 0.0));
        let b = null(&mut doc, "b", DVec3::new(0.0, 40.0, 0.0));
        let root = doc.root();
        doc.add_child(root, a);
        doc.add_child(a, b);

        let global = doc.global_transform(b);
        let origin = global.transform_point3(DVec3::ZERO);
        assert!((origin - DVec3::new(0.0, 80.0, 0.0)).length() < 1e-9);

        let local = doc.local_transform(b);
        let origin = local.transform_point3(DVec3::ZERO);
        assert!((origin - DVec3::new(0.0, 40.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_rotation_order_property() {
        let mut doc = Document::new();
        let a = null(&mut doc, "a", DVec3::ZERO);
        let node = doc.node_mut(a).unwrap();
        assert_eq!(node.rotation_order(), RotationOrder::EulerXYZ);
        node.set_rotation_order(RotationOrder::EulerZYX);
        assert_eq!(node.rotation_order(), RotationOrder::EulerZYX);
    }

    #[test]
    fn test_anim_layers_need_a_current_stack() {
        let mut doc = Document::new();
        assert!(doc.add_anim_layer("Base").is_none());
        let stack = doc.create_anim_stack("RootStack");
        doc.set_current_anim_stack(stack);
        let base = doc.add_anim_layer("Base").unwrap();
        assert_eq!(doc.find_anim_layer("Base"), Some(base));
        assert!(doc.find_anim_layer("Missing").is_none());
    }

    #[test]
    fn test_pose_keeps_first_entry() {
        let mut pose = Pose::new("bindpose", true);
        let id = DocNodeId(1);
        assert_eq!(pose.add(id, DMat4::IDENTITY, false), 0);
        let moved = DMat4::from_translation(DVec3::X);
        assert_eq!(pose.add(id, moved, false), 0);
        assert_eq!(pose.len(), 1);
        assert_eq!(pose.entry(id).unwrap().matrix, DMat4::IDENTITY);
    }

    #[test]
    fn test_clear_resets() {
        let mut doc = Document::new();
        null(&mut doc, "a", DVec3::ZERO);
        doc.add_pose(Pose::new("p", false));
        doc.clear();
        assert_eq!(doc, Document::new());
    }

    #[test]
    fn test_json_snapshot() {
        let mut doc = Document::new();
        null(&mut doc, "snapshot_null", DVec3::X);
        let json = doc.to_json_snapshot().unwrap();
        assert!(json.contains("snapshot_null"));
        assert!(json.contains("LclTranslation"));
    }
}
