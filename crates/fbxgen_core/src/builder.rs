//! Build orchestration: turns a node graph into a native document.
//!
//! A build runs three passes over the graph, in insertion order:
//!
//! 1. **Instantiate** each node with its encoder, then apply its transform
//!    and author its properties.
//! 2. **Reparent** each instance under its parent's instance, or under the
//!    document root.
//! 3. **Link deformations** for every mesh with skin bindings.

use std::collections::HashMap;

use thiserror::Error;

use crate::authoring::{set_or_create_properties, PropertyError};
use crate::diagnostics::BuildWarning;
use crate::document::{DocNodeId, Document};
use crate::encode::{
    apply_transform, create_camera, create_joint, create_mesh, create_null, EncodeError,
};
use crate::export::{export_document, DocumentWriter, ExportError};
use crate::graph::{GraphError, NodeGraph, NodeId, NodeKind, SceneNode};
use crate::settings::Settings;
use crate::skin::{bind_skin, SkinError};

/// Name of the animation stack holding the declared layers.
pub const ROOT_STACK: &str = "RootStack";

/// Errors that abort a build.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Property error: {0}")]
    Property(#[from] PropertyError),

    #[error("Skin error: {0}")]
    Skin(#[from] SkinError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Parent of \"{node}\" was not instantiated")]
    MissingParent { node: String },
}

/// Result type for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Build a native document from a node graph.
pub fn build(graph: &NodeGraph, settings: &Settings) -> BuildResult<Document> {
    graph.validate()?;

    let mut doc = Document::new();
    apply_settings(&mut doc, settings);

    // Pass 1: instantiate
    log::debug!("Instantiating {} nodes", graph.len());
    let mut instances: HashMap<NodeId, DocNodeId> = HashMap::with_capacity(graph.len());
    let mut order = Vec::with_capacity(graph.len());
    for (id, node) in graph.iter() {
        let Some(doc_id) = instantiate(&mut doc, node)? else {
            continue;
        };
        apply_transform(&mut doc, doc_id, &node.transform);
        set_or_create_properties(&mut doc, doc_id, &node.properties)?;
        instances.insert(id, doc_id);
        order.push((id, doc_id, node));
    }

    // Pass 2: reparent
    log::debug!("Reparenting {} instances", order.len());
    let root = doc.root();
    for &(_, doc_id, node) in &order {
        let parent = match node.parent {
            None => root,
            Some(parent) => *instances
                .get(&parent)
                .ok_or_else(|| BuildError::MissingParent {
                    node: node.name.clone(),
                })?,
        };
        if !doc.add_child(parent, doc_id) {
            return Err(GraphError::Cycle {
                node: node.name.clone(),
            }
            .into());
        }
    }

    // Pass 3: link deformations
    for &(id, _, node) in &order {
        let skinned = node
            .as_mesh()
            .is_some_and(|mesh| !mesh.skinbinding.is_empty());
        if skinned {
            bind_skin(&mut doc, graph, &instances, id)?;
        }
    }

    log::info!(
        "Built document: {} nodes, {} poses, {} warnings",
        doc.node_count(),
        doc.poses().len(),
        doc.warnings().len()
    );
    Ok(doc)
}

fn apply_settings(doc: &mut Document, settings: &Settings) {
    let global = doc.global_settings_mut();
    global.axis_system = settings.axis;
    global.system_unit = settings.units;
    global.original_up_axis = settings.original_axis.map(|axis| axis.up);

    if !settings.anim_layers.is_empty() {
        let stack = doc.create_anim_stack(ROOT_STACK);
        doc.set_current_anim_stack(stack);
        for layer in &settings.anim_layers {
            doc.add_anim_layer(layer.as_str());
        }
    }
}

/// Run the encoder matching the node's kind. Unknown kinds are skipped with
/// a warning.
fn instantiate(doc: &mut Document, node: &SceneNode) -> BuildResult<Option<DocNodeId>> {
    let id = match &node.kind {
        NodeKind::Null => create_null(doc, &node.name),
        NodeKind::Joint(joint) => create_joint(doc, &node.name, joint),
        NodeKind::Mesh(mesh) => create_mesh(doc, &node.name, mesh)?,
        NodeKind::Camera(camera) => create_camera(doc, &node.name, camera),
        NodeKind::Other(kind) => {
            doc.warn(BuildWarning::UnknownNodeKind {
                node: node.name.clone(),
                kind: kind.clone(),
            });
            return Ok(None);
        }
    };
    Ok(Some(id))
}

/// Collects the nodes of one build batch together with its settings.
///
/// # Example
///
/// ```
/// use fbxgen_core::{Joint, SceneBuilder, SceneNode};
///
/// let mut builder = SceneBuilder::new();
/// builder.add(SceneNode::joint("hip", Joint::root()));
/// let doc = builder.build().unwrap();
/// assert!(doc.find_node("hip").is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct SceneBuilder {
    graph: NodeGraph,
    settings: Settings,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Add a node and return its id.
    pub fn add(&mut self, node: SceneNode) -> NodeId {
        self.graph.add(node)
    }

    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut NodeGraph {
        &mut self.graph
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn build(&self) -> BuildResult<Document> {
        build(&self.graph, &self.settings)
    }

    /// Build, hand the document to `writer`, then tear it down.
    ///
    /// Returns the writer's result.
    pub fn build_and_export<W>(&self, writer: &mut W) -> BuildResult<bool>
    where
        W: DocumentWriter + ?Sized,
    {
        let mut doc = self.build()?;
        Ok(export_document(writer, &mut doc, &self.settings)?)
    }
}
