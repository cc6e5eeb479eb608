//! FBXGen Core - Scene authoring for FBX-style interchange documents.
//!
//! This crate provides:
//!
//! - **Node graph types**: `NodeGraph`, `SceneNode`, `Mesh`, `Joint`, `Camera`
//! - **Native document model**: `Document` with nodes, layers, poses and animation
//! - **Build orchestration**: `build` and `SceneBuilder`
//! - **Export hand-off**: the `DocumentWriter` collaborator trait
//!
//! # Example
//!
//! ```ignore
//! use fbxgen_core::{Mesh, SceneBuilder, SceneNode, Settings};
//!
//! let mut builder = SceneBuilder::new().with_settings(Settings::default());
//! builder.add(SceneNode::mesh("plane", mesh));
//! let doc = builder.build()?;
//! println!("Built {} nodes", doc.node_count());
//! ```

pub mod authoring;
pub mod builder;
pub mod diagnostics;
pub mod document;
pub mod encode;
pub mod export;
pub mod graph;
pub mod material;
pub mod property;
pub mod settings;
pub mod skin;

// Re-export commonly used types
pub use authoring::{set_or_create_properties, PropertyError};
pub use builder::{build, BuildError, BuildResult, SceneBuilder};
pub use diagnostics::BuildWarning;
pub use document::{DocNodeId, Document, LinkMode, MappingMode, ReferenceMode};
pub use encode::EncodeError;
pub use export::{export_document, DocumentWriter, ExportError};
pub use graph::{
    Camera, GraphError, Joint, MappedCoordinates, Mesh, NodeGraph, NodeId, NodeKind, SceneNode,
    SkinBinding, Transform,
};
pub use material::{LambertMaterial, Material, PhongMaterial, TextureChannel};
pub use property::{AnimationCurve, DataType, FrameRate, Property, PropertyValue, Time};
pub use settings::{AxisSystem, FileFormat, Settings, SystemUnit};
pub use skin::SkinError;
