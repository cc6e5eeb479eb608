//! Primitive encoders: one mapping per node kind onto native objects.
//!
//! Each encoder creates its native node in the [`Document`] unparented; the
//! orchestrator applies transforms, properties and hierarchy afterwards.

mod camera;
mod layer;
mod material;
mod mesh;

use thiserror::Error;

use crate::document::{
    DocNodeId, Document, MappingMode, NodeAttribute, SkeletonAttribute, SkeletonType,
};
use crate::graph::{Joint, Transform};

pub use camera::create_camera;
pub use layer::{validate_coordinate_mapping, write_layer_element};
pub use material::create_material;
pub use mesh::create_mesh;

/// Errors raised while encoding a node.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error("Unsupported mapping mode: `{mode:?}` for mesh `{mesh}`")]
    UnsupportedMappingMode { mesh: String, mode: MappingMode },

    #[error(
        "When using ByControlPoint, the `{attribute}` array of mesh `{mesh}` corresponds to each \
         vertex, so it must have {expected} entries (found {actual})"
    )]
    MappingLength {
        mesh: String,
        attribute: String,
        expected: usize,
        actual: usize,
    },

    #[error("`{attribute}` of mesh `{mesh}` is indexed, so its point mapping must be set")]
    EmptyMapping { mesh: String, attribute: String },

    #[error(
        "`{attribute}` of mesh `{mesh}` maps to coordinate {index}, but only {len} coordinates \
         were given"
    )]
    MappingOutOfRange {
        mesh: String,
        attribute: String,
        index: usize,
        len: usize,
    },

    #[error("Material `{material}` has no channel named `{channel}`")]
    UnknownMaterialChannel { material: String, channel: String },
}

/// Result type for encoding operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Create a transform-only node.
pub fn create_null(doc: &mut Document, name: &str) -> DocNodeId {
    doc.create_node(name, NodeAttribute::Null)
}

/// Create a limb-node skeleton node.
pub fn create_joint(doc: &mut Document, name: &str, joint: &Joint) -> DocNodeId {
    doc.create_node(
        name,
        NodeAttribute::Skeleton(SkeletonAttribute {
            skeleton_type: SkeletonType::LimbNode,
            size: joint.size,
        }),
    )
}

/// Write translation, rotation, scale and rotation order onto a node.
pub fn apply_transform(doc: &mut Document, id: DocNodeId, transform: &Transform) {
    if let Some(node) = doc.node_mut(id) {
        node.set_lcl_translation(transform.translation);
        node.set_lcl_rotation(transform.rotation);
        node.set_lcl_scaling(transform.scale);
        node.set_rotation_order(transform.rotation_order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbxgen_math::{DVec3, RotationOrder};

    #[test]
    fn test_create_joint_is_limb_node() {
        let mut doc = Document::new();
        let id = create_joint(&mut doc, "hip", &Joint { size: 2.5, is_root: true });
        let skeleton = doc.node(id).unwrap().skeleton().unwrap();
        assert_eq!(skeleton.skeleton_type, SkeletonType::LimbNode);
        assert_eq!(skeleton.size, 2.5);
        assert_eq!(doc.node(id).unwrap().parent(), None);
    }

    #[test]
    fn test_apply_transform() {
        let mut doc = Document::new();
        let id = create_null(&mut doc, "locator");
        let transform = Transform {
            translation: DVec3::new(1.0, 2.0, 3.0),
            rotation: DVec3::new(0.0, 45.0, 0.0),
            scale: DVec3::splat(0.5),
            rotation_order: RotationOrder::EulerZXY,
        };
        apply_transform(&mut doc, id, &transform);

        let node = doc.node(id).unwrap();
        assert_eq!(node.lcl_translation(), transform.translation);
        assert_eq!(node.lcl_rotation(), transform.rotation);
        assert_eq!(node.lcl_scaling(), transform.scale);
        assert_eq!(node.rotation_order(), RotationOrder::EulerZXY);
        assert!(node
            .local_transform()
            .abs_diff_eq(transform.to_matrix(), 1e-12));
    }
}
