//! Skin binding resolver: bind pose, rest pose and weighted clusters.

use std::collections::HashMap;

use thiserror::Error;

use crate::document::{Cluster, DocNodeId, Document, Pose, Skin};
use crate::graph::{NodeGraph, NodeId};

/// Errors raised while resolving skin bindings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkinError {
    #[error("No root joint found or defined for skinned mesh \"{mesh}\"")]
    NoRootJoint { mesh: String },

    #[error("Target joint #{joint} of skin binding on \"{mesh}\" was not instantiated as a joint")]
    UnresolvedJoint { mesh: String, joint: usize },

    #[error("Skinned node #{0} is not an instantiated mesh")]
    NotAMesh(usize),
}

/// Result type for skin binding.
pub type SkinResult<T> = Result<T, SkinError>;

/// Bind a mesh to its joints.
///
/// `instances` maps graph nodes to the native nodes produced for them. The
/// rest pose holds the root joint's global matrix plus the local matrix of
/// every other bound joint; the bind pose holds the global matrix of every
/// bound joint. Weights are passed through as given.
pub fn bind_skin(
    doc: &mut Document,
    graph: &NodeGraph,
    instances: &HashMap<NodeId, DocNodeId>,
    mesh: NodeId,
) -> SkinResult<()> {
    let source = graph.get(mesh).ok_or(SkinError::NotAMesh(mesh.index()))?;
    let bindings = &source
        .as_mesh()
        .ok_or(SkinError::NotAMesh(mesh.index()))?
        .skinbinding;
    let mesh_id = *instances
        .get(&mesh)
        .ok_or(SkinError::NotAMesh(mesh.index()))?;
    let name = source.name.as_str();

    let root = graph
        .root_joints()
        .next()
        .ok_or_else(|| SkinError::NoRootJoint {
            mesh: name.to_string(),
        })?;
    let root_id = *instances.get(&root).ok_or_else(|| SkinError::NoRootJoint {
        mesh: name.to_string(),
    })?;

    let mut bind_pose = Pose::new(format!("bindpose_{name}"), true);
    let mut rest_pose = Pose::new(format!("restpose_{name}"), false);
    rest_pose.add(root_id, doc.global_transform(root_id), false);

    let mesh_global = doc.global_transform(mesh_id);

    let mut skin = Skin {
        name: format!("{name}_skin"),
        clusters: Vec::with_capacity(bindings.len()),
    };

    for binding in bindings {
        let unresolved = || SkinError::UnresolvedJoint {
            mesh: name.to_string(),
            joint: binding.target_joint.index(),
        };
        graph
            .get(binding.target_joint)
            .and_then(|node| node.as_joint())
            .ok_or_else(unresolved)?;
        let joint_id = *instances.get(&binding.target_joint).ok_or_else(unresolved)?;

        let joint_global = doc.global_transform(joint_id);
        if joint_id != root_id {
            rest_pose.add(joint_id, doc.local_transform(joint_id), true);
        }
        bind_pose.add(joint_id, joint_global, false);

        let mut cluster = Cluster::new(joint_id, binding.link_mode);
        for &(index, weight) in &binding.vertex_weights {
            cluster.add_control_point_index(index, weight);
        }
        cluster.transform_link = joint_global;
        cluster.transform = mesh_global;
        skin.clusters.push(cluster);
    }

    log::debug!(
        "Bound '{}' to {} joints ({} rest pose entries)",
        name,
        skin.clusters.len(),
        rest_pose.len()
    );

    doc.node_mut(mesh_id)
        .and_then(|node| node.mesh_mut())
        .ok_or(SkinError::NotAMesh(mesh.index()))?
        .add_skin(skin);
    doc.add_pose(bind_pose);
    doc.add_pose(rest_pose);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{LinkMode, NodeAttribute};
    use crate::graph::{Joint, Mesh, SceneNode, SkinBinding};
    use fbxgen_math::{DMat4, DVec3};

    struct Fixture {
        doc: Document,
        graph: NodeGraph,
        instances: HashMap<NodeId, DocNodeId>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                doc: Document::new(),
                graph: NodeGraph::new(),
                instances: HashMap::new(),
            }
        }

        fn add(&mut self, node: SceneNode, attribute: NodeAttribute) -> NodeId {
            let name = node.name.clone();
            let translation = node.transform.translation;
            let parent = node.parent;
            let id = self.graph.add(node);
            let doc_id = self.doc.create_node(name, attribute);
            self.doc.node_mut(doc_id).unwrap().set_lcl_translation(translation);
            let doc_parent = parent.map_or(self.doc.root(), |p| self.instances[&p]);
            self.doc.add_child(doc_parent, doc_id);
            self.instances.insert(id, doc_id);
            id
        }

        fn joint(&mut self, name: &str, joint: Joint, parent: Option<NodeId>, y: f64) -> NodeId {
            let mut node = SceneNode::joint(name, joint);
            node.parent = parent;
            node.transform.translation = DVec3::new(0.0, y, 0.0);
            self.add(node, NodeAttribute::Null)
        }

        fn mesh(&mut self, bindings: Vec<SkinBinding>) -> NodeId {
            let mut mesh = Mesh::new(vec![DVec3::ZERO; 3], vec![vec![0, 1, 2]]);
            mesh.skinbinding = bindings;
            let geometry = Box::default();
            self.add(SceneNode::mesh("body", mesh), NodeAttribute::Mesh(geometry))
        }
    }

    #[test]
    fn test_root_only_binding() {
        let mut fx = Fixture::new();
        let root = fx.joint("root", Joint::root(), None, 5.0);
        let mesh = fx.mesh(vec![SkinBinding::new(root, vec![(0, 1.0), (1, 1.0)])]);

        bind_skin(&mut fx.doc, &fx.graph, &fx.instances, mesh).unwrap();

        let root_id = fx.instances[&root];
        let rest = fx.doc.find_pose("restpose_body").unwrap();
        let bind = fx.doc.find_pose("bindpose_body").unwrap();
        assert!(bind.is_bind_pose);
        assert_eq!(rest.len(), 1);
        assert!(!rest.entry(root_id).unwrap().local);
        assert_eq!(bind.len(), 1);

        let geometry = fx.doc.node(fx.instances[&mesh]).unwrap().mesh().unwrap();
        let cluster = &geometry.skins()[0].clusters[0];
        assert_eq!(cluster.link, root_id);
        assert_eq!(cluster.link_mode, LinkMode::TotalOne);
        assert_eq!(cluster.weights, vec![(0, 1.0), (1, 1.0)]);
        assert_eq!(
            cluster.transform_link,
            DMat4::from_translation(DVec3::new(0.0, 5.0, 0.0))
        );
        assert_eq!(cluster.transform, DMat4::IDENTITY);
    }

    #[test]
    fn test_missing_root_joint() {
        let mut fx = Fixture::new();
        let joint = fx.joint("loose", Joint::default(), None, 0.0);
        let mesh = fx.mesh(vec![SkinBinding::new(joint, vec![(0, 1.0)])]);

        let result = bind_skin(&mut fx.doc, &fx.graph, &fx.instances, mesh);
        assert_eq!(
            result,
            Err(SkinError::NoRootJoint {
                mesh: "body".to_string()
            })
        );
        assert!(fx.doc.poses().is_empty());
    }

    #[test]
    fn test_target_must_be_joint() {
        let mut fx = Fixture::new();
        fx.joint("root", Joint::root(), None, 0.0);
        let null = fx.add(SceneNode::null("locator"), NodeAttribute::Null);
        let mesh = fx.mesh(vec![SkinBinding::new(null, vec![(0, 1.0)])]);

        let result = bind_skin(&mut fx.doc, &fx.graph, &fx.instances, mesh);
        assert!(matches!(result, Err(SkinError::UnresolvedJoint { .. })));
    }

    #[test]
    fn test_weights_not_merged() {
        let mut fx = Fixture::new();
        let root = fx.joint("root", Joint::root(), None, 0.0);
        let arm = fx.joint("arm", Joint::default(), Some(root), 10.0);
        let mesh = fx.mesh(vec![
            SkinBinding::new(root, vec![(0, 0.75), (0, 0.25)]),
            SkinBinding::new(arm, vec![(0, 0.5)]),
        ]);

        bind_skin(&mut fx.doc, &fx.graph, &fx.instances, mesh).unwrap();

        let geometry = fx.doc.node(fx.instances[&mesh]).unwrap().mesh().unwrap();
        let clusters = &geometry.skins()[0].clusters;
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].weights, vec![(0, 0.75), (0, 0.25)]);
        assert_eq!(clusters[1].weights, vec![(0, 0.5)]);
    }
}
