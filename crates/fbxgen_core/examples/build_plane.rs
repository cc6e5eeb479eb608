//! Example: Build a textured plane skinned to a two-joint chain.
//!
//! Run with: cargo run --example build_plane -- [--json]

use std::env;
use std::path::Path;

use fbxgen_core::{
    Document, Joint, LambertMaterial, MappedCoordinates, Mesh, SceneBuilder, SceneNode, Settings,
    SkinBinding, TextureChannel, Transform,
};
use fbxgen_math::{DMat4Ext, DVec2, DVec3};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let print_json = env::args().any(|arg| arg == "--json");

    let mut builder = SceneBuilder::new()
        .with_settings(Settings::default().with_file_path("build_plane.fbx"));

    let root = builder.add(SceneNode::joint("root", Joint::root()));
    let tip = builder.add(
        SceneNode::joint("tip", Joint::default())
            .with_parent(root)
            .with_transform(Transform::from_translation(DVec3::new(0.0, 1.0, 0.0))),
    );

    let mut plane = Mesh::new(
        vec![
            DVec3::new(-0.5, 0.0, 0.5),
            DVec3::new(0.5, 0.0, 0.5),
            DVec3::new(0.5, 0.0, -0.5),
            DVec3::new(-0.5, 0.0, -0.5),
        ],
        vec![vec![0, 3, 2], vec![2, 1, 0]],
    );
    plane.uvs.push(MappedCoordinates::new(
        "map1",
        vec![DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::Y],
        vec![0, 3, 2, 2, 1, 0],
    ));
    let checker = LambertMaterial::new("checker")
        .with_texture(TextureChannel::new("checker.png", "Diffuse").with_uv_set("map1"));
    plane.materials.push((checker.into(), vec![0, 1]));
    plane.skinbinding = vec![
        SkinBinding::new(root, vec![(0, 1.0), (1, 1.0)]),
        SkinBinding::new(tip, vec![(2, 1.0), (3, 1.0)]),
    ];
    builder.add(SceneNode::mesh("plane", plane));

    let doc = builder.build()?;
    println!("Built {} nodes", doc.node_count());
    for (id, node) in doc.nodes() {
        let position = doc.global_transform(id).translation();
        println!(
            "  {} at ({:.2}, {:.2}, {:.2})",
            doc.node_path(id).unwrap_or_else(|| node.name.clone()),
            position.x,
            position.y,
            position.z
        );
    }
    for pose in doc.poses() {
        println!("Pose '{}': {} entries", pose.name, pose.len());
    }

    if print_json {
        println!("{}", doc.to_json_snapshot()?);
    }

    let mut writer = |path: &Path, doc: &Document, format: &str, compatibility: &str| {
        println!(
            "Would write {} nodes to {} as {} ({})",
            doc.node_count(),
            path.display(),
            format,
            compatibility
        );
        true
    };
    let exported = builder.build_and_export(&mut writer)?;
    println!("Exported: {}", exported);

    Ok(())
}
