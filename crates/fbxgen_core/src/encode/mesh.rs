//! Mesh encoding: control points, polygons, attribute layers and materials.

use crate::diagnostics::BuildWarning;
use crate::document::{
    DocNodeId, Document, MappingMode, MeshGeometry, NodeAttribute, ReferenceMode,
};
use crate::graph::Mesh;

use super::layer::{validate_coordinate_mapping, write_layer_element};
use super::material::create_material;
use super::{EncodeError, EncodeResult};

/// Encode a mesh node.
///
/// Only by-control-point and by-polygon-vertex meshes are supported. The
/// mapping mode and every attribute mapping are checked before anything is
/// added to the document.
pub fn create_mesh(doc: &mut Document, name: &str, mesh: &Mesh) -> EncodeResult<DocNodeId> {
    if !matches!(
        mesh.mapping_mode,
        MappingMode::ByControlPoint | MappingMode::ByPolygonVertex
    ) {
        return Err(EncodeError::UnsupportedMappingMode {
            mesh: name.to_string(),
            mode: mesh.mapping_mode,
        });
    }
    validate_layers(name, mesh)?;

    let mut geometry = MeshGeometry::new();
    geometry.init_control_points(mesh.points.len());
    for (i, point) in mesh.points.iter().enumerate() {
        geometry.set_control_point(i, *point);
    }

    for polygon in &mesh.polygons {
        geometry.begin_polygon();
        for &vertex in polygon {
            geometry.add_polygon_vertex(vertex);
        }
        geometry.end_polygon();
    }

    if let Some(normals) = &mesh.normals {
        let element = geometry.create_normal_layer();
        element.mapping_mode = mesh.mapping_mode;
        element.reference_mode = mesh.reference_mode;
        write_layer_element(element, normals);
    }

    // UV and color layers are only read back reliably by polygon vertex.
    let mut forced = Vec::new();
    for uv_set in &mesh.uvs {
        let element = geometry.create_uv_layer(uv_set.name.as_str());
        element.mapping_mode = MappingMode::ByPolygonVertex;
        element.reference_mode = ReferenceMode::IndexToDirect;
        write_layer_element(element, uv_set);
        forced.push(uv_set.name.clone());
    }

    for color_set in &mesh.vertex_colors {
        let element = geometry.create_vertex_color_layer(color_set.name.as_str());
        element.mapping_mode = MappingMode::ByPolygonVertex;
        element.reference_mode = ReferenceMode::IndexToDirect;
        write_layer_element(element, color_set);
        forced.push(color_set.name.clone());
    }

    geometry.create_material_layer().index = mesh
        .materials
        .iter()
        .flat_map(|(_, faces)| faces.iter().copied())
        .collect();

    log::debug!(
        "Encoded mesh '{}': {} points, {} polygons, {} UV sets, {} color sets",
        name,
        mesh.points.len(),
        mesh.polygons.len(),
        mesh.uvs.len(),
        mesh.vertex_colors.len()
    );

    let id = doc.create_node(name, NodeAttribute::Mesh(Box::new(geometry)));

    if mesh.mapping_mode == MappingMode::ByControlPoint {
        for layer in forced {
            doc.warn(BuildWarning::ForcedLayerMapping {
                mesh: name.to_string(),
                layer,
                declared: mesh.mapping_mode,
            });
        }
    }

    let uv_names: Vec<&str> = mesh.uvs.iter().map(|uv| uv.name.as_str()).collect();
    for (material, _) in &mesh.materials {
        let material_id = create_material(doc, material, &uv_names, name)?;
        if let Some(node) = doc.node_mut(id) {
            node.add_material(material_id);
        }
    }

    Ok(id)
}

fn validate_layers(name: &str, mesh: &Mesh) -> EncodeResult<()> {
    let points = mesh.points.len();
    if let Some(normals) = &mesh.normals {
        validate_coordinate_mapping(
            name,
            "normals.point_mapping",
            normals,
            mesh.mapping_mode,
            mesh.reference_mode,
            points,
        )?;
    }
    for uv_set in &mesh.uvs {
        validate_coordinate_mapping(
            name,
            &format!("uvs[{}].point_mapping", uv_set.name),
            uv_set,
            mesh.mapping_mode,
            mesh.reference_mode,
            points,
        )?;
    }
    for color_set in &mesh.vertex_colors {
        validate_coordinate_mapping(
            name,
            &format!("vertex_colors[{}].point_mapping", color_set.name),
            color_set,
            mesh.mapping_mode,
            mesh.reference_mode,
            points,
        )?;
    }
    Ok(())
}
