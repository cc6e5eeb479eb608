//! Shared layer-element rules for normals, UV sets and vertex colors.

use crate::document::{LayerElement, MappingMode, ReferenceMode};
use crate::graph::MappedCoordinates;

use super::{EncodeError, EncodeResult};

/// Check a point mapping against the mesh-wide mapping scheme.
///
/// Every mapped index must point into `coordinates`. By-control-point
/// mappings must have one entry per control point, and if the values are
/// indexed the mapping must not be empty.
pub fn validate_coordinate_mapping<T>(
    mesh: &str,
    attribute: &str,
    coordinates: &MappedCoordinates<T>,
    mapping_mode: MappingMode,
    reference_mode: ReferenceMode,
    control_points: usize,
) -> EncodeResult<()> {
    let len = coordinates.coordinates.len();
    if let Some(&index) = coordinates.point_mapping.iter().find(|&&i| i >= len) {
        return Err(EncodeError::MappingOutOfRange {
            mesh: mesh.to_string(),
            attribute: attribute.to_string(),
            index,
            len,
        });
    }
    if mapping_mode == MappingMode::ByControlPoint {
        if coordinates.point_mapping.len() != control_points {
            return Err(EncodeError::MappingLength {
                mesh: mesh.to_string(),
                attribute: attribute.to_string(),
                expected: control_points,
                actual: coordinates.point_mapping.len(),
            });
        }
        if reference_mode != ReferenceMode::Direct && coordinates.point_mapping.is_empty() {
            return Err(EncodeError::EmptyMapping {
                mesh: mesh.to_string(),
                attribute: attribute.to_string(),
            });
        }
    }
    Ok(())
}

/// Fill a layer element from mapped coordinates, following the element's
/// own reference mode.
///
/// Indexed elements store the unique coordinates plus the mapping. Direct
/// elements store one resolved value per mapped element, or the coordinates
/// as given when there is no mapping.
pub fn write_layer_element<T: Copy>(
    element: &mut LayerElement<T>,
    coordinates: &MappedCoordinates<T>,
) {
    match element.reference_mode {
        ReferenceMode::Direct if coordinates.point_mapping.is_empty() => {
            element.direct = coordinates.coordinates.clone();
            element.index.clear();
        }
        ReferenceMode::Direct => {
            element.direct = coordinates.mapped_values();
            element.index.clear();
        }
        ReferenceMode::Index | ReferenceMode::IndexToDirect => {
            element.direct = coordinates.coordinates.clone();
            element.index = coordinates.point_mapping.clone();
        }
    }
}
