//! Property and animation authoring.
//!
//! Sets built-in properties on native nodes, creates user-defined ones from
//! their type descriptor, and keys animation curves onto either kind.

use thiserror::Error;

use crate::document::{AnimLayerRef, DocNodeId, DocProperty, Document, USER_GROUP};
use crate::property::{AnimationCurve, DataType, Property};

/// Sub-curve channels of vector properties, in component order.
const AXES: [&str; 4] = ["X", "Y", "Z", "W"];

/// Errors raised while authoring properties.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    #[error("Node #{0} does not exist")]
    MissingNode(usize),

    #[error("Node \"{node}\" has no property named \"{property}\"")]
    UnknownProperty { node: String, property: String },

    #[error(
        "When defining user property \"{property}\" on \"{node}\", you must define its \
         internal name and type"
    )]
    MissingTypeDescriptor { node: String, property: String },

    #[error("Value of property \"{property}\" cannot be stored as {data_type:?}")]
    ValueMismatch {
        property: String,
        data_type: DataType,
    },

    #[error("Property \"{property}\" is animated, but the document has no current animation stack")]
    NoAnimStack { property: String },

    #[error("Animation layer \"{layer}\" for property \"{property}\" was not declared")]
    UnknownAnimLayer { property: String, layer: String },

    #[error("Curve on \"{property}\" has {times} times but {values} values")]
    CurveLengthMismatch {
        property: String,
        times: usize,
        values: usize,
    },
}

/// Result type for property authoring.
pub type PropertyResult<T> = Result<T, PropertyError>;

/// Set each property on a node, creating user-defined ones as needed, and
/// key their animation curves.
pub fn set_or_create_properties(
    doc: &mut Document,
    id: DocNodeId,
    properties: &[Property],
) -> PropertyResult<()> {
    for property in properties {
        let layers = resolve_layers(doc, property)?;

        let node = doc
            .node_mut(id)
            .ok_or(PropertyError::MissingNode(id.index()))?;

        if node.properties.find(&property.name).is_none() {
            if !property.user_defined {
                return Err(PropertyError::UnknownProperty {
                    node: node.name.clone(),
                    property: property.name.clone(),
                });
            }
            let (data_name, data_type) = property.data_name_and_type.as_ref().ok_or_else(|| {
                PropertyError::MissingTypeDescriptor {
                    node: node.name.clone(),
                    property: property.name.clone(),
                }
            })?;
            log::debug!(
                "Creating user property '{}' ({}) on '{}'",
                property.name,
                data_name,
                node.name
            );
            node.properties.insert(DocProperty::new(
                property.name.as_str(),
                *data_type,
                data_name.as_str(),
            ));
        }

        let Some(target) = node.properties.find_mut(&property.name) else {
            continue;
        };
        if !target.set(&property.value) {
            return Err(PropertyError::ValueMismatch {
                property: property.name.clone(),
                data_type: target.data_type,
            });
        }
        if property.user_defined {
            target.flags.user_defined = true;
            target.group = Some(USER_GROUP.to_string());
        }
        if !property.animation_curves.is_empty() {
            target.flags.animatable = true;
        }

        for (layer, curve) in layers {
            key_curve(target, layer, curve)?;
        }
    }
    Ok(())
}

fn resolve_layers<'a>(
    doc: &Document,
    property: &'a Property,
) -> PropertyResult<Vec<(AnimLayerRef, &'a AnimationCurve)>> {
    if property.animation_curves.is_empty() {
        return Ok(Vec::new());
    }
    if doc.current_anim_stack().is_none() {
        return Err(PropertyError::NoAnimStack {
            property: property.name.clone(),
        });
    }
    property
        .animation_curves
        .iter()
        .map(|curve| {
            doc.find_anim_layer(&curve.anim_layer)
                .map(|layer| (layer, curve))
                .ok_or_else(|| PropertyError::UnknownAnimLayer {
                    property: property.name.clone(),
                    layer: curve.anim_layer.clone(),
                })
        })
        .collect()
}

/// Key one curve onto a property under `layer`. Vector properties get one
/// sub-curve per component; everything else a single unnamed curve.
fn key_curve(
    target: &mut DocProperty,
    layer: AnimLayerRef,
    curve: &AnimationCurve,
) -> PropertyResult<()> {
    if curve.times.len() != curve.values.len() {
        return Err(PropertyError::CurveLengthMismatch {
            property: target.name.clone(),
            times: curve.times.len(),
            values: curve.values.len(),
        });
    }

    let data_type = target.data_type;
    let mismatch = |name: &str| PropertyError::ValueMismatch {
        property: name.to_string(),
        data_type,
    };
    let name = target.name.clone();
    let curve_node = target.curve_node_mut(layer);

    for (time, value) in curve.times.iter().zip(&curve.values) {
        let components = value.components().ok_or_else(|| mismatch(&name))?;
        if data_type.is_vector() {
            for (axis, component) in AXES.iter().zip(components) {
                curve_node.curve_mut(axis).key_set(*time, component);
            }
        } else {
            match components.as_slice() {
                [scalar] => {
                    curve_node.curve_mut("").key_set(*time, *scalar);
                }
                _ => return Err(mismatch(&name)),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeAttribute;
    use crate::property::{PropertyValue, Time};
    use fbxgen_math::DVec3;

    fn doc_with_layer() -> (Document, DocNodeId) {
        let mut doc = Document::new();
        let stack = doc.create_anim_stack("RootStack");
        doc.set_current_anim_stack(stack);
        doc.add_anim_layer("base");
        let id = doc.create_node("cube", NodeAttribute::Null);
        (doc, id)
    }

    #[test]
    fn test_set_builtin_property() {
        let (mut doc, id) = doc_with_layer();
        set_or_create_properties(&mut doc, id, &[Property::new("Visibility", 0.0)]).unwrap();
        let property = doc.node(id).unwrap().properties.find("Visibility").unwrap();
        assert_eq!(property.value, PropertyValue::Float(0.0));
        assert!(!property.is_user_defined());
    }

    #[test]
    fn test_unknown_builtin_is_fatal() {
        let (mut doc, id) = doc_with_layer();
        let result = set_or_create_properties(&mut doc, id, &[Property::new("Wobble", 1.0)]);
        assert!(matches!(result, Err(PropertyError::UnknownProperty { .. })));
    }

    #[test]
    fn test_user_property_created_in_user_group() {
        let (mut doc, id) = doc_with_layer();
        let property = Property::user("tag", 3_i64, "Integer", DataType::Int);
        set_or_create_properties(&mut doc, id, &[property]).unwrap();

        let created = doc.node(id).unwrap().properties.find("tag").unwrap();
        assert!(created.is_user_defined());
        assert_eq!(created.group.as_deref(), Some(USER_GROUP));
        assert_eq!(created.type_name, "Integer");
        assert_eq!(created.value, PropertyValue::Int(3));
    }

    #[test]
    fn test_user_property_needs_descriptor() {
        let (mut doc, id) = doc_with_layer();
        let mut property = Property::new("tag", 1.0);
        property.user_defined = true;
        let result = set_or_create_properties(&mut doc, id, &[property]);
        assert!(matches!(
            result,
            Err(PropertyError::MissingTypeDescriptor { .. })
        ));
    }

    #[test]
    fn test_vector_curve_split_per_axis() {
        let (mut doc, id) = doc_with_layer();
        let layer = doc.find_anim_layer("base").unwrap();
        let property = Property::new("LclTranslation", DVec3::ZERO).with_curve(AnimationCurve::new(
            "base",
            vec![Time::from_seconds(0.0), Time::from_seconds(1.0)],
            vec![DVec3::ZERO.into(), DVec3::new(1.0, 2.0, 3.0).into()],
        ));
        set_or_create_properties(&mut doc, id, &[property]).unwrap();

        let translation = doc
            .node(id)
            .unwrap()
            .properties
            .find("LclTranslation")
            .unwrap();
        assert!(translation.flags.animatable);
        let node = translation.curve_node(layer).unwrap();
        assert_eq!(node.curves.len(), 3);
        let z = node.curve("Z").unwrap();
        assert_eq!(z.key_count(), 2);
        assert_eq!(z.keys()[1].value, 3.0);
    }

    #[test]
    fn test_descending_times_sorted() {
        let (mut doc, id) = doc_with_layer();
        let layer = doc.find_anim_layer("base").unwrap();
        let property = Property::user("weight", 0.0, "Number", DataType::Double).with_curve(
            AnimationCurve::new(
                "base",
                vec![Time::from_frame(10, Default::default()), Time::ZERO],
                vec![1.0_f64.into(), 0.5_f64.into()],
            ),
        );
        set_or_create_properties(&mut doc, id, &[property]).unwrap();

        let weight = doc.node(id).unwrap().properties.find("weight").unwrap();
        let keys = weight.curve_node(layer).unwrap().curve("").unwrap().keys();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].value, 0.5);
        assert_eq!(keys[1].value, 1.0);
    }

    #[test]
    fn test_undeclared_layer_is_fatal() {
        let (mut doc, id) = doc_with_layer();
        let property = Property::new("Visibility", 1.0).with_curve(AnimationCurve::new(
            "missing",
            vec![Time::ZERO],
            vec![PropertyValue::Float(1.0)],
        ));
        let result = set_or_create_properties(&mut doc, id, &[property]);
        assert!(matches!(result, Err(PropertyError::UnknownAnimLayer { .. })));
    }

    #[test]
    fn test_curve_length_mismatch() {
        let (mut doc, id) = doc_with_layer();
        let property = Property::new("Visibility", 1.0).with_curve(AnimationCurve::new(
            "base",
            vec![Time::ZERO, Time::from_seconds(1.0)],
            vec![PropertyValue::Float(1.0)],
        ));
        let result = set_or_create_properties(&mut doc, id, &[property]);
        assert!(matches!(
            result,
            Err(PropertyError::CurveLengthMismatch { times: 2, values: 1, .. })
        ));
    }
}
