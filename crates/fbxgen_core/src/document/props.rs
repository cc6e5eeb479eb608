//! Property tables attached to native objects.

use fbxgen_math::{DVec3, RotationOrder};
use serde::Serialize;

use crate::property::{DataType, PropertyValue, Time};

/// Grouping user-defined properties are placed in.
pub const USER_GROUP: &str = "User";

/// A layer on some animation stack of the owning document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct AnimLayerRef {
    pub stack: usize,
    pub layer: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PropertyFlags {
    pub user_defined: bool,
    pub animatable: bool,
}

/// One key on an animation curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Key {
    pub time: Time,
    pub value: f64,
}

/// A scalar curve. Keys stay sorted by time.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AnimCurve {
    /// Channel name: "X", "Y", "Z", "W", or empty for scalar properties
    pub channel: String,
    keys: Vec<Key>,
}

impl AnimCurve {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            keys: Vec::new(),
        }
    }

    /// Insert a key, replacing the value if a key already exists at `time`.
    /// Returns the key's index.
    pub fn key_set(&mut self, time: Time, value: f64) -> usize {
        match self.keys.binary_search_by(|k| k.time.cmp(&time)) {
            Ok(i) => {
                self.keys[i].value = value;
                i
            }
            Err(i) => {
                self.keys.insert(i, Key { time, value });
                i
            }
        }
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}

/// The curves of one property on one animation layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurveNode {
    pub layer: AnimLayerRef,
    pub curves: Vec<AnimCurve>,
}

impl CurveNode {
    /// Find the curve for `channel`, creating it if missing.
    pub fn curve_mut(&mut self, channel: &str) -> &mut AnimCurve {
        let index = match self.curves.iter().position(|c| c.channel == channel) {
            Some(i) => i,
            None => {
                self.curves.push(AnimCurve::new(channel));
                self.curves.len() - 1
            }
        };
        &mut self.curves[index]
    }

    pub fn curve(&self, channel: &str) -> Option<&AnimCurve> {
        self.curves.iter().find(|c| c.channel == channel)
    }
}

/// A named, typed value on a native object.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DocProperty {
    pub name: String,
    pub data_type: DataType,
    /// Internal type name, e.g. "Vector" or "Number"
    pub type_name: String,
    pub value: PropertyValue,
    pub flags: PropertyFlags,
    pub group: Option<String>,
    pub curve_nodes: Vec<CurveNode>,
}

impl DocProperty {
    pub fn new(name: impl Into<String>, data_type: DataType, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type,
            type_name: type_name.into(),
            value: data_type.default_value(),
            flags: PropertyFlags::default(),
            group: None,
            curve_nodes: Vec::new(),
        }
    }

    fn with_value(mut self, value: PropertyValue) -> Self {
        self.value = value;
        self
    }

    /// Store `value`, converting it to this property's type.
    /// Returns false if the value cannot be represented.
    pub fn set(&mut self, value: &PropertyValue) -> bool {
        match value.coerce_to(self.data_type) {
            Some(v) => {
                self.value = v;
                true
            }
            None => false,
        }
    }

    pub fn is_user_defined(&self) -> bool {
        self.flags.user_defined
    }

    pub fn is_animated(&self) -> bool {
        !self.curve_nodes.is_empty()
    }

    /// Find the curve node for `layer`, creating it if missing.
    pub fn curve_node_mut(&mut self, layer: AnimLayerRef) -> &mut CurveNode {
        let index = match self.curve_nodes.iter().position(|n| n.layer == layer) {
            Some(i) => i,
            None => {
                self.curve_nodes.push(CurveNode {
                    layer,
                    curves: Vec::new(),
                });
                self.curve_nodes.len() - 1
            }
        };
        &mut self.curve_nodes[index]
    }

    pub fn curve_node(&self, layer: AnimLayerRef) -> Option<&CurveNode> {
        self.curve_nodes.iter().find(|n| n.layer == layer)
    }

    /// Read a Double3 value.
    pub fn as_dvec3(&self) -> Option<DVec3> {
        match self.value {
            PropertyValue::Double3(v) => Some(v),
            _ => None,
        }
    }
}

/// Ordered properties of one native object.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PropertyTable {
    properties: Vec<DocProperty>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in properties every transformable node carries.
    pub fn node_defaults() -> Self {
        let mut table = Self::new();
        table.insert(
            DocProperty::new("LclTranslation", DataType::Double3, "Lcl Translation")
                .with_value(PropertyValue::Double3(DVec3::ZERO)),
        );
        table.insert(
            DocProperty::new("LclRotation", DataType::Double3, "Lcl Rotation")
                .with_value(PropertyValue::Double3(DVec3::ZERO)),
        );
        table.insert(
            DocProperty::new("LclScaling", DataType::Double3, "Lcl Scaling")
                .with_value(PropertyValue::Double3(DVec3::ONE)),
        );
        table.insert(
            DocProperty::new("Visibility", DataType::Double, "Visibility")
                .with_value(PropertyValue::Float(1.0)),
        );
        table.insert(
            DocProperty::new("VisibilityInheritance", DataType::Bool, "Visibility Inheritance")
                .with_value(PropertyValue::Bool(true)),
        );
        table.insert(
            DocProperty::new("Show", DataType::Bool, "bool").with_value(PropertyValue::Bool(true)),
        );
        table.insert(DocProperty::new("RotationActive", DataType::Bool, "bool"));
        table.insert(DocProperty::new("QuaternionInterpolate", DataType::Enum, "enum"));
        table.insert(
            DocProperty::new("RotationOrder", DataType::Enum, "enum")
                .with_value(PropertyValue::Int(RotationOrder::EulerXYZ.index())),
        );
        table.insert(
            DocProperty::new("DefaultAttributeIndex", DataType::Int, "int")
                .with_value(PropertyValue::Int(0)),
        );
        table
    }

    /// Append a property. The caller makes sure the name is free.
    pub fn insert(&mut self, property: DocProperty) -> &mut DocProperty {
        self.properties.push(property);
        let last = self.properties.len() - 1;
        &mut self.properties[last]
    }

    pub fn find(&self, name: &str) -> Option<&DocProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut DocProperty> {
        self.properties.iter_mut().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocProperty> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
