//! Property values, native data types and animation curves.
//!
//! A [`Property`] describes a named value the caller wants on a node, either
//! one of the node's built-in attributes or a user-defined one. Its
//! [`AnimationCurve`]s are keyed in native [`Time`] ticks.

use fbxgen_math::{DMat4, DVec2, DVec3, DVec4};
use serde::{Deserialize, Serialize};

/// Native time resolution.
pub const TICKS_PER_SECOND: i64 = 46_186_158_000;

/// Common frame rates for frame-based times.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameRate {
    Fps24,
    Fps25,
    #[default]
    Fps30,
    Fps48,
    Fps50,
    Fps60,
}

impl FrameRate {
    pub fn frames_per_second(self) -> i64 {
        match self {
            FrameRate::Fps24 => 24,
            FrameRate::Fps25 => 25,
            FrameRate::Fps30 => 30,
            FrameRate::Fps48 => 48,
            FrameRate::Fps50 => 50,
            FrameRate::Fps60 => 60,
        }
    }

    /// Ticks spanned by one frame. Exact for every supported rate.
    pub fn ticks_per_frame(self) -> i64 {
        TICKS_PER_SECOND / self.frames_per_second()
    }
}

/// A point in time, in native ticks.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Time(pub i64);

impl Time {
    pub const ZERO: Time = Time(0);

    pub fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    pub fn from_seconds(seconds: f64) -> Self {
        Self((seconds * TICKS_PER_SECOND as f64).round() as i64)
    }

    pub fn from_frame(frame: i64, rate: FrameRate) -> Self {
        Self(frame * rate.ticks_per_frame())
    }

    pub fn ticks(self) -> i64 {
        self.0
    }

    pub fn seconds(self) -> f64 {
        self.0 as f64 / TICKS_PER_SECOND as f64
    }

    /// Frame number at the given rate, rounded down.
    pub fn frame(self, rate: FrameRate) -> i64 {
        self.0.div_euclid(rate.ticks_per_frame())
    }
}

/// Native property data types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Undefined,
    Char,
    UChar,
    Short,
    UShort,
    UInt,
    Int,
    LongLong,
    ULongLong,
    HalfFloat,
    Bool,
    Float,
    Double,
    Double2,
    Double3,
    Double4,
    Double4x4,
    Enum,
    String,
    Time,
    Reference,
    Blob,
    Distance,
    DateTime,
}

impl DataType {
    /// Number of scalar components a value of this type carries.
    pub fn component_count(self) -> usize {
        match self {
            DataType::Double2 => 2,
            DataType::Double3 => 3,
            DataType::Double4 => 4,
            DataType::Double4x4 => 16,
            _ => 1,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            DataType::Char
                | DataType::UChar
                | DataType::Short
                | DataType::UShort
                | DataType::UInt
                | DataType::Int
                | DataType::LongLong
                | DataType::ULongLong
                | DataType::Enum
        )
    }

    pub fn is_floating(self) -> bool {
        matches!(
            self,
            DataType::HalfFloat | DataType::Float | DataType::Double | DataType::Distance
        )
    }

    /// Vector types get one animation curve per component.
    pub fn is_vector(self) -> bool {
        matches!(self, DataType::Double2 | DataType::Double3 | DataType::Double4)
    }

    /// Value a freshly created property of this type holds.
    pub fn default_value(self) -> PropertyValue {
        match self {
            DataType::Bool => PropertyValue::Bool(false),
            DataType::Double2 => PropertyValue::Double2(DVec2::ZERO),
            DataType::Double3 => PropertyValue::Double3(DVec3::ZERO),
            DataType::Double4 => PropertyValue::Double4(DVec4::ZERO),
            DataType::Double4x4 => PropertyValue::Matrix(DMat4::IDENTITY),
            DataType::Time => PropertyValue::Time(Time::ZERO),
            DataType::String
            | DataType::Reference
            | DataType::Blob
            | DataType::DateTime
            | DataType::Undefined => PropertyValue::String(String::new()),
            ty if ty.is_integer() => PropertyValue::Int(0),
            _ => PropertyValue::Float(0.0),
        }
    }
}

/// A property value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Double2(DVec2),
    Double3(DVec3),
    Double4(DVec4),
    Matrix(DMat4),
    String(String),
    Time(Time),
}

impl PropertyValue {
    /// Scalar components of a numeric value, `None` for strings and times.
    pub fn components(&self) -> Option<Vec<f64>> {
        Some(match self {
            PropertyValue::Bool(b) => vec![if *b { 1.0 } else { 0.0 }],
            PropertyValue::Int(i) => vec![*i as f64],
            PropertyValue::Float(f) => vec![*f],
            PropertyValue::Double2(v) => v.to_array().to_vec(),
            PropertyValue::Double3(v) => v.to_array().to_vec(),
            PropertyValue::Double4(v) => v.to_array().to_vec(),
            PropertyValue::Matrix(m) => m.to_cols_array().to_vec(),
            PropertyValue::String(_) | PropertyValue::Time(_) => return None,
        })
    }

    /// Convert this value so it can be stored in a property of type `ty`.
    ///
    /// Numeric scalars convert freely between integer, floating and boolean
    /// types. Vectors, matrices, strings and times must match exactly.
    pub fn coerce_to(&self, ty: DataType) -> Option<PropertyValue> {
        use PropertyValue as V;
        match (ty, self) {
            (DataType::Undefined, v) => Some(v.clone()),
            (DataType::Bool, V::Bool(b)) => Some(V::Bool(*b)),
            (DataType::Bool, V::Int(i)) => Some(V::Bool(*i != 0)),
            (DataType::Bool, V::Float(f)) => Some(V::Bool(*f != 0.0)),
            (t, V::Int(i)) if t.is_integer() => Some(V::Int(*i)),
            (t, V::Float(f)) if t.is_integer() => Some(V::Int(*f as i64)),
            (t, V::Bool(b)) if t.is_integer() => Some(V::Int(i64::from(*b))),
            (t, V::Float(f)) if t.is_floating() => Some(V::Float(*f)),
            (t, V::Int(i)) if t.is_floating() => Some(V::Float(*i as f64)),
            (t, V::Bool(b)) if t.is_floating() => Some(V::Float(if *b { 1.0 } else { 0.0 })),
            (DataType::Double2, V::Double2(v)) => Some(V::Double2(*v)),
            (DataType::Double3, V::Double3(v)) => Some(V::Double3(*v)),
            (DataType::Double4, V::Double4(v)) => Some(V::Double4(*v)),
            (DataType::Double4x4, V::Matrix(m)) => Some(V::Matrix(*m)),
            (DataType::Time, V::Time(t)) => Some(V::Time(*t)),
            (
                DataType::String | DataType::Reference | DataType::Blob | DataType::DateTime,
                V::String(s),
            ) => Some(V::String(s.clone())),
            _ => None,
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<DVec3> for PropertyValue {
    fn from(value: DVec3) -> Self {
        PropertyValue::Double3(value)
    }
}

impl From<DVec4> for PropertyValue {
    fn from(value: DVec4) -> Self {
        PropertyValue::Double4(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<Time> for PropertyValue {
    fn from(value: Time) -> Self {
        PropertyValue::Time(value)
    }
}

/// Time samples for one property on one animation layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationCurve {
    /// Name of an animation layer declared in the build settings
    pub anim_layer: String,

    /// Key times, parallel to `values`
    pub times: Vec<Time>,

    /// Key values, parallel to `times`
    pub values: Vec<PropertyValue>,
}

impl AnimationCurve {
    pub fn new(
        anim_layer: impl Into<String>,
        times: Vec<Time>,
        values: Vec<PropertyValue>,
    ) -> Self {
        Self {
            anim_layer: anim_layer.into(),
            times,
            values,
        }
    }
}

/// A named value to set (or create) on a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Attribute name, e.g. `LclTranslation` or a user-chosen name
    pub name: String,

    /// Value to set
    pub value: PropertyValue,

    /// Create the attribute if the node has no built-in one by this name
    pub user_defined: bool,

    /// Internal type name and data type used when the attribute is created
    pub data_name_and_type: Option<(String, DataType)>,

    /// Curves to key on this property
    pub animation_curves: Vec<AnimationCurve>,
}

impl Property {
    /// A value for a built-in attribute.
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            user_defined: false,
            data_name_and_type: None,
            animation_curves: Vec::new(),
        }
    }

    /// A user-defined attribute with its type descriptor.
    pub fn user(
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
        data_name: impl Into<String>,
        data_type: DataType,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            user_defined: true,
            data_name_and_type: Some((data_name.into(), data_type)),
            animation_curves: Vec::new(),
        }
    }

    pub fn with_curve(mut self, curve: AnimationCurve) -> Self {
        self.animation_curves.push(curve);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_times_are_exact() {
        for rate in [
            FrameRate::Fps24,
            FrameRate::Fps25,
            FrameRate::Fps30,
            FrameRate::Fps48,
            FrameRate::Fps50,
            FrameRate::Fps60,
        ] {
            let t = Time::from_frame(rate.frames_per_second(), rate);
            assert_eq!(t.ticks(), TICKS_PER_SECOND);
            assert_eq!(t.frame(rate), rate.frames_per_second());
        }
    }

    #[test]
    fn test_seconds_roundtrip() {
        let t = Time::from_seconds(2.5);
        assert!((t.seconds() - 2.5).abs() < 1e-9);
        assert_eq!(Time::from_frame(75, FrameRate::Fps30), t);
    }

    #[test]
    fn test_coerce_numeric_scalars() {
        assert_eq!(
            PropertyValue::Int(3).coerce_to(DataType::Float),
            Some(PropertyValue::Float(3.0))
        );
        assert_eq!(
            PropertyValue::Float(-10.7).coerce_to(DataType::Int),
            Some(PropertyValue::Int(-10))
        );
        assert_eq!(
            PropertyValue::Float(0.0).coerce_to(DataType::Bool),
            Some(PropertyValue::Bool(false))
        );
    }

    #[test]
    fn test_coerce_rejects_shape_mismatch() {
        let v = PropertyValue::Double3(DVec3::ONE);
        assert!(v.coerce_to(DataType::Double4).is_none());
        assert!(v.coerce_to(DataType::Double).is_none());
        assert!(PropertyValue::from("x").coerce_to(DataType::Int).is_none());
        assert_eq!(v.coerce_to(DataType::Undefined), Some(v.clone()));
    }

    #[test]
    fn test_components() {
        let v = PropertyValue::Double4(DVec4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(v.components(), Some(vec![1.0, 2.0, 3.0, 4.0]));
        assert_eq!(PropertyValue::from("a").components(), None);
        assert_eq!(DataType::Double3.component_count(), 3);
        assert!(DataType::Double3.is_vector());
        assert!(!DataType::Double4x4.is_vector());
    }
}
