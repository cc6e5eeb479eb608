//! Euler rotation orders.
//!
//! Angles are expressed in degrees. An order such as `EulerXYZ` means the
//! X rotation is applied first, then Y, then Z, so the resulting matrix for
//! column vectors is `Rz * Ry * Rx`.

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

/// A principal axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Select this axis' component from a vector.
    pub fn component(self, v: DVec3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// Rotation matrix about this axis, angle in degrees.
    pub fn rotation(self, degrees: f64) -> DMat4 {
        let radians = degrees.to_radians();
        match self {
            Axis::X => DMat4::from_rotation_x(radians),
            Axis::Y => DMat4::from_rotation_y(radians),
            Axis::Z => DMat4::from_rotation_z(radians),
        }
    }
}

/// Rotation order of a transformable node.
///
/// The discriminants match the native enumeration so the order can be
/// stored in an enum-typed property and read back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationOrder {
    #[default]
    EulerXYZ = 0,
    EulerXZY = 1,
    EulerYZX = 2,
    EulerYXZ = 3,
    EulerZXY = 4,
    EulerZYX = 5,
    /// Treated as `EulerXYZ` when composing matrices.
    SphericXYZ = 6,
}

impl RotationOrder {
    /// Look up an order from its native index.
    pub fn from_index(index: i64) -> Option<Self> {
        Some(match index {
            0 => RotationOrder::EulerXYZ,
            1 => RotationOrder::EulerXZY,
            2 => RotationOrder::EulerYZX,
            3 => RotationOrder::EulerYXZ,
            4 => RotationOrder::EulerZXY,
            5 => RotationOrder::EulerZYX,
            6 => RotationOrder::SphericXYZ,
            _ => return None,
        })
    }

    /// Native index of this order.
    pub fn index(self) -> i64 {
        self as i64
    }

    /// Axes in application order (first applied first).
    pub fn axes(self) -> [Axis; 3] {
        match self {
            RotationOrder::EulerXYZ | RotationOrder::SphericXYZ => [Axis::X, Axis::Y, Axis::Z],
            RotationOrder::EulerXZY => [Axis::X, Axis::Z, Axis::Y],
            RotationOrder::EulerYZX => [Axis::Y, Axis::Z, Axis::X],
            RotationOrder::EulerYXZ => [Axis::Y, Axis::X, Axis::Z],
            RotationOrder::EulerZXY => [Axis::Z, Axis::X, Axis::Y],
            RotationOrder::EulerZYX => [Axis::Z, Axis::Y, Axis::X],
        }
    }

    /// Build the rotation matrix for Euler angles given in degrees.
    pub fn rotation_matrix(self, degrees: DVec3) -> DMat4 {
        let [first, second, third] = self.axes();
        third.rotation(third.component(degrees))
            * second.rotation(second.component(degrees))
            * first.rotation(first.component(degrees))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for i in 0..7 {
            let order = RotationOrder::from_index(i).unwrap();
            assert_eq!(order.index(), i);
        }
        assert!(RotationOrder::from_index(7).is_none());
    }

    #[test]
    fn test_xyz_applies_x_first() {
        // 90 about X then 90 about Y: +Y -> +Z -> +X
        let m = RotationOrder::EulerXYZ.rotation_matrix(DVec3::new(90.0, 90.0, 0.0));
        let v = m.transform_vector3(DVec3::Y);
        assert!((v - DVec3::X).length() < 1e-9);
    }

    #[test]
    fn test_order_matters() {
        let angles = DVec3::new(90.0, 90.0, 0.0);
        let xyz = RotationOrder::EulerXYZ.rotation_matrix(angles);
        let yxz = RotationOrder::EulerYXZ.rotation_matrix(angles);
        assert!(!xyz.abs_diff_eq(yxz, 1e-6));
    }
}
