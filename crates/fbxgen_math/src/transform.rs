// Transform utilities for DMat4
//
// Local transforms are composed as T * R * S, which is what the transform
// evaluator uses when walking up a node hierarchy.

use glam::{DMat4, DVec3};

use crate::RotationOrder;

/// Compose a local matrix from translation, Euler rotation (degrees) and scale.
pub fn compose_trs(
    translation: DVec3,
    rotation_degrees: DVec3,
    scale: DVec3,
    order: RotationOrder,
) -> DMat4 {
    DMat4::from_translation(translation)
        * order.rotation_matrix(rotation_degrees)
        * DMat4::from_scale(scale)
}

/// Extension trait for DMat4 to provide additional transform utilities
pub trait DMat4Ext {
    /// Translation part of an affine matrix.
    fn translation(&self) -> DVec3;
}

impl DMat4Ext for DMat4 {
    fn translation(&self) -> DVec3 {
        self.w_axis.truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_translation() {
        let m = compose_trs(
            DVec3::new(10.0, 20.0, 30.0),
            DVec3::ZERO,
            DVec3::ONE,
            RotationOrder::EulerXYZ,
        );
        let p = m.transform_point3(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(p, DVec3::new(11.0, 22.0, 33.0));
        assert_eq!(m.translation(), DVec3::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn test_scale_applied_before_translation() {
        let m = compose_trs(
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::ZERO,
            DVec3::splat(2.0),
            RotationOrder::EulerXYZ,
        );
        let p = m.transform_point3(DVec3::new(1.0, 1.0, 1.0));
        assert!((p - DVec3::new(3.0, 2.0, 2.0)).length() < 1e-12);
    }

    #[test]
    fn test_rotation_then_translation() {
        let m = compose_trs(
            DVec3::new(0.0, 40.0, 0.0),
            DVec3::new(0.0, 0.0, 90.0),
            DVec3::ONE,
            RotationOrder::EulerXYZ,
        );
        let p = m.transform_point3(DVec3::X);
        assert!((p - DVec3::new(0.0, 41.0, 0.0)).length() < 1e-9);
    }
}
