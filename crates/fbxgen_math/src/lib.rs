// Re-export glam for convenience
pub use glam::*;

// Scene math types
mod rotation;
mod transform;
pub use rotation::{Axis, RotationOrder};
pub use transform::{compose_trs, DMat4Ext};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dvec3_creation() {
        let v = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_compose_identity() {
        let m = compose_trs(DVec3::ZERO, DVec3::ZERO, DVec3::ONE, RotationOrder::EulerXYZ);
        assert!(m.abs_diff_eq(DMat4::IDENTITY, 1e-12));
    }
}
