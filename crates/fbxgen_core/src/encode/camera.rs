//! Camera encoding.

use crate::document::{ApertureFormat, CameraAttribute, DocNodeId, Document, NodeAttribute};
use crate::graph::Camera;

/// Encode a camera node.
///
/// The custom film-back dimensions are only applied when the aperture
/// format is `Custom`; presets carry their own.
pub fn create_camera(doc: &mut Document, name: &str, camera: &Camera) -> DocNodeId {
    let mut attribute = CameraAttribute::default();
    attribute.format = camera.camera_format;
    attribute.aperture_mode = camera.aperture_mode;
    attribute.field_of_view = camera.fov;
    attribute.focal_length = camera.focal_length;
    attribute.near_plane = camera.clipping_range.0;
    attribute.far_plane = camera.clipping_range.1;
    attribute.focus_distance = camera.focus_distance;
    attribute.projection = camera.projection;
    attribute.stereo = camera.role;
    attribute.set_aperture_format(camera.aperture_format);

    if camera.aperture_format == ApertureFormat::Custom {
        attribute.aperture_width = camera.aperture_width;
        attribute.aperture_height = camera.aperture_height;
        attribute.squeeze_ratio = camera.squeeze_ratio;
    }

    doc.create_node(name, NodeAttribute::Camera(Box::new(attribute)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ProjectionType, StereoRole};

    #[test]
    fn test_camera_intrinsics() {
        let mut doc = Document::new();
        let camera = Camera {
            fov: 60.0,
            clipping_range: (0.1, 500.0),
            projection: ProjectionType::Orthogonal,
            role: StereoRole::Stereo,
            ..Default::default()
        };
        let id = create_camera(&mut doc, "shot_cam", &camera);

        let attribute = doc.node(id).unwrap().camera().unwrap();
        assert_eq!(attribute.field_of_view, 60.0);
        assert_eq!(attribute.focal_length, 50.0);
        assert_eq!(attribute.near_plane, 0.1);
        assert_eq!(attribute.far_plane, 500.0);
        assert_eq!(attribute.projection, ProjectionType::Orthogonal);
        assert_eq!(attribute.stereo, StereoRole::Stereo);
    }

    #[test]
    fn test_preset_aperture_ignores_custom_size() {
        let mut doc = Document::new();
        let camera = Camera {
            aperture_format: ApertureFormat::Imax,
            aperture_width: 9.0,
            ..Default::default()
        };
        let id = create_camera(&mut doc, "cam", &camera);

        let attribute = doc.node(id).unwrap().camera().unwrap();
        assert_eq!(attribute.aperture_format(), ApertureFormat::Imax);
        assert_eq!(attribute.aperture_width, 2.772);
        assert_eq!(attribute.aperture_height, 2.072);
    }

    #[test]
    fn test_custom_aperture_applied() {
        let mut doc = Document::new();
        let camera = Camera {
            aperture_format: ApertureFormat::Custom,
            aperture_width: 1.2,
            aperture_height: 0.6,
            squeeze_ratio: 2.0,
            ..Default::default()
        };
        let id = create_camera(&mut doc, "cam", &camera);

        let attribute = doc.node(id).unwrap().camera().unwrap();
        assert_eq!(attribute.aperture_width, 1.2);
        assert_eq!(attribute.aperture_height, 0.6);
        assert_eq!(attribute.squeeze_ratio, 2.0);
    }
}
