//! Camera and skeleton node attributes.

use serde::{Deserialize, Serialize};

/// Output resolution preset of a camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraFormat {
    Custom,
    D1Ntsc,
    Ntsc,
    #[default]
    Pal,
    D1Pal,
    Hd,
    Res640x480,
    Res320x200,
    Res320x240,
    Res128x128,
    FullScreen,
}

/// Which film-back dimension the field of view is measured along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApertureMode {
    HorizAndVert,
    Horizontal,
    #[default]
    Vertical,
    FocalLength,
}

/// Film-back preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApertureFormat {
    Custom,
    Theatrical16mm,
    Super16mm,
    Academy35mm,
    TvProjection35mm,
    #[default]
    FullAperture35mm,
    Projection185Of35mm,
    Anamorphic35mm,
    Projection70mm,
    VistaVision,
    DynaVision,
    Imax,
}

impl ApertureFormat {
    /// Film-back width and height in inches, and the pixel squeeze ratio.
    /// `None` for `Custom`, whose dimensions come from the caller.
    pub fn film_back(self) -> Option<(f64, f64, f64)> {
        Some(match self {
            ApertureFormat::Custom => return None,
            ApertureFormat::Theatrical16mm => (0.404, 0.295, 1.0),
            ApertureFormat::Super16mm => (0.493, 0.292, 1.0),
            ApertureFormat::Academy35mm => (0.864, 0.630, 1.0),
            ApertureFormat::TvProjection35mm => (0.816, 0.612, 1.0),
            ApertureFormat::FullAperture35mm => (0.980, 0.735, 1.0),
            ApertureFormat::Projection185Of35mm => (0.825, 0.446, 1.0),
            ApertureFormat::Anamorphic35mm => (0.864, 0.732, 2.0),
            ApertureFormat::Projection70mm => (2.066, 0.906, 1.0),
            ApertureFormat::VistaVision => (1.485, 0.991, 1.0),
            ApertureFormat::DynaVision => (2.080, 1.480, 1.0),
            ApertureFormat::Imax => (2.772, 2.072, 1.0),
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionType {
    #[default]
    Perspective,
    Orthogonal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StereoRole {
    #[default]
    Mono,
    Stereo,
}

/// Native camera attribute.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CameraAttribute {
    pub format: CameraFormat,
    pub aperture_mode: ApertureMode,
    aperture_format: ApertureFormat,
    /// Film-back width in inches
    pub aperture_width: f64,
    /// Film-back height in inches
    pub aperture_height: f64,
    pub squeeze_ratio: f64,
    /// Degrees
    pub field_of_view: f64,
    /// Millimetres
    pub focal_length: f64,
    pub near_plane: f64,
    pub far_plane: f64,
    pub focus_distance: f64,
    pub projection: ProjectionType,
    pub stereo: StereoRole,
}

impl Default for CameraAttribute {
    fn default() -> Self {
        let mut camera = Self {
            format: CameraFormat::default(),
            aperture_mode: ApertureMode::default(),
            aperture_format: ApertureFormat::Custom,
            aperture_width: 1.0,
            aperture_height: 1.0,
            squeeze_ratio: 1.0,
            field_of_view: 25.115,
            focal_length: 34.89,
            near_plane: 10.0,
            far_plane: 4000.0,
            focus_distance: 200.0,
            projection: ProjectionType::default(),
            stereo: StereoRole::default(),
        };
        camera.set_aperture_format(ApertureFormat::default());
        camera
    }
}

impl CameraAttribute {
    /// Select a film-back preset, applying its dimensions.
    pub fn set_aperture_format(&mut self, format: ApertureFormat) {
        self.aperture_format = format;
        if let Some((width, height, squeeze)) = format.film_back() {
            self.aperture_width = width;
            self.aperture_height = height;
            self.squeeze_ratio = squeeze;
        }
    }

    pub fn aperture_format(&self) -> ApertureFormat {
        self.aperture_format
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkeletonType {
    Root,
    Limb,
    LimbNode,
    Effector,
}

/// Native skeleton attribute.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkeletonAttribute {
    pub skeleton_type: SkeletonType,
    /// Display size of the joint
    pub size: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_full_aperture() {
        let camera = CameraAttribute::default();
        assert_eq!(camera.aperture_format(), ApertureFormat::FullAperture35mm);
        assert!((camera.aperture_width - 0.980).abs() < 1e-12);
        assert!((camera.aperture_height - 0.735).abs() < 1e-12);
    }

    #[test]
    fn test_custom_keeps_dimensions() {
        let mut camera = CameraAttribute::default();
        camera.aperture_width = 2.0;
        camera.set_aperture_format(ApertureFormat::Custom);
        assert_eq!(camera.aperture_width, 2.0);

        camera.set_aperture_format(ApertureFormat::Anamorphic35mm);
        assert_eq!(camera.squeeze_ratio, 2.0);
    }
}
