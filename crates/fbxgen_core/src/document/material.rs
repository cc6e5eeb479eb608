//! Native surface materials and file textures.

use fbxgen_math::DVec2;
use serde::Serialize;

use super::props::{DocProperty, PropertyTable};
use crate::property::DataType;

/// Index of a material in its document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MaterialId(pub(crate) usize);

impl MaterialId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a texture in its document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TextureId(pub(crate) usize);

impl TextureId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ShadingModel {
    Lambert,
    Phong,
}

const LAMBERT_CHANNELS: &[(&str, DataType)] = &[
    ("Emissive", DataType::Double3),
    ("EmissiveFactor", DataType::Double),
    ("Ambient", DataType::Double3),
    ("AmbientFactor", DataType::Double),
    ("Diffuse", DataType::Double3),
    ("DiffuseFactor", DataType::Double),
    ("NormalMap", DataType::Double3),
    ("Bump", DataType::Double3),
    ("BumpFactor", DataType::Double),
    ("TransparentColor", DataType::Double3),
    ("TransparencyFactor", DataType::Double),
    ("DisplacementColor", DataType::Double3),
    ("DisplacementFactor", DataType::Double),
    ("VectorDisplacementColor", DataType::Double3),
    ("VectorDisplacementFactor", DataType::Double),
];

const PHONG_CHANNELS: &[(&str, DataType)] = &[
    ("Specular", DataType::Double3),
    ("SpecularFactor", DataType::Double),
    ("Shininess", DataType::Double),
    ("Reflection", DataType::Double3),
    ("ReflectionFactor", DataType::Double),
];

/// Native surface material with its shading channels as properties.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SurfaceMaterial {
    pub name: String,
    pub shading_model: ShadingModel,
    pub properties: PropertyTable,
    /// (channel name, texture) connections
    pub textures: Vec<(String, TextureId)>,
}

impl SurfaceMaterial {
    /// Create a material carrying every channel of its shading model.
    pub fn new(name: impl Into<String>, shading_model: ShadingModel) -> Self {
        let mut properties = PropertyTable::new();
        let phong: &[(&str, DataType)] = match shading_model {
            ShadingModel::Lambert => &[],
            ShadingModel::Phong => PHONG_CHANNELS,
        };
        for &(channel, data_type) in LAMBERT_CHANNELS.iter().chain(phong) {
            properties.insert(DocProperty::new(channel, data_type, channel));
        }
        Self {
            name: name.into(),
            shading_model,
            properties,
            textures: Vec::new(),
        }
    }

    pub fn has_channel(&self, channel: &str) -> bool {
        self.properties.find(channel).is_some()
    }

    pub fn connect_texture(&mut self, channel: impl Into<String>, texture: TextureId) {
        self.textures.push((channel.into(), texture));
    }

    /// Textures connected to `channel`.
    pub fn textures_on<'a>(&'a self, channel: &'a str) -> impl Iterator<Item = TextureId> + 'a {
        self.textures
            .iter()
            .filter(move |(c, _)| c == channel)
            .map(|(_, t)| *t)
    }
}

/// A texture read from an image file, mapped through a UV set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FileTexture {
    pub name: String,
    pub file_name: String,
    pub uv_set: String,
    pub swap_uv: bool,
    pub translation: DVec2,
    pub scale: DVec2,
    pub rotation: DVec2,
}

impl FileTexture {
    pub fn new(name: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            uv_set: "default".to_string(),
            swap_uv: false,
            translation: DVec2::ZERO,
            scale: DVec2::ONE,
            rotation: DVec2::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_by_shading_model() {
        let lambert = SurfaceMaterial::new("l", ShadingModel::Lambert);
        let phong = SurfaceMaterial::new("p", ShadingModel::Phong);
        assert!(lambert.has_channel("Diffuse"));
        assert!(!lambert.has_channel("Specular"));
        assert!(phong.has_channel("Specular"));
        assert!(phong.has_channel("TransparencyFactor"));
        assert_eq!(phong.properties.len(), lambert.properties.len() + 5);
    }

    #[test]
    fn test_texture_connections() {
        let mut material = SurfaceMaterial::new("m", ShadingModel::Lambert);
        material.connect_texture("Diffuse", TextureId(0));
        material.connect_texture("Bump", TextureId(1));
        material.connect_texture("Diffuse", TextureId(2));
        let diffuse: Vec<_> = material.textures_on("Diffuse").collect();
        assert_eq!(diffuse, vec![TextureId(0), TextureId(2)]);

        let channel = String::from("Bump");
        let bump: Vec<_> = material.textures_on(&channel).collect();
        assert_eq!(bump, vec![TextureId(1)]);
    }
}
