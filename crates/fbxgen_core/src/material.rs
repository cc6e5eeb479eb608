//! Surface materials as described by the caller.

use std::path::PathBuf;

use fbxgen_math::DVec3;
use serde::{Deserialize, Serialize};

/// A texture file bound to one material channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureChannel {
    /// Image file path
    pub path: PathBuf,

    /// Material channel to connect to, e.g. "Diffuse"
    pub channel: String,

    /// Texture object name
    pub name: String,

    /// UV set of the consuming mesh this texture is mapped through
    pub uv_set: String,
}

impl TextureChannel {
    pub fn new(path: impl Into<PathBuf>, channel: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            channel: channel.into(),
            name: "My Texture".to_string(),
            uv_set: "default".to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_uv_set(mut self, uv_set: impl Into<String>) -> Self {
        self.uv_set = uv_set.into();
        self
    }
}

/// Lambert shading coefficients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LambertMaterial {
    pub name: String,
    pub emissive: DVec3,
    pub emissive_factor: f64,
    pub ambient: DVec3,
    pub ambient_factor: f64,
    pub diffuse: DVec3,
    pub diffuse_factor: f64,
    pub normal_map: DVec3,
    pub bump: DVec3,
    pub bump_factor: f64,
    pub transparent_color: DVec3,
    pub transparency_factor: f64,
    pub displacement_color: DVec3,
    pub displacement_factor: f64,
    pub vector_displacement_color: DVec3,
    pub vector_displacement_factor: f64,
    pub textures: Vec<TextureChannel>,
}

impl Default for LambertMaterial {
    fn default() -> Self {
        Self {
            name: "lambert".to_string(),
            emissive: DVec3::ZERO,
            emissive_factor: 0.0,
            ambient: DVec3::ZERO,
            ambient_factor: 0.0,
            diffuse: DVec3::splat(0.5),
            diffuse_factor: 1.0,
            normal_map: DVec3::ZERO,
            bump: DVec3::ZERO,
            bump_factor: 1.0,
            transparent_color: DVec3::ZERO,
            transparency_factor: 0.0,
            displacement_color: DVec3::ZERO,
            displacement_factor: 0.0,
            vector_displacement_color: DVec3::ZERO,
            vector_displacement_factor: 0.0,
            textures: Vec::new(),
        }
    }
}

impl LambertMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_diffuse(mut self, diffuse: DVec3) -> Self {
        self.diffuse = diffuse;
        self
    }

    pub fn with_texture(mut self, texture: TextureChannel) -> Self {
        self.textures.push(texture);
        self
    }
}

/// Phong shading: Lambert plus a specular/reflection lobe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhongMaterial {
    pub lambert: LambertMaterial,
    pub specular: DVec3,
    pub specular_factor: f64,
    pub shininess: f64,
    pub reflection: DVec3,
    pub reflection_factor: f64,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            lambert: LambertMaterial::new("phong"),
            specular: DVec3::splat(0.2),
            specular_factor: 1.0,
            shininess: 20.0,
            reflection: DVec3::ZERO,
            reflection_factor: 1.0,
        }
    }
}

impl PhongMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            lambert: LambertMaterial::new(name),
            ..Default::default()
        }
    }
}

/// A material assignable to mesh polygons.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Material {
    Lambert(LambertMaterial),
    Phong(PhongMaterial),
}

impl Material {
    /// The Lambert part shared by both shading models.
    pub fn lambert(&self) -> &LambertMaterial {
        match self {
            Material::Lambert(lambert) => lambert,
            Material::Phong(phong) => &phong.lambert,
        }
    }

    pub fn name(&self) -> &str {
        &self.lambert().name
    }

    pub fn textures(&self) -> &[TextureChannel] {
        &self.lambert().textures
    }
}

impl From<LambertMaterial> for Material {
    fn from(material: LambertMaterial) -> Self {
        Material::Lambert(material)
    }
}

impl From<PhongMaterial> for Material {
    fn from(material: PhongMaterial) -> Self {
        Material::Phong(material)
    }
}
