//! Surface material and file texture encoding.

use fbxgen_math::DVec3;

use crate::diagnostics::BuildWarning;
use crate::document::{Document, FileTexture, MaterialId, ShadingModel, SurfaceMaterial};
use crate::material::Material;
use crate::property::PropertyValue;

use super::{EncodeError, EncodeResult};

/// Encode a material and its textures into the document.
///
/// `uv_sets` are the UV set names of the consuming mesh; a texture mapped
/// through any other set is still created but raises a warning.
pub fn create_material(
    doc: &mut Document,
    material: &Material,
    uv_sets: &[&str],
    mesh: &str,
) -> EncodeResult<MaterialId> {
    let shading_model = match material {
        Material::Lambert(_) => ShadingModel::Lambert,
        Material::Phong(_) => ShadingModel::Phong,
    };
    let mut surface = SurfaceMaterial::new(material.name(), shading_model);

    let lambert = material.lambert();
    let colors = [
        ("Emissive", lambert.emissive),
        ("Ambient", lambert.ambient),
        ("Diffuse", lambert.diffuse),
        ("NormalMap", lambert.normal_map),
        ("Bump", lambert.bump),
        ("TransparentColor", lambert.transparent_color),
        ("DisplacementColor", lambert.displacement_color),
        ("VectorDisplacementColor", lambert.vector_displacement_color),
    ];
    let factors = [
        ("EmissiveFactor", lambert.emissive_factor),
        ("AmbientFactor", lambert.ambient_factor),
        ("DiffuseFactor", lambert.diffuse_factor),
        ("BumpFactor", lambert.bump_factor),
        ("TransparencyFactor", lambert.transparency_factor),
        ("DisplacementFactor", lambert.displacement_factor),
        ("VectorDisplacementFactor", lambert.vector_displacement_factor),
    ];
    set_colors(&mut surface, &colors)?;
    set_factors(&mut surface, &factors)?;

    if let Material::Phong(phong) = material {
        set_colors(
            &mut surface,
            &[("Specular", phong.specular), ("Reflection", phong.reflection)],
        )?;
        set_factors(
            &mut surface,
            &[
                ("SpecularFactor", phong.specular_factor),
                ("Shininess", phong.shininess),
                ("ReflectionFactor", phong.reflection_factor),
            ],
        )?;
    }

    for texture in material.textures() {
        if !surface.has_channel(&texture.channel) {
            return Err(EncodeError::UnknownMaterialChannel {
                material: surface.name.clone(),
                channel: texture.channel.clone(),
            });
        }
        if !uv_sets.contains(&texture.uv_set.as_str()) {
            doc.warn(BuildWarning::MissingUvSet {
                texture: texture.name.clone(),
                material: surface.name.clone(),
                uv_set: texture.uv_set.clone(),
                mesh: mesh.to_string(),
            });
        }

        let mut file_texture =
            FileTexture::new(texture.name.as_str(), texture.path.display().to_string());
        file_texture.uv_set = texture.uv_set.clone();
        let texture_id = doc.add_texture(file_texture);
        surface.connect_texture(texture.channel.as_str(), texture_id);
    }

    Ok(doc.add_material(surface))
}

fn set_channel(
    surface: &mut SurfaceMaterial,
    channel: &str,
    value: PropertyValue,
) -> EncodeResult<()> {
    if let Some(property) = surface.properties.find_mut(channel) {
        if property.set(&value) {
            return Ok(());
        }
    }
    Err(EncodeError::UnknownMaterialChannel {
        material: surface.name.clone(),
        channel: channel.to_string(),
    })
}

fn set_colors(surface: &mut SurfaceMaterial, colors: &[(&str, DVec3)]) -> EncodeResult<()> {
    for &(channel, color) in colors {
        set_channel(surface, channel, PropertyValue::Double3(color))?;
    }
    Ok(())
}

fn set_factors(surface: &mut SurfaceMaterial, factors: &[(&str, f64)]) -> EncodeResult<()> {
    for &(channel, factor) in factors {
        set_channel(surface, channel, PropertyValue::Float(factor))?;
    }
    Ok(())
}
