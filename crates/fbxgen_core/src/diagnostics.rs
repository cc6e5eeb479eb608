//! Advisory diagnostics raised while building a document.
//!
//! Warnings never abort a build. Each one is logged through `log::warn!` and
//! kept on the produced [`Document`](crate::document::Document).

use serde::Serialize;
use thiserror::Error;

use crate::document::MappingMode;

/// A condition that still yields a usable, if imperfect, document.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum BuildWarning {
    #[error("unable to find primitive mapping for \"{node}\" of kind \"{kind}\", skipping it")]
    UnknownNodeKind { node: String, kind: String },

    #[error(
        "texture \"{texture}\" on material \"{material}\" uses UV set \"{uv_set}\", \
         which mesh \"{mesh}\" does not define"
    )]
    MissingUvSet {
        texture: String,
        material: String,
        uv_set: String,
        mesh: String,
    },

    #[error(
        "layer \"{layer}\" on mesh \"{mesh}\" is authored by polygon vertex, \
         but the mesh declares {declared:?}"
    )]
    ForcedLayerMapping {
        mesh: String,
        layer: String,
        declared: MappingMode,
    },
}
