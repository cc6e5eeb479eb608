//! Export configuration.
//!
//! [`Settings`] is copied into the document's global settings before any
//! node is instantiated, and drives the export hand-off afterwards.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Container variant handed to the writer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileFormat {
    #[default]
    Binary,
    Ascii,
}

impl FileFormat {
    /// Writer description used to select the matching writer plugin.
    pub fn description(self) -> &'static str {
        match self {
            FileFormat::Binary => "FBX binary (*.fbx)",
            FileFormat::Ascii => "FBX ascii (*.fbx)",
        }
    }
}

/// Sign of an axis direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Positive,
    Negative,
}

/// Up axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpAxis {
    X,
    Y,
    Z,
}

/// Which of the two remaining axes is the front axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrontParity {
    Even,
    Odd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    RightHanded,
    LeftHanded,
}

/// A signed up axis, as stored for the original-up-axis override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpVector {
    pub axis: UpAxis,
    pub sign: Sign,
}

/// Coordinate system declared by the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisSystem {
    pub up: UpVector,
    pub front: FrontParity,
    pub front_sign: Sign,
    pub handedness: Handedness,
}

impl AxisSystem {
    pub fn new(
        up: UpAxis,
        up_sign: Sign,
        front: FrontParity,
        front_sign: Sign,
        handedness: Handedness,
    ) -> Self {
        Self {
            up: UpVector { axis: up, sign: up_sign },
            front,
            front_sign,
            handedness,
        }
    }

    pub fn maya_y_up() -> Self {
        Self::new(
            UpAxis::Y,
            Sign::Positive,
            FrontParity::Odd,
            Sign::Positive,
            Handedness::RightHanded,
        )
    }

    pub fn maya_z_up() -> Self {
        Self::new(
            UpAxis::Z,
            Sign::Positive,
            FrontParity::Odd,
            Sign::Negative,
            Handedness::RightHanded,
        )
    }

    pub fn max() -> Self {
        Self::maya_z_up()
    }

    pub fn motion_builder() -> Self {
        Self::maya_y_up()
    }

    pub fn opengl() -> Self {
        Self::maya_y_up()
    }

    pub fn directx() -> Self {
        Self::new(
            UpAxis::Y,
            Sign::Positive,
            FrontParity::Odd,
            Sign::Positive,
            Handedness::LeftHanded,
        )
    }

    pub fn lightwave() -> Self {
        Self::directx()
    }
}

impl Default for AxisSystem {
    fn default() -> Self {
        Self::maya_y_up()
    }
}

/// Linear unit, expressed as centimetres per unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemUnit {
    pub scale_factor: f64,
    pub multiplier: f64,
}

impl SystemUnit {
    pub fn new(scale_factor: f64) -> Self {
        Self {
            scale_factor,
            multiplier: 1.0,
        }
    }

    pub fn mm() -> Self {
        Self::new(0.1)
    }

    pub fn cm() -> Self {
        Self::new(1.0)
    }

    pub fn dm() -> Self {
        Self::new(10.0)
    }

    pub fn m() -> Self {
        Self::new(100.0)
    }

    pub fn km() -> Self {
        Self::new(100_000.0)
    }

    pub fn inch() -> Self {
        Self::new(2.54)
    }

    pub fn foot() -> Self {
        Self::new(30.48)
    }

    pub fn yard() -> Self {
        Self::new(91.44)
    }

    pub fn mile() -> Self {
        Self::new(160_934.4)
    }

    /// Metres per unit, the figure consuming runtimes usually want.
    pub fn meters_per_unit(&self) -> f64 {
        self.scale_factor * self.multiplier / 100.0
    }
}

impl Default for SystemUnit {
    fn default() -> Self {
        Self::cm()
    }
}

/// Build and export settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Destination handed to the writer
    pub file_path: PathBuf,

    /// Binary or ASCII container
    pub file_format: FileFormat,

    /// Compatibility tag, e.g. `FBX201600`
    pub compatibility: String,

    /// Declared coordinate system
    pub axis: AxisSystem,

    /// Optional original up axis recorded alongside `axis`
    pub original_axis: Option<AxisSystem>,

    /// Linear unit
    pub units: SystemUnit,

    /// Animation layers created on the root animation stack
    pub anim_layers: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file_path: PathBuf::new(),
            file_format: FileFormat::Binary,
            compatibility: "FBX202000".to_string(),
            axis: AxisSystem::maya_y_up(),
            original_axis: None,
            units: SystemUnit::cm(),
            anim_layers: Vec::new(),
        }
    }
}

impl Settings {
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = path.into();
        self
    }

    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.file_format = format;
        self
    }

    pub fn with_compatibility(mut self, tag: impl Into<String>) -> Self {
        self.compatibility = tag.into();
        self
    }

    pub fn with_axis(mut self, axis: AxisSystem) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_original_axis(mut self, axis: AxisSystem) -> Self {
        self.original_axis = Some(axis);
        self
    }

    pub fn with_units(mut self, units: SystemUnit) -> Self {
        self.units = units;
        self
    }

    pub fn with_anim_layers<I, S>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.anim_layers = layers.into_iter().map(Into::into).collect();
        self
    }
}
