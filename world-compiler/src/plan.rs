/// World plan data model.
/// Every field is optional on the wire; defaults are resolved when read.
use constants::scene::{
    DEFAULT_COLOR_HEX, DEFAULT_DIFFUSE, DEFAULT_GRAVITY, DEFAULT_LIGHT_NAME,
    DEFAULT_LIGHT_POSITION, DEFAULT_LIGHT_TYPE, DEFAULT_MAX_STEP_SIZE, DEFAULT_MODEL_NAME,
    DEFAULT_REAL_TIME_FACTOR, DEFAULT_WORLD_NAME,
};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reads a field of any JSON type, keeping it only when it fits `T`.
/// A value of the wrong type behaves as if the key were absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Reads a list leniently: a non-array is empty, a malformed entry is all-defaults.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

/// Geometry kinds the scene compiler knows how to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeKind {
    #[default]
    Box,
    Sphere,
    Cylinder,
}

impl ShapeKind {
    /// Unknown names resolve to a box.
    pub fn from_name(name: &str) -> Self {
        match name {
            "sphere" => ShapeKind::Sphere,
            "cylinder" => ShapeKind::Cylinder,
            _ => ShapeKind::Box,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Box => "box",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cylinder => "cylinder",
        }
    }
}

/// Three optional components, each defaulted independently.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3Spec {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Vec3Spec {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    pub fn resolve(&self, default: [f64; 3]) -> [f64; 3] {
        [
            self.x.unwrap_or(default[0]),
            self.y.unwrap_or(default[1]),
            self.z.unwrap_or(default[2]),
        ]
    }
}

/// Roll, pitch, yaw in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RotationSpec {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub roll: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f64>,
}

impl RotationSpec {
    pub fn resolve(&self) -> [f64; 3] {
        [
            self.roll.unwrap_or(0.0),
            self.pitch.unwrap_or(0.0),
            self.yaw.unwrap_or(0.0),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicsSpec {
    /// Three space-separated floats, e.g. "0 0 -9.81".
    #[serde(
        rename = "gravity",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub gravity_vector: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub max_step_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub real_time_factor: Option<f64>,
}

impl PhysicsSpec {
    pub fn gravity_vector(&self) -> &str {
        self.gravity_vector.as_deref().unwrap_or(DEFAULT_GRAVITY)
    }

    pub fn max_step_size(&self) -> f64 {
        self.max_step_size.unwrap_or(DEFAULT_MAX_STEP_SIZE)
    }

    pub fn real_time_factor(&self) -> f64 {
        self.real_time_factor.unwrap_or(DEFAULT_REAL_TIME_FACTOR)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LightSpec {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3Spec>,
    /// Four space-separated floats, e.g. "1 1 1 1".
    #[serde(
        rename = "diffuse",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub diffuse_color: Option<String>,
}

impl LightSpec {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_LIGHT_NAME)
    }

    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(DEFAULT_LIGHT_TYPE)
    }

    pub fn position(&self) -> [f64; 3] {
        self.position
            .unwrap_or_default()
            .resolve(DEFAULT_LIGHT_POSITION)
    }

    pub fn diffuse_color(&self) -> &str {
        self.diffuse_color.as_deref().unwrap_or(DEFAULT_DIFFUSE)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelSpec {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub shape_kind: Option<String>,
    #[serde(
        rename = "static",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_static: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3Spec>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub rotation: Option<RotationSpec>,
    /// Box size, sphere radius (x) or cylinder radius (x) and length (z).
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3Spec>,
    #[serde(
        rename = "color",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub color_hex: Option<String>,
}

impl ModelSpec {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_MODEL_NAME)
    }

    pub fn shape_kind(&self) -> ShapeKind {
        self.shape_kind
            .as_deref()
            .map_or(ShapeKind::Box, ShapeKind::from_name)
    }

    pub fn is_static(&self) -> bool {
        self.is_static.unwrap_or(false)
    }

    pub fn position(&self) -> [f64; 3] {
        self.position.unwrap_or_default().resolve([0.0; 3])
    }

    pub fn rotation(&self) -> [f64; 3] {
        self.rotation.unwrap_or_default().resolve()
    }

    pub fn scale(&self) -> [f64; 3] {
        self.scale.unwrap_or_default().resolve([1.0; 3])
    }

    pub fn color_hex(&self) -> &str {
        self.color_hex.as_deref().unwrap_or(DEFAULT_COLOR_HEX)
    }
}

/// Root of a generated scene description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPlan {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Key emitted by the generator template; `name` wins when both are set.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub world_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub physics: Option<PhysicsSpec>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub lighting: Vec<LightSpec>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub models: Vec<ModelSpec>,
}

impl WorldPlan {
    pub fn name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.world_name.as_deref())
            .unwrap_or(DEFAULT_WORLD_NAME)
    }

    pub fn physics(&self) -> PhysicsSpec {
        self.physics.clone().unwrap_or_default()
    }
}
