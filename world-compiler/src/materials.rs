/// Named material registry consulted by the property editor path.
use constants::material::DEFAULT_MATERIALS;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_array(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        let alpha = if digits.len() == 8 { channel(6)? } else { 255 };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    pub fn is_translucent(&self) -> bool {
        self.a < u8::MAX
    }

    /// Normalised `r g b a` as used in scene documents.
    pub fn to_sdf_string(&self) -> String {
        let f = |c: u8| c as f64 / 255.0;
        format!("{} {} {} {}", f(self.r), f(self.g), f(self.b), f(self.a))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: Rgba,
    pub diffuse: Rgba,
    pub specular: Rgba,
}

impl Material {
    /// Scene-document `<material>` block for this entry.
    pub fn to_sdf(&self) -> String {
        format!(
            "<material>\n  <ambient>{}</ambient>\n  <diffuse>{}</diffuse>\n  <specular>{}</specular>\n</material>\n",
            self.ambient.to_sdf_string(),
            self.diffuse.to_sdf_string(),
            self.specular.to_sdf_string()
        )
    }
}

/// Process-lifetime catalog, seeded once and upserted by name afterwards.
/// Writers are serialised through a single lock.
#[derive(Debug)]
pub struct MaterialCatalog {
    materials: Mutex<HashMap<String, Material>>,
}

impl MaterialCatalog {
    pub fn new() -> Self {
        let materials = DEFAULT_MATERIALS
            .iter()
            .map(|seed| {
                let material = Material {
                    name: seed.name.to_string(),
                    ambient: Rgba::from_array(seed.ambient),
                    diffuse: Rgba::from_array(seed.diffuse),
                    specular: Rgba::from_array(seed.specular),
                };
                (material.name.clone(), material)
            })
            .collect::<HashMap<_, _>>();

        info!("Initialized {} default materials", materials.len());
        Self {
            materials: Mutex::new(materials),
        }
    }

    /// Inserts or replaces the material called `name`.
    pub fn create(&self, name: &str, ambient: Rgba, diffuse: Rgba, specular: Rgba) {
        let material = Material {
            name: name.to_string(),
            ambient,
            diffuse,
            specular,
        };
        self.materials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), material);
    }

    pub fn lookup(&self, name: &str) -> Option<Material> {
        self.materials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn names(&self) -> BTreeSet<String> {
        self.materials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.materials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::new()
    }
}
