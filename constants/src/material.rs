/// Seed entries for the material catalog.
/// Colours are 8-bit RGBA; alpha below 255 marks a translucent surface.
pub struct MaterialSeed {
    pub name: &'static str,
    pub ambient: [u8; 4],
    pub diffuse: [u8; 4],
    pub specular: [u8; 4],
}

const WHITE: [u8; 4] = [255, 255, 255, 255];

pub const DEFAULT_MATERIALS: &[MaterialSeed] = &[
    // Basic colours
    MaterialSeed {
        name: "Red",
        ambient: [255, 0, 0, 255],
        diffuse: [255, 0, 0, 255],
        specular: WHITE,
    },
    MaterialSeed {
        name: "Green",
        ambient: [0, 255, 0, 255],
        diffuse: [0, 255, 0, 255],
        specular: WHITE,
    },
    MaterialSeed {
        name: "Blue",
        ambient: [0, 0, 255, 255],
        diffuse: [0, 0, 255, 255],
        specular: WHITE,
    },
    MaterialSeed {
        name: "White",
        ambient: WHITE,
        diffuse: WHITE,
        specular: WHITE,
    },
    MaterialSeed {
        name: "Black",
        ambient: [0, 0, 0, 255],
        diffuse: [50, 50, 50, 255],
        specular: WHITE,
    },
    MaterialSeed {
        name: "Gray",
        ambient: [128, 128, 128, 255],
        diffuse: [128, 128, 128, 255],
        specular: WHITE,
    },
    // Metals
    MaterialSeed {
        name: "Steel",
        ambient: [100, 100, 100, 255],
        diffuse: [150, 150, 150, 255],
        specular: WHITE,
    },
    MaterialSeed {
        name: "Aluminum",
        ambient: [200, 200, 200, 255],
        diffuse: [220, 220, 220, 255],
        specular: WHITE,
    },
    MaterialSeed {
        name: "Gold",
        ambient: [255, 215, 0, 255],
        diffuse: [255, 215, 0, 255],
        specular: [255, 255, 200, 255],
    },
    MaterialSeed {
        name: "Copper",
        ambient: [184, 115, 51, 255],
        diffuse: [184, 115, 51, 255],
        specular: [255, 200, 150, 255],
    },
    // Common surfaces
    MaterialSeed {
        name: "Concrete",
        ambient: [150, 150, 150, 255],
        diffuse: [180, 180, 180, 255],
        specular: [100, 100, 100, 255],
    },
    MaterialSeed {
        name: "Wood",
        ambient: [139, 90, 43, 255],
        diffuse: [160, 110, 60, 255],
        specular: [100, 100, 100, 255],
    },
    MaterialSeed {
        name: "Plastic",
        ambient: [200, 200, 200, 255],
        diffuse: [220, 220, 220, 255],
        specular: WHITE,
    },
    MaterialSeed {
        name: "Glass",
        ambient: [200, 200, 255, 100],
        diffuse: [230, 230, 255, 100],
        specular: WHITE,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_names_are_unique() {
        let names: HashSet<_> = DEFAULT_MATERIALS.iter().map(|m| m.name).collect();
        assert_eq!(names.len(), DEFAULT_MATERIALS.len());
        assert_eq!(DEFAULT_MATERIALS.len(), 14);
    }

    #[test]
    fn only_glass_is_translucent() {
        for seed in DEFAULT_MATERIALS {
            let translucent = seed.ambient[3] < 255 || seed.diffuse[3] < 255;
            assert_eq!(translucent, seed.name == "Glass", "{}", seed.name);
        }
    }
}
