/// Always-valid default world used when generation or repair fails.
use crate::plan::{LightSpec, ModelSpec, PhysicsSpec, RotationSpec, Vec3Spec, WorldPlan};
use constants::scene::{
    DEFAULT_GRAVITY, DEFAULT_LIGHT_POSITION, DEFAULT_LIGHT_TYPE, DEFAULT_MAX_STEP_SIZE,
    DEFAULT_REAL_TIME_FACTOR, FALLBACK_COLOR_HEX, FALLBACK_MODEL_HEIGHT, FALLBACK_MODEL_NAME,
    FALLBACK_WORLD_NAME, SUN_NAME,
};

/// One red unit box resting on the ground, lit by a single sun.
pub fn default_plan() -> WorldPlan {
    let [lx, ly, lz] = DEFAULT_LIGHT_POSITION;

    WorldPlan {
        world_name: Some(FALLBACK_WORLD_NAME.to_string()),
        physics: Some(PhysicsSpec {
            gravity_vector: Some(DEFAULT_GRAVITY.to_string()),
            max_step_size: Some(DEFAULT_MAX_STEP_SIZE),
            real_time_factor: Some(DEFAULT_REAL_TIME_FACTOR),
        }),
        lighting: vec![LightSpec {
            name: Some(SUN_NAME.to_string()),
            kind: Some(DEFAULT_LIGHT_TYPE.to_string()),
            position: Some(Vec3Spec::new(lx, ly, lz)),
            diffuse_color: None,
        }],
        models: vec![ModelSpec {
            name: Some(FALLBACK_MODEL_NAME.to_string()),
            shape_kind: Some("box".to_string()),
            is_static: Some(false),
            position: Some(Vec3Spec::new(0.0, 0.0, FALLBACK_MODEL_HEIGHT)),
            rotation: Some(RotationSpec {
                roll: Some(0.0),
                pitch: Some(0.0),
                yaw: Some(0.0),
            }),
            scale: Some(Vec3Spec::new(1.0, 1.0, 1.0)),
            color_hex: Some(FALLBACK_COLOR_HEX.to_string()),
        }],
        ..Default::default()
    }
}
