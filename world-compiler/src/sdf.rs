/// Scene document generation from validated world plans.
use crate::plan::{LightSpec, ModelSpec, PhysicsSpec, ShapeKind, WorldPlan};
use constants::scene::{
    DEFAULT_DIFFUSE, DEFAULT_LIGHT_POSITION, DEFAULT_LIGHT_TYPE, SDF_VERSION, SUN_DIRECTION,
    SUN_NAME, SUN_SPECULAR,
};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error, PartialEq)]
pub enum CompileError {
    #[error("Empty world plan")]
    EmptyPlan,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to open file for writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Escapes the five XML special characters in a single pass.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Shortest round-trip decimal form, used for every number in the document.
fn num(value: f64) -> String {
    format!("{}", value)
}

fn triple(values: [f64; 3]) -> String {
    format!("{} {} {}", num(values[0]), num(values[1]), num(values[2]))
}

/// Deterministic world plan to SDF compiler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SceneCompiler;

impl SceneCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Compiles a complete world document.
    /// Only an absent plan is an error; sparse plans compile with defaults.
    pub fn compile(&self, plan: Option<&WorldPlan>) -> Result<String, CompileError> {
        let Some(plan) = plan else {
            error!("Empty world plan provided");
            return Err(CompileError::EmptyPlan);
        };

        info!(
            "Building SDF world '{}' ({} models, {} lights)",
            plan.name(),
            plan.models.len(),
            plan.lighting.len()
        );

        let mut sdf = String::new();
        sdf.push_str("<?xml version=\"1.0\" ?>\n");
        sdf.push_str(&format!("<sdf version=\"{}\">\n", SDF_VERSION));
        sdf.push_str(&format!("  <world name=\"{}\">\n", escape_xml(plan.name())));
        sdf.push_str(&self.physics_section(&plan.physics()));
        sdf.push_str(&self.lighting_section(&plan.lighting));
        for model in &plan.models {
            sdf.push_str(&self.compile_model(model));
        }
        sdf.push_str("  </world>\n");
        sdf.push_str("</sdf>\n");

        info!("SDF world generated successfully");
        Ok(sdf)
    }

    /// Emits a single `<model>` element, e.g. for adding one object to an open scene.
    pub fn compile_model(&self, model: &ModelSpec) -> String {
        let mut result = format!("    <model name=\"{}\">\n", escape_xml(model.name()));

        let [x, y, z] = model.position();
        let [roll, pitch, yaw] = model.rotation();
        result.push_str(&format!(
            "      <pose>{} {} {} {} {} {}</pose>\n",
            num(x),
            num(y),
            num(z),
            num(roll),
            num(pitch),
            num(yaw)
        ));

        if model.is_static() {
            result.push_str("      <static>true</static>\n");
        }

        let geometry = geometry_element(model.shape_kind(), model.scale());

        result.push_str("      <link name=\"link\">\n");

        result.push_str("        <visual name=\"visual\">\n");
        result.push_str(&geometry);
        let color = model.color_hex();
        if !color.is_empty() {
            let color = escape_xml(color);
            result.push_str("          <material>\n");
            result.push_str(&format!("            <ambient>{}</ambient>\n", color));
            result.push_str(&format!("            <diffuse>{}</diffuse>\n", color));
            result.push_str("          </material>\n");
        }
        result.push_str("        </visual>\n");

        result.push_str("        <collision name=\"collision\">\n");
        result.push_str(&geometry);
        result.push_str("        </collision>\n");

        result.push_str("      </link>\n");
        result.push_str("    </model>\n");
        result
    }

    /// Writes a document, creating parent directories and replacing any existing file.
    pub fn save_document(&self, content: &str, path: &Path) -> Result<(), SaveError> {
        info!("Saving SDF to: {}", path.display());

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SaveError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, content).map_err(|source| {
            let err = SaveError::Write {
                path: path.to_path_buf(),
                source,
            };
            error!("{}", err);
            err
        })?;

        info!("SDF saved successfully");
        Ok(())
    }

    fn physics_section(&self, physics: &PhysicsSpec) -> String {
        format!(
            "    <physics type=\"ode\">\n\
             \x20     <max_step_size>{}</max_step_size>\n\
             \x20     <real_time_factor>{}</real_time_factor>\n\
             \x20     <gravity>{}</gravity>\n\
             \x20   </physics>\n",
            num(physics.max_step_size()),
            num(physics.real_time_factor()),
            escape_xml(physics.gravity_vector())
        )
    }

    fn lighting_section(&self, lights: &[LightSpec]) -> String {
        if lights.is_empty() {
            return default_sun();
        }

        let mut result = String::new();
        for light in lights {
            result.push_str(&format!(
                "    <light type=\"{}\" name=\"{}\">\n",
                escape_xml(light.kind()),
                escape_xml(light.name())
            ));
            result.push_str(&format!("      <pose>{} 0 0 0</pose>\n", triple(light.position())));
            result.push_str(&format!(
                "      <diffuse>{}</diffuse>\n",
                escape_xml(light.diffuse_color())
            ));
            result.push_str("    </light>\n");
        }
        result
    }
}

fn default_sun() -> String {
    format!(
        "    <light type=\"{}\" name=\"{}\">\n\
         \x20     <pose>{} 0 0 0</pose>\n\
         \x20     <diffuse>{}</diffuse>\n\
         \x20     <specular>{}</specular>\n\
         \x20     <direction>{}</direction>\n\
         \x20   </light>\n",
        DEFAULT_LIGHT_TYPE,
        SUN_NAME,
        triple(DEFAULT_LIGHT_POSITION),
        DEFAULT_DIFFUSE,
        SUN_SPECULAR,
        triple(SUN_DIRECTION)
    )
}

/// Shared by visual and collision so both always describe the same solid.
fn geometry_element(shape: ShapeKind, scale: [f64; 3]) -> String {
    let [sx, sy, sz] = scale;
    let body = match shape {
        ShapeKind::Box => format!("<box><size>{} {} {}</size></box>", num(sx), num(sy), num(sz)),
        ShapeKind::Sphere => format!("<sphere><radius>{}</radius></sphere>", num(sx)),
        ShapeKind::Cylinder => format!(
            "<cylinder><radius>{}</radius><length>{}</length></cylinder>",
            num(sx),
            num(sz)
        ),
    };
    format!("          <geometry>\n            {}\n          </geometry>\n", body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::default_plan;
    use crate::plan::Vec3Spec;

    fn unescape_xml(text: &str) -> String {
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&")
    }

    fn plan_with(models: Vec<ModelSpec>) -> WorldPlan {
        WorldPlan {
            name: Some("test".into()),
            models,
            ..Default::default()
        }
    }

    #[test]
    fn absent_plan_is_an_error() {
        assert_eq!(SceneCompiler::new().compile(None), Err(CompileError::EmptyPlan));
    }

    #[test]
    fn document_sections_are_ordered() {
        let sdf = SceneCompiler::new().compile(Some(&default_plan())).unwrap();

        assert!(sdf.starts_with("<?xml version=\"1.0\" ?>\n<sdf version=\"1.9\">\n"));
        assert!(sdf.ends_with("  </world>\n</sdf>\n"));

        let world = sdf.find("<world name=\"default\">").unwrap();
        let physics = sdf.find("<physics type=\"ode\">").unwrap();
        let light = sdf.find("<light ").unwrap();
        let model = sdf.find("<model ").unwrap();
        assert!(world < physics && physics < light && light < model);
    }

    #[test]
    fn empty_model_list_gets_one_default_sun() {
        let sdf = SceneCompiler::new().compile(Some(&plan_with(vec![]))).unwrap();

        assert!(!sdf.contains("<model"));
        assert_eq!(sdf.matches("<light ").count(), 1);
        assert!(sdf.contains("<light type=\"directional\" name=\"sun\">"));
        assert!(sdf.contains("<direction>-0.5 0.1 -0.9</direction>"));
        assert!(sdf.contains("<pose>0 0 10 0 0 0</pose>"));
    }

    #[test]
    fn physics_defaults() {
        let sdf = SceneCompiler::new().compile(Some(&plan_with(vec![]))).unwrap();
        assert!(sdf.contains("<max_step_size>0.001</max_step_size>"));
        assert!(sdf.contains("<real_time_factor>1</real_time_factor>"));
        assert!(sdf.contains("<gravity>0 0 -9.81</gravity>"));
    }

    #[test]
    fn declared_lights_replace_the_sun() {
        let plan = WorldPlan {
            lighting: vec![
                LightSpec {
                    name: Some("lamp".into()),
                    kind: Some("point".into()),
                    position: Some(Vec3Spec::new(1.0, 2.0, 3.5)),
                    diffuse_color: Some("0.8 0.8 0.6 1".into()),
                },
                LightSpec::default(),
            ],
            ..plan_with(vec![])
        };
        let sdf = SceneCompiler::new().compile(Some(&plan)).unwrap();

        assert_eq!(sdf.matches("<light ").count(), 2);
        assert!(!sdf.contains("name=\"sun\""));
        assert!(sdf.contains("<light type=\"point\" name=\"lamp\">"));
        assert!(sdf.contains("<pose>1 2 3.5 0 0 0</pose>"));
        assert!(sdf.contains("<diffuse>0.8 0.8 0.6 1</diffuse>"));
        assert!(sdf.contains("<light type=\"directional\" name=\"light\">"));
    }

    #[test]
    fn sphere_uses_only_the_x_scale() {
        let model = ModelSpec {
            shape_kind: Some("sphere".into()),
            scale: Some(Vec3Spec::new(2.0, 9.0, 9.0)),
            ..Default::default()
        };
        let sdf = SceneCompiler::new().compile_model(&model);

        assert_eq!(sdf.matches("<sphere><radius>2</radius></sphere>").count(), 2);
        assert!(!sdf.contains('9'));
    }

    #[test]
    fn cylinder_uses_x_radius_and_z_length() {
        let model = ModelSpec {
            shape_kind: Some("cylinder".into()),
            scale: Some(Vec3Spec::new(0.25, 7.0, 1.5)),
            ..Default::default()
        };
        let sdf = SceneCompiler::new().compile_model(&model);
        assert_eq!(
            sdf.matches("<cylinder><radius>0.25</radius><length>1.5</length></cylinder>")
                .count(),
            2
        );
    }

    #[test]
    fn box_size_is_the_literal_scale() {
        let model = ModelSpec {
            scale: Some(Vec3Spec::new(2.0, 0.5, 3.0)),
            ..Default::default()
        };
        let sdf = SceneCompiler::new().compile_model(&model);
        assert_eq!(sdf.matches("<box><size>2 0.5 3</size></box>").count(), 2);
    }

    #[test]
    fn pose_and_static_flag() {
        let mut model = ModelSpec {
            position: Some(Vec3Spec::new(1.0, -2.0, 0.5)),
            rotation: Some(crate::plan::RotationSpec {
                roll: None,
                pitch: Some(0.1),
                yaw: Some(1.5708),
            }),
            ..Default::default()
        };
        let sdf = SceneCompiler::new().compile_model(&model);
        assert!(sdf.contains("<pose>1 -2 0.5 0 0.1 1.5708</pose>"));
        assert!(!sdf.contains("<static>"));

        model.is_static = Some(true);
        let sdf = SceneCompiler::new().compile_model(&model);
        assert!(sdf.contains("<static>true</static>"));
        assert!(sdf.find("<pose>").unwrap() < sdf.find("<static>").unwrap());
        assert!(sdf.find("<static>").unwrap() < sdf.find("<link ").unwrap());
    }

    #[test]
    fn material_only_on_visual() {
        let model = ModelSpec {
            color_hex: Some("#00FF00".into()),
            ..Default::default()
        };
        let sdf = SceneCompiler::new().compile_model(&model);

        let collision = sdf.find("<collision").unwrap();
        let material = sdf.find("<material>").unwrap();
        assert!(material < collision);
        assert!(sdf.contains("<ambient>#00FF00</ambient>"));
        assert!(sdf.contains("<diffuse>#00FF00</diffuse>"));
        assert_eq!(sdf.matches("<material>").count(), 1);
    }

    #[test]
    fn names_are_escaped_once() {
        let model = ModelSpec {
            name: Some("A&B<C>\"'".into()),
            ..Default::default()
        };
        let sdf = SceneCompiler::new().compile_model(&model);

        let start = sdf.find("name=\"").unwrap() + "name=\"".len();
        let end = start + sdf[start..].find('"').unwrap();
        let attribute = &sdf[start..end];

        assert_eq!(attribute, "A&amp;B&lt;C&gt;&quot;&apos;");
        assert_eq!(unescape_xml(attribute), "A&B<C>\"'");
    }

    #[test]
    fn escape_is_not_reapplied_to_entities() {
        assert_eq!(escape_xml("plain"), Cow::Borrowed("plain"));
        assert_eq!(escape_xml("&amp;"), "&amp;amp;");
    }

    #[test]
    fn compile_is_idempotent() {
        let compiler = SceneCompiler::new();
        let plan = default_plan();
        assert_eq!(
            compiler.compile(Some(&plan)).unwrap(),
            compiler.compile(Some(&plan)).unwrap()
        );
    }

    #[test]
    fn save_creates_directories_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worlds").join("nested").join("w.sdf");
        let compiler = SceneCompiler::new();

        compiler.save_document("first", &path).unwrap();
        compiler.save_document("second", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn save_reports_the_io_cause() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let err = SceneCompiler::new()
            .save_document("doc", &blocker.join("w.sdf"))
            .unwrap_err();
        assert!(matches!(err, SaveError::CreateDir { .. }));
        assert!(err.to_string().contains("Failed to create directory"));
    }
}
