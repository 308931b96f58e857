/// Boundary to the external text generator.
/// Whatever happens on the other side, callers always get a usable plan back.
use crate::config::GeneratorConfig;
use crate::fallback::default_plan;
use crate::plan::WorldPlan;
use crate::repair::try_repair;
use std::process::Command;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("text generator not ready: missing {0}")]
    NotReady(String),
    #[error("text generator failed to start: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("text generator failed with exit code {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },
    #[error("text generator produced non UTF-8 output")]
    InvalidOutput,
}

/// Produces raw text for a prompt.
pub trait TextGenerator {
    fn generate(&mut self, prompt: &str) -> Result<String, GenerationError>;
}

/// One-object plan template the small model is asked to fill in.
const PLAN_TEMPLATE: &str = concat!(
    r##"{"world_name":"world","models":[{"name":"box","type":"box","##,
    r##""position":{"x":0,"y":0,"z":0},"rotation":{"roll":0,"pitch":0,"yaw":0},"##,
    r##""scale":{"x":1,"y":1,"z":1},"color":"#FF0000","static":false}],"##,
    r##""lighting":[{"name":"sun","type":"directional","position":{"x":0,"y":0,"z":10}}],"##,
    r##""physics":{"gravity":"0 0 -9.81","max_step_size":0.001}}"##
);

/// Full prompt sent to the generator for a user request.
pub fn world_plan_prompt(user_prompt: &str) -> String {
    format!("{}\n\nJSON:\n{}", user_prompt, PLAN_TEMPLATE)
}

/// Runs a llama.cpp style command line generator once per request.
#[derive(Debug, Clone)]
pub struct LlamaCliGenerator {
    config: GeneratorConfig,
}

impl LlamaCliGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        info!("Text generator CLI: {}", config.cli_path.display());
        info!("Text generator model: {}", config.model_path.display());
        info!("Ready: {}", if config.is_ready() { "Yes" } else { "No" });
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl TextGenerator for LlamaCliGenerator {
    fn generate(&mut self, prompt: &str) -> Result<String, GenerationError> {
        if !self.config.cli_path.exists() {
            return Err(GenerationError::NotReady(
                self.config.cli_path.display().to_string(),
            ));
        }
        if !self.config.model_path.exists() {
            return Err(GenerationError::NotReady(
                self.config.model_path.display().to_string(),
            ));
        }

        let args = self.config.arguments(prompt);
        debug!(
            "Running generator: {} {}",
            self.config.cli_path.display(),
            args.join(" ")
        );

        let output = Command::new(&self.config.cli_path).args(&args).output()?;
        if !output.status.success() {
            return Err(GenerationError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| GenerationError::InvalidOutput)
    }
}

/// Asks `generator` for a plan, substituting the default world on any failure.
pub fn plan_from_generator(generator: &mut dyn TextGenerator, user_prompt: &str) -> WorldPlan {
    info!("Processing prompt: {}", user_prompt);

    let raw = match generator.generate(&world_plan_prompt(user_prompt)) {
        Ok(raw) => raw,
        Err(e) => {
            error!("{}", e);
            info!("Using fallback: creating simple default world");
            return default_plan();
        }
    };
    debug!("Generator output: {}", raw);

    match try_repair(&raw) {
        Ok(plan) => {
            info!("World plan generated successfully");
            plan
        }
        Err(failure) => {
            warn!("Generator output invalid ({}), using fallback world", failure);
            default_plan()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted(Result<String, fn() -> GenerationError>);

    impl TextGenerator for Scripted {
        fn generate(&mut self, prompt: &str) -> Result<String, GenerationError> {
            assert!(prompt.contains("JSON:\n{\"world_name\""));
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    #[test]
    fn prompt_appends_the_template() {
        let prompt = world_plan_prompt("two crates");
        assert!(prompt.starts_with("two crates\n\nJSON:\n"));
        let template = prompt.trim_start_matches("two crates\n\nJSON:\n");
        assert!(crate::repair::repair(template).is_some());
    }

    #[test]
    fn good_output_is_used() {
        let mut generator = Scripted(Ok(
            "sampling...\n{\"world_name\":\"yard\",\"models\":[{\"name\":\"a\"}]} [end of text]"
                .to_string(),
        ));
        let plan = plan_from_generator(&mut generator, "a yard");
        assert_eq!(plan.name(), "yard");
        assert_eq!(plan.models[0].name(), "a");
    }

    #[test]
    fn unusable_output_falls_back() {
        let mut generator = Scripted(Ok("I cannot help with that.".to_string()));
        assert_eq!(plan_from_generator(&mut generator, "x"), default_plan());
    }

    #[test]
    fn process_failure_falls_back() {
        let mut generator = Scripted(Err(|| GenerationError::Failed {
            code: Some(1),
            stderr: "segfault".into(),
        }));
        assert_eq!(plan_from_generator(&mut generator, "x"), default_plan());
    }

    #[test]
    fn missing_executable_is_not_ready() {
        let mut generator = LlamaCliGenerator::new(GeneratorConfig::with_paths(
            "/nonexistent/llama-cli",
            "/nonexistent/model.gguf",
        ));
        assert!(matches!(
            generator.generate("hello"),
            Err(GenerationError::NotReady(_))
        ));
        assert_eq!(plan_from_generator(&mut generator, "hello"), default_plan());
    }
}
