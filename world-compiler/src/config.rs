/// Text generator configuration resolved from the environment.
use std::path::{Path, PathBuf};

/// Overrides the generator executable path.
pub const ENV_GENERATOR_CLI: &str = "BURMA_BITNET_CLI";

/// Overrides the model weights path.
pub const ENV_GENERATOR_MODEL: &str = "BURMA_BITNET_MODEL";

/// Defaults relative to the user's home directory.
const DEFAULT_CLI_RELATIVE: &str = "BitNet/build/bin/llama-cli";
const DEFAULT_MODEL_RELATIVE: &str = "BitNet/models/BitNet-b1.58-2B-4T/ggml-model-i2_s.gguf";

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub cli_path: PathBuf,
    pub model_path: PathBuf,
    /// Tokens to predict; the plan template needs little more than a copy.
    pub max_tokens: u32,
    pub threads: u32,
    pub gpu_layers: u32,
    pub context_size: u32,
    pub temperature: f32,
    pub batch_size: u32,
    pub top_p: f32,
    pub repeat_penalty: f32,
}

impl GeneratorConfig {
    pub fn with_paths(cli_path: impl Into<PathBuf>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            cli_path: cli_path.into(),
            model_path: model_path.into(),
            max_tokens: 200,
            threads: 4,
            gpu_layers: 0,
            context_size: 1024,
            temperature: 0.3,
            batch_size: 1,
            top_p: 0.9,
            repeat_penalty: 1.1,
        }
    }

    /// Reads the overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(dirs::home_dir(), |key| std::env::var(key).ok())
    }

    /// Resolves paths from `lookup`, falling back to defaults under `home`.
    /// Empty overrides are ignored.
    pub fn from_lookup(home: Option<PathBuf>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let home = home.unwrap_or_else(|| PathBuf::from("."));
        let resolve = |key: &str, relative: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| home.join(relative))
        };

        Self::with_paths(
            resolve(ENV_GENERATOR_CLI, DEFAULT_CLI_RELATIVE),
            resolve(ENV_GENERATOR_MODEL, DEFAULT_MODEL_RELATIVE),
        )
    }

    /// Both the executable and the weights are present on disk.
    pub fn is_ready(&self) -> bool {
        self.cli_path.exists() && self.model_path.exists()
    }

    /// Command-line arguments for one inference run over `prompt`.
    pub fn arguments(&self, prompt: &str) -> Vec<String> {
        vec![
            "-m".into(),
            path_arg(&self.model_path),
            "-p".into(),
            prompt.to_string(),
            "-n".into(),
            self.max_tokens.to_string(),
            "-t".into(),
            self.threads.to_string(),
            "-ngl".into(),
            self.gpu_layers.to_string(),
            "-c".into(),
            self.context_size.to_string(),
            "--temp".into(),
            self.temperature.to_string(),
            "-b".into(),
            self.batch_size.to_string(),
            "--top-p".into(),
            self.top_p.to_string(),
            "--repeat-penalty".into(),
            self.repeat_penalty.to_string(),
            "--no-display-prompt".into(),
        ]
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
