use crate::errors::{Error, Result};

use clap::builder::BoolishValueParser;
use clap::ArgAction;
use clap::Args;
use clap::ValueEnum;
use std::path::PathBuf;

/*
 * Connection settings shared by every command. The backstage and model
 * metadata flags fall back to an environment variable, so a CI job can
 * export them once.
 *
 * Boolean switches accept both `--flag` and `--flag=<bool>`.
 */
#[derive(Args, Clone, Debug, Default)]
pub struct Config {

    /// Path to the kubeconfig file to use for CLI requests. Without it the
    /// usual KUBECONFIG / in-cluster inference applies.
    #[arg(long, global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// The name of the Kubernetes namespace to use for CLI requests.
    #[arg(long, global = true)]
    pub namespace: Option<String>,

    /// The URL used for accessing the Backstage Catalog REST API.
    #[arg(long, env = "BACKSTAGE_URL", global = true)]
    pub backstage_url: Option<String>,

    /// The bearer authorization token used for accessing the Backstage Catalog REST API.
    #[arg(long, env = "BACKSTAGE_TOKEN", global = true, hide_env_values = true)]
    pub backstage_token: Option<String>,

    /// Whether to skip TLS verification when accessing the Backstage Catalog REST API.
    #[arg(long, env = "BACKSTAGE_SKIP_TLS", global = true, action = ArgAction::Set,
	  num_args = 0..=1, require_equals = true, default_value_t = false,
	  default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub backstage_skip_tls: bool,

    /// The URL used for accessing the external source for Model Metadata.
    #[arg(long, env = "MODEL_METADATA_URL", global = true)]
    pub model_metadata_url: Option<String>,

    /// The bearer authorization token used for accessing the external source for Model Metadata.
    #[arg(long, env = "MODEL_METADATA_TOKEN", global = true, hide_env_values = true)]
    pub model_metadata_token: Option<String>,

    /// Whether to skip TLS verification when accessing the external source for Model Metadata.
    #[arg(long, env = "MODEL_METADATA_SKIP_TLS", global = true, action = ArgAction::Set,
	  num_args = 0..=1, require_equals = true, default_value_t = false,
	  default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub model_metadata_skip_tls: bool,
}

/*
 * Returns the value if it is set and not blank, otherwise a usage error
 * naming the flag and variable that provide it.
 */
fn required(value: &Option<String>, flag: &str, env: &str) -> Result<String> {
    match value {
	Some(value) if !value.trim().is_empty() => Ok(value.trim_end_matches('/').to_string()),
	_ => {
	    let errmsg = format!("no URL configured: use --{} or set {}", flag, env);
	    Err(Error::Usage(errmsg))
	}
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

impl Config {

    pub fn backstage_url(&self) -> Result<String> {
	required(&self.backstage_url, "backstage-url", "BACKSTAGE_URL")
    }

    pub fn backstage_token(&self) -> Option<String> {
	non_empty(&self.backstage_token)
    }

    pub fn model_metadata_url(&self) -> Result<String> {
	required(&self.model_metadata_url, "model-metadata-url", "MODEL_METADATA_URL")
    }

    pub fn model_metadata_token(&self) -> Option<String> {
	non_empty(&self.model_metadata_token)
    }
}

/*
 * Flags of the `get` family. With `use_params_as_tags` the positional
 * arguments are tags to match instead of `namespace:name` keys.
 */
#[derive(Args, Clone, Debug, Default)]
pub struct QueryArgs {

    /// Use any additional parameters as tag identifiers.
    #[arg(long, global = true, action = ArgAction::Set,
	  num_args = 0..=1, require_equals = true, default_value_t = false,
	  default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub use_params_as_tags: bool,

    /// Match entities carrying all of the given tags rather than exactly the given tags.
    #[arg(long, global = true, action = ArgAction::Set,
	  num_args = 0..=1, require_equals = true, default_value_t = false,
	  default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub use_any_subset: bool,
}

/*
 * Positional arguments of `new-model <source>`: who owns the generated
 * entities, their lifecycle stage, and optionally which models to export
 * (all of them when omitted).
 */
#[derive(Args, Clone, Debug)]
pub struct ModelArgs {

    /// Owner of the generated entities, rendered as `user:<owner>`.
    pub owner: String,

    /// Lifecycle of the generated entities (experimental, production, ...).
    pub lifecycle: String,

    /// Names (or ids) of the models to export; all of them when omitted.
    pub ids: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}
