use crate::backstage::filter::TagMatch;
use crate::backstage::BackstageClient;
use crate::config::{Config, ModelArgs, OutputFormat, QueryArgs};
use crate::errors::Result;
use crate::kserve;
use crate::kubeflow;

use clap::Parser;
use clap::Subcommand;
use std::io::Write;

/*
 * Command line tool managing the AI related entities of a Backstage
 * catalog: it renders models found in KServe or in a Kubeflow Model
 * Registry as catalog-info documents, and queries or feeds the catalog.
 */
#[derive(Parser, Debug)]
#[command(name = "bkstg-ai", version, about = "Backstage AI model catalog CLI", arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {

    /// Create Backstage catalog entities from model metadata.
    #[command(visible_aliases = ["create", "c", "nm", "new-models"], arg_required_else_help = true)]
    NewModel {
	/// Format the entities are written in.
	#[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Yaml)]
	output: OutputFormat,

	#[command(subcommand)]
	source: ModelSource,
    },

    /// Retrieve AI related entities from the Backstage catalog.
    #[command(visible_aliases = ["g"], arg_required_else_help = true)]
    Get {
	#[command(flatten)]
	query: QueryArgs,

	#[command(subcommand)]
	target: GetTarget,
    },

    /// Import a catalog-info URL into the Backstage catalog as a location.
    #[command(visible_aliases = ["post", "im", "p", "i", "import-models"])]
    ImportModel {
	/// URL of the catalog-info document.
	url: String,
    },

    /// Delete a location, and the entities it provided, from the Backstage catalog.
    #[command(visible_aliases = ["delete", "dm", "del", "d", "delete-models"])]
    DeleteModel {
	/// Id of the location, as returned by import-model or get locations.
	location_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModelSource {

    /// Models served by KServe InferenceServices in the target namespace.
    Kserve(ModelArgs),

    /// Registered models of a Kubeflow Model Registry.
    #[command(visible_aliases = ["kf"])]
    Kubeflow(ModelArgs),
}

#[derive(Subcommand, Debug)]
pub enum GetTarget {

    /// Every entity in the catalog.
    #[command(visible_aliases = ["e", "entity"])]
    Entities,

    /// Catalog locations, all of them or by id.
    #[command(visible_aliases = ["l", "location"])]
    Locations {
	ids: Vec<String>,
    },

    /// Model server components, as `namespace:name` keys or tags.
    #[command(visible_aliases = ["c", "component"])]
    Components {
	args: Vec<String>,
    },

    /// AI model resources, as `namespace:name` keys or tags.
    #[command(visible_aliases = ["r", "resource"])]
    Resources {
	args: Vec<String>,
    },

    /// Model serving APIs, as `namespace:name` keys or tags.
    #[command(visible_aliases = ["a", "api"])]
    Apis {
	args: Vec<String>,
    },
}

async fn get(cfg: &Config, query: &QueryArgs, target: &GetTarget) -> Result<String> {
    let tag_match = TagMatch::from_flags(query.use_params_as_tags, query.use_any_subset);
    let bkstg = BackstageClient::new(cfg)?.with_tag_match(tag_match);

    match target {
	GetTarget::Entities => bkstg.list_entities().await,
	GetTarget::Locations{ ids } => bkstg.get_location(ids).await,
	GetTarget::Components{ args } => bkstg.get_components(args).await,
	GetTarget::Resources{ args } => bkstg.get_resources(args).await,
	GetTarget::Apis{ args } => bkstg.get_apis(args).await,
    }
}

pub async fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let cfg = &cli.config;

    match &cli.command {
	Command::NewModel{ output, source } => {
	    match source {
		ModelSource::Kserve(args) => kserve::new_model(cfg, args, *output, out).await?,
		ModelSource::Kubeflow(args) => kubeflow::new_model(cfg, args, *output, out).await?,
	    }
	},
	Command::Get{ query, target } => {
	    let body = get(cfg, query, target).await?;
	    writeln!(out, "{}", body.trim_end())?;
	},
	Command::ImportModel{ url } => {
	    let body = BackstageClient::new(cfg)?.import_location(url).await?;
	    writeln!(out, "{}", body.trim_end())?;
	},
	Command::DeleteModel{ location_id } => {
	    let body = BackstageClient::new(cfg)?.delete_location(location_id).await?;
	    writeln!(out, "{}", body.trim_end())?;
	},
    }
    Ok(())
}
