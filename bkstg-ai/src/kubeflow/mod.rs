/*
 * Kubeflow Model Registry as a model metadata source: a registered model,
 * its versions and their artifacts become one Component, Resource and API.
 */
pub mod client;

use crate::backstage::populator;
use crate::backstage::populator::{ApiPopulator, CommonPopulator, ComponentPopulator, EntityRole, ResourcePopulator};
use crate::config::{Config, ModelArgs, OutputFormat};
use crate::errors::Result;
use client::KubeflowClient;

use bkstg_ai_api::{EntityLink, ModelArtifact, ModelVersion, RegisteredModel};
use log;
use std::io::Write;

/* API entities need a definition to pass catalog validation */
pub const NO_DEFINITION: &str = "no-definition-yet";

/*
 * A registered model with every version and, per version, its artifacts.
 */
pub struct ModelBundle {
    pub owner: String,
    pub lifecycle: String,
    pub model: RegisteredModel,
    pub versions: Vec<(ModelVersion, Vec<ModelArtifact>)>,
}

impl ModelBundle {

    pub fn populator(&self, role: EntityRole) -> KubeflowPopulator<'_> {
	KubeflowPopulator{
	    bundle: self,
	    role: role,
	}
    }

    fn artifacts(&self) -> impl Iterator<Item = &ModelArtifact> {
	self.versions.iter().flat_map(|(_, artifacts)| artifacts.iter())
    }
}

pub struct KubeflowPopulator<'a> {
    bundle: &'a ModelBundle,
    role: EntityRole,
}

impl KubeflowPopulator<'_> {

    fn component_ref(&self) -> Vec<String> {
	vec![format!("component:{}", self.bundle.model.name)]
    }
}

impl CommonPopulator for KubeflowPopulator<'_> {

    fn role(&self) -> EntityRole {
	self.role
    }

    /* the registry owner wins over the one given on the command line */
    fn owner(&self) -> String {
	match &self.bundle.model.owner {
	    Some(owner) => owner.clone(),
	    None => self.bundle.owner.clone(),
	}
    }

    fn lifecycle(&self) -> String {
	self.bundle.lifecycle.clone()
    }

    fn name(&self) -> String {
	self.bundle.model.name.clone()
    }

    fn description(&self) -> String {
	self.bundle.model.description.clone().unwrap_or_default()
    }

    fn display_name(&self) -> String {
	match &self.bundle.model.external_id {
	    Some(external_id) => external_id.clone(),
	    None => format!("{} model from KubeFlow Model Registry", self.bundle.model.name),
	}
    }

    /*
     * Only the resource has links, to the artifact URIs. The registry does
     * not know the serving endpoints yet.
     */
    fn links(&self) -> Vec<EntityLink> {
	if self.role != EntityRole::Resource {
	    return vec![];
	}
	self.bundle.artifacts()
	    .filter_map(|ma| {
		let uri = ma.uri.as_ref()?;
		Some(EntityLink::website(uri, ma.description.as_deref().unwrap_or_default()))
	    })
	    .collect()
    }

    fn tags(&self) -> Vec<String> {
	match self.role {
	    EntityRole::Component => {
		self.bundle.model.custom_properties.iter()
		    .map(|(key, value)| format!("{}:{}", key, value))
		    .collect()
	    },
	    EntityRole::Resource => {
		let versions = self.bundle.versions.iter().flat_map(|(mv, _)| mv.custom_properties.keys());
		let artifacts = self.bundle.artifacts().flat_map(|ma| ma.custom_properties.keys());
		versions.chain(artifacts).cloned().collect()
	    },
	    EntityRole::Api => vec![],
	}
    }

    fn provided_apis(&self) -> Vec<String> {
	vec![]
    }
}

impl ComponentPopulator for KubeflowPopulator<'_> {
    fn depends_on(&self) -> Vec<String> {
	let versions = self.bundle.versions.iter().map(|(mv, _)| format!("resource:{}", mv.name));
	let artifacts = self.bundle.artifacts()
	    .filter_map(|ma| ma.name.as_ref())
	    .map(|name| format!("api:{}", name));
	versions.chain(artifacts).collect()
    }
}

impl ResourcePopulator for KubeflowPopulator<'_> {
    fn dependency_of(&self) -> Vec<String> {
	self.component_ref()
    }
}

impl ApiPopulator for KubeflowPopulator<'_> {
    fn definition(&self) -> String {
	NO_DEFINITION.to_string()
    }

    fn dependency_of(&self) -> Vec<String> {
	self.component_ref()
    }
}

/*
 * Fetches the versions of a registered model and each version's
 * artifacts. A version without artifacts gets the artifacts listed under
 * the registered model id instead.
 */
pub async fn fetch_versions(kf: &KubeflowClient, rm_id: &str) -> Result<Vec<(ModelVersion, Vec<ModelArtifact>)>> {
    let versions = match kf.list_model_versions(rm_id).await {
	Ok(versions) => versions,
	Err(err) => {
	    log::error!("list model versions error for {}: {}", rm_id, err);
	    return Err(err);
	}
    };

    let mut bundle = vec![];
    for mv in versions {
	let mv_id = mv.id.clone().unwrap_or_default();
	let mut artifacts = kf.list_model_artifacts(&mv_id).await?;
	if artifacts.is_empty() {
	    log::debug!("model version {}:{} has no artifacts, using the model id", rm_id, mv_id);
	    artifacts = kf.list_model_artifacts(rm_id).await?;
	}
	bundle.push((mv, artifacts));
    }
    Ok(bundle)
}

pub async fn fetch_bundle(kf: &KubeflowClient, args: &ModelArgs, model: RegisteredModel) -> Result<ModelBundle> {
    let rm_id = model.id.clone().unwrap_or_default();
    let versions = fetch_versions(kf, &rm_id).await?;
    Ok(ModelBundle{
	owner: args.owner.clone(),
	lifecycle: args.lifecycle.clone(),
	model: model,
	versions: versions,
    })
}

pub fn write_bundles<W: Write>(out: &mut W, format: OutputFormat, bundles: &[ModelBundle]) -> Result<()> {
    for (i, bundle) in bundles.iter().enumerate() {
	populator::print_model(
	    out,
	    format,
	    &bundle.populator(EntityRole::Component),
	    &bundle.populator(EntityRole::Resource),
	    &bundle.populator(EntityRole::Api),
	    i + 1 == bundles.len(),
	)?;
    }
    Ok(())
}

async fn export<W: Write>(kf: &KubeflowClient, args: &ModelArgs, format: OutputFormat, out: &mut W) -> Result<()> {
    let models = if args.ids.is_empty() {
	kf.list_registered_models().await?
    } else {
	let mut models = vec![];
	for id in &args.ids {
	    match kf.get_registered_model(id).await {
		Ok(model) => models.push(model),
		Err(err) => {
		    log::error!("get registered model error for {}: {}", id, err);
		    return Err(err);
		}
	    }
	}
	models
    };

    let mut bundles = vec![];
    for model in models {
	bundles.push(fetch_bundle(kf, args, model).await?);
    }
    write_bundles(out, format, &bundles)
}

/*
 * new-model kubeflow: exports the registered models with the given ids,
 * or all of them.
 */
pub async fn new_model<W: Write>(cfg: &Config, args: &ModelArgs, format: OutputFormat, out: &mut W) -> Result<()> {
    let kf = KubeflowClient::new(cfg)?;
    export(&kf, args, format, out).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backstage::populator::{build_api, build_component, build_resource};
    use crate::kubeflow::client::tests::{client, registry, MODEL_ARTIFACTS};
    use crate::testutil::MockServer;

    fn args(ids: &[&str]) -> ModelArgs {
	ModelArgs{
	    owner: String::from("me"),
	    lifecycle: String::from("experimental"),
	    ids: ids.iter().map(|s| s.to_string()).collect(),
	}
    }

    async fn bundle(server: &MockServer) -> ModelBundle {
	let kf = client(server);
	let model = kf.get_registered_model("1").await.unwrap();
	fetch_bundle(&kf, &args(&["1"]), model).await.unwrap()
    }

    #[tokio::test]
    async fn common_accessors() {
	let server = MockServer::start(registry);
	let bundle = bundle(&server).await;
	let pop = bundle.populator(EntityRole::Component);

	assert_eq!(pop.owner(), "kube:admin");
	assert_eq!(pop.lifecycle(), "experimental");
	assert_eq!(pop.name(), "model-1");
	assert_eq!(pop.description(), "dummy model 1");
	assert_eq!(pop.display_name(), "model-1 model from KubeFlow Model Registry");
	assert!(pop.provided_apis().is_empty());
    }

    #[tokio::test]
    async fn owner_and_display_name_fallbacks() {
	let server = MockServer::start(registry);
	let mut bundle = bundle(&server).await;
	bundle.model.owner = None;
	bundle.model.external_id = Some(String::from("ext-1"));

	let pop = bundle.populator(EntityRole::Api);
	assert_eq!(pop.owner(), "me");
	assert_eq!(pop.display_name(), "ext-1");
    }

    #[tokio::test]
    async fn component_entity() {
	let server = MockServer::start(registry);
	let bundle = bundle(&server).await;

	let component = build_component(&bundle.populator(EntityRole::Component));

	assert_eq!(component.spec.owner, "user:kube:admin");
	assert_eq!(component.metadata.tags, vec!["foo:bar"]);
	assert!(component.metadata.links.is_empty());
	assert_eq!(component.spec.depends_on, vec!["resource:v1", "api:model-1-v1-artifact"]);
    }

    #[tokio::test]
    async fn resource_entity() {
	let server = MockServer::start(registry);
	let mut bundle = bundle(&server).await;
	bundle.versions[0].0.custom_properties = serde_json::from_value(serde_json::json!({
	    "accuracy": {"metadataType": "MetadataDoubleValue", "double_value": 0.9},
	})).unwrap();

	let resource = build_resource(&bundle.populator(EntityRole::Resource));

	assert_eq!(resource.metadata.links.len(), 1);
	assert_eq!(resource.metadata.links[0].url, "https://foo.com");
	assert_eq!(resource.metadata.links[0].title, "version 1");
	assert_eq!(resource.metadata.tags, vec!["accuracy"]);
	assert_eq!(resource.spec.dependency_of, vec!["component:model-1"]);
    }

    #[tokio::test]
    async fn api_entity() {
	let server = MockServer::start(registry);
	let bundle = bundle(&server).await;

	let api = build_api(&bundle.populator(EntityRole::Api));

	assert_eq!(api.spec.definition, "no-definition-yet");
	assert!(api.metadata.tags.is_empty());
	assert!(api.metadata.links.is_empty());
	assert_eq!(api.spec.dependency_of, vec!["component:model-1"]);
    }

    #[tokio::test]
    async fn artifacts_fall_back_to_model_id() {
	let server = MockServer::start(|request| {
	    let path = request.path();
	    if path.ends_with("/versions") {
		(200, String::from(crate::kubeflow::client::tests::MODEL_VERSIONS))
	    } else if path.ends_with("/model_versions/2/artifacts") {
		(200, String::from(r#"{"items":[],"nextPageToken":"","pageSize":0,"size":0}"#))
	    } else {
		(200, String::from(MODEL_ARTIFACTS))
	    }
	});

	let versions = fetch_versions(&client(&server), "1").await.unwrap();

	assert_eq!(versions.len(), 1);
	assert_eq!(versions[0].1.len(), 1);
	assert_eq!(server.requests()[2].path(), "/api/model_registry/v1alpha3/model_versions/1/artifacts");
    }

    #[tokio::test]
    async fn export_all_models() {
	let server = MockServer::start(registry);
	let mut out = Vec::new();

	export(&client(&server), &args(&[]), OutputFormat::Yaml, &mut out).await.unwrap();

	let text = String::from_utf8(out).unwrap();
	let docs: Vec<serde_yaml::Value> = text.split("---\n")
	    .map(|doc| serde_yaml::from_str(doc).unwrap())
	    .collect();
	assert_eq!(docs.len(), 3);
	assert_eq!(docs[0]["kind"], "Component");
	assert_eq!(docs[0]["metadata"]["name"], "model-1");
	assert_eq!(docs[1]["kind"], "Resource");
	assert_eq!(docs[2]["spec"]["definition"], "no-definition-yet");
	assert_eq!(server.requests()[0].path(), "/api/model_registry/v1alpha3/registered_models");
    }

    #[tokio::test]
    async fn export_unknown_model_fails() {
	let server = MockServer::start(|_| (404, String::from("not found")));
	let mut out = Vec::new();

	assert!(export(&client(&server), &args(&["7"]), OutputFormat::Yaml, &mut out).await.is_err());
	assert!(out.is_empty());
    }
}
