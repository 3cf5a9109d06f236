use crate::backstage::populator;
use crate::backstage::populator::{ApiPopulator, CommonPopulator, ComponentPopulator, EntityRole, ResourcePopulator};
use crate::config::{Config, ModelArgs, OutputFormat};
use crate::errors::Result;
use crate::k8s;
use crate::output;
use crate::rest;

use bkstg_ai_api::catalog::LINK_API_URL;
use bkstg_ai_api::{EntityLink, InferenceService};
use kube::api::ListParams as KubeListParams;
use kube::Api as KubeApi;
use log;
use reqwest::Client as HttpClient;
use std::io::Write;

/*
 * One InferenceService about to be exported, with the inputs that do not
 * come from the cluster object itself.
 */
pub struct KServeModel {
    pub owner: String,
    pub lifecycle: String,
    pub is: InferenceService,

    /* the OpenAPI document served by the model, empty when unavailable */
    pub definition: String,
}

impl KServeModel {

    pub fn new(owner: &str, lifecycle: &str, is: InferenceService) -> Self {
	Self{
	    owner: owner.to_string(),
	    lifecycle: lifecycle.to_string(),
	    is: is,
	    definition: String::new(),
	}
    }

    /* `<namespace>_<name>`, the name of all three entities */
    fn key(&self) -> String {
	format!("{}_{}", self.is.namespace_or_default(), self.is.name_or_empty())
    }

    pub fn populator(&self, role: EntityRole) -> KServePopulator<'_> {
	KServePopulator{
	    model: self,
	    role: role,
	}
    }
}

pub struct KServePopulator<'a> {
    model: &'a KServeModel,
    role: EntityRole,
}

impl CommonPopulator for KServePopulator<'_> {

    fn role(&self) -> EntityRole {
	self.role
    }

    fn owner(&self) -> String {
	self.model.owner.clone()
    }

    fn lifecycle(&self) -> String {
	self.model.lifecycle.clone()
    }

    fn name(&self) -> String {
	self.model.key()
    }

    fn description(&self) -> String {
	self.display_name()
    }

    fn display_name(&self) -> String {
	let is = &self.model.is;
	format!("KServe instance {}:{}", is.namespace_or_default(), is.name_or_empty())
    }

    /*
     * The service URL, then for each component the URLs it reports. A
     * component URL also serves the FastAPI docs page.
     */
    fn links(&self) -> Vec<EntityLink> {
	let mut links = vec![];
	let status = match &self.model.is.status {
	    Some(status) => status,
	    None => return links,
	};

	if let Some(url) = &status.url {
	    links.push(EntityLink::website(url, LINK_API_URL));
	}

	for (component_type, component) in &status.components {
	    if let Some(url) = &component.url {
		links.push(EntityLink::website(&format!("{}/docs", url), &format!("{} FastAPI URL", component_type)));
		links.push(EntityLink::website(url, &format!("{} model serving URL", component_type)));
	    }
	    if let Some(url) = &component.rest_url {
		links.push(EntityLink::website(url, &format!("{} REST model serving URL", component_type)));
	    }
	    if let Some(url) = &component.grpc_url {
		links.push(EntityLink::website(url, &format!("{} GRPC model serving URL", component_type)));
	    }
	}
	links
    }

    fn tags(&self) -> Vec<String> {
	let is = &self.model.is;
	let mut tags = vec![];

	match is.spec.predictor.framework() {
	    Some(framework) => tags.push(framework),
	    None => log::warn!("no predictor framework found for {}", self.model.key()),
	}
	if let Some(explainer) = is.explainer_type() {
	    tags.push(explainer);
	}
	tags
    }

    fn provided_apis(&self) -> Vec<String> {
	vec![self.model.key()]
    }
}

impl ComponentPopulator for KServePopulator<'_> {
    fn depends_on(&self) -> Vec<String> {
	let key = self.model.key();
	vec![format!("resource:{}", key), format!("api:{}", key)]
    }
}

impl ResourcePopulator for KServePopulator<'_> {
    fn dependency_of(&self) -> Vec<String> {
	vec![format!("component:{}", self.model.key())]
    }
}

impl ApiPopulator for KServePopulator<'_> {
    fn definition(&self) -> String {
	self.model.definition.clone()
    }

    fn dependency_of(&self) -> Vec<String> {
	vec![format!("component:{}", self.model.key())]
    }
}

/*
 * Fetches `<status.url>/openapi.json`. A model without a URL, or one that
 * does not serve a definition, gets an empty one; this never fails the
 * export.
 */
pub async fn fetch_definition(http: &HttpClient, is: &InferenceService) -> String {
    let url = match is.status.as_ref().and_then(|s| s.url.as_ref()) {
	Some(url) => format!("{}/openapi.json", url.trim_end_matches('/')),
	None => return String::new(),
    };

    let body = match rest::fetch_url(http, &url).await {
	Ok(body) => body,
	Err(err) => {
	    log::warn!("unable to fetch the API definition at {}: {}", url, err);
	    return String::new();
	}
    };

    match output::indent_json(&body) {
	Ok(definition) => definition,
	Err(err) => {
	    log::warn!("API definition at {} is not JSON: {}", url, err);
	    String::new()
	}
    }
}

/*
 * Client for the definitions served by the models themselves. The model
 * servers are not the metadata store, none of its settings apply.
 */
pub fn definition_client() -> Result<HttpClient> {
    Ok(HttpClient::builder().build()?)
}

async fn fetch_services(api: &KubeApi<InferenceService>, namespace: &str, ids: &[String]) -> Result<Vec<InferenceService>> {
    if ids.is_empty() {
	let list = api.list(&KubeListParams::default()).await?;
	return Ok(list.items);
    }

    let mut services = vec![];
    for id in ids {
	match api.get(id).await {
	    Ok(is) => services.push(is),
	    Err(err) => {
		log::error!("inference service retrieval error for {}:{}: {}", namespace, id, err);
		return Err(err.into());
	    }
	}
    }
    Ok(services)
}

pub fn write_models<W: Write>(out: &mut W, format: OutputFormat, models: &[KServeModel]) -> Result<()> {
    for (i, model) in models.iter().enumerate() {
	populator::print_model(
	    out,
	    format,
	    &model.populator(EntityRole::Component),
	    &model.populator(EntityRole::Resource),
	    &model.populator(EntityRole::Api),
	    i + 1 == models.len(),
	)?;
    }
    Ok(())
}

/*
 * new-model kserve: exports the named InferenceServices of the target
 * namespace, or all of them.
 */
pub async fn new_model<W: Write>(cfg: &Config, args: &ModelArgs, format: OutputFormat, out: &mut W) -> Result<()> {
    let target = k8s::connect(cfg).await?;
    let api: KubeApi<InferenceService> = KubeApi::namespaced(target.client.clone(), &target.namespace);
    let services = fetch_services(&api, &target.namespace, &args.ids).await?;
    log::debug!("exporting {} inference services from {}", services.len(), target.namespace);

    let http = definition_client()?;

    let mut models = vec![];
    for is in services {
	let mut model = KServeModel::new(&args.owner, &args.lifecycle, is);
	model.definition = fetch_definition(&http, &model.is).await;
	models.push(model);
    }

    write_models(out, format, &models)
}
