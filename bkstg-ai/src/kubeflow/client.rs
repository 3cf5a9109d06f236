use crate::config::Config;
use crate::errors::{Error, Result};
use crate::rest::RestClient;

use bkstg_ai_api::{ModelArtifact, ModelVersion, RegisteredModel, RegistryList};
use log;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub const BASE_URI: &str = "/api/model_registry/v1alpha3";
pub const REG_MODELS_URI: &str = "/registered_models";
pub const MODEL_VERSIONS_URI: &str = "/model_versions";
pub const MODEL_ARTIFACTS_URI: &str = "/model_artifacts";

/*
 * Client of the Kubeflow Model Registry REST API. Paths are relative to
 * `<model metadata url>/api/model_registry/v1alpha3`.
 */
#[derive(Clone, Debug)]
pub struct KubeflowClient {
    rest: RestClient,
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

/*
 * Creates and updates answer with the stored object; callers only get
 * its id back.
 */
fn response_id(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)?;
    match value.get("id") {
	Some(Value::String(id)) => Ok(id.clone()),
	Some(Value::Number(id)) => Ok(id.to_string()),
	_ => {
	    let errmsg = format!("no id in model registry response {}", body);
	    Err(Error::Other(errmsg))
	}
    }
}

impl KubeflowClient {

    pub fn new(cfg: &Config) -> Result<Self> {
	let url = cfg.model_metadata_url()?;
	let rest = RestClient::new(&format!("{}{}", url, BASE_URI), cfg.model_metadata_token(), cfg.model_metadata_skip_tls)?;
	Ok(Self::from_rest(rest))
    }

    pub fn from_rest(rest: RestClient) -> Self {
	Self{
	    rest: rest,
	}
    }

    /*
     * Follows `nextPageToken` until the registry stops handing one out, or
     * hands back an empty page.
     */
    async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
	let mut query = vec![];
	let mut items = vec![];

	loop {
	    let body = self.rest.get_with_query(path, &query).await?;
	    let list: RegistryList<T> = parse(&body)?;
	    let fetched = list.items.len();
	    items.extend(list.items);

	    let token = list.next_page_token;
	    if token.is_empty() || fetched == 0 || query.iter().any(|(_, t)| *t == token) {
		break;
	    }
	    query = vec![("nextPageToken", token)];
	}

	log::debug!("{} returned {} items", path, items.len());
	Ok(items)
    }

    async fn create<B: Serialize>(&self, path: &str, body: &B) -> Result<String> {
	let resp = self.rest.post(path, body).await?;
	response_id(&resp)
    }

    async fn update<B: Serialize>(&self, path: &str, body: &B) -> Result<String> {
	let resp = self.rest.patch(path, body).await?;
	response_id(&resp)
    }

    pub async fn list_registered_models(&self) -> Result<Vec<RegisteredModel>> {
	self.list(REG_MODELS_URI).await
    }

    pub async fn get_registered_model(&self, id: &str) -> Result<RegisteredModel> {
	let body = self.rest.get(&format!("{}/{}", REG_MODELS_URI, id)).await?;
	parse(&body)
    }

    pub async fn list_model_versions(&self, registered_model_id: &str) -> Result<Vec<ModelVersion>> {
	self.list(&format!("{}/{}/versions", REG_MODELS_URI, registered_model_id)).await
    }

    pub async fn list_all_model_versions(&self) -> Result<Vec<ModelVersion>> {
	self.list(MODEL_VERSIONS_URI).await
    }

    pub async fn get_model_version(&self, id: &str) -> Result<ModelVersion> {
	let body = self.rest.get(&format!("{}/{}", MODEL_VERSIONS_URI, id)).await?;
	parse(&body)
    }

    pub async fn list_model_artifacts(&self, model_version_id: &str) -> Result<Vec<ModelArtifact>> {
	self.list(&format!("{}/{}/artifacts", MODEL_VERSIONS_URI, model_version_id)).await
    }

    pub async fn list_all_model_artifacts(&self) -> Result<Vec<ModelArtifact>> {
	self.list(MODEL_ARTIFACTS_URI).await
    }

    pub async fn get_model_artifact(&self, id: &str) -> Result<ModelArtifact> {
	let body = self.rest.get(&format!("{}/{}", MODEL_ARTIFACTS_URI, id)).await?;
	parse(&body)
    }

    pub async fn create_registered_model(&self, model: &RegisteredModel) -> Result<String> {
	self.create(REG_MODELS_URI, model).await
    }

    pub async fn patch_registered_model(&self, id: &str, model: &RegisteredModel) -> Result<String> {
	self.update(&format!("{}/{}", REG_MODELS_URI, id), model).await
    }

    pub async fn create_model_version(&self, version: &ModelVersion) -> Result<String> {
	let path = format!("{}/{}/versions", REG_MODELS_URI, version.registered_model_id);
	self.create(&path, version).await
    }

    pub async fn patch_model_version(&self, id: &str, version: &ModelVersion) -> Result<String> {
	self.update(&format!("{}/{}", MODEL_VERSIONS_URI, id), version).await
    }

    pub async fn create_model_artifact(&self, model_version_id: &str, artifact: &ModelArtifact) -> Result<String> {
	let path = format!("{}/{}/artifacts", MODEL_VERSIONS_URI, model_version_id);
	self.create(&path, artifact).await
    }

    pub async fn patch_model_artifact(&self, id: &str, artifact: &ModelArtifact) -> Result<String> {
	self.update(&format!("{}/{}", MODEL_ARTIFACTS_URI, id), artifact).await
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::testutil::{MockServer, Recorded};

    pub const REGISTERED_MODELS: &str = r#"{"items":[{"createTimeSinceEpoch":"1731103949567","customProperties":{"foo":{"metadataType":"MetadataStringValue","string_value":"bar"}},"description":"dummy model 1","id":"1","lastUpdateTimeSinceEpoch":"1731103975700","name":"model-1","owner":"kube:admin","state":"LIVE"}],"nextPageToken":"","pageSize":0,"size":1}"#;
    pub const REGISTERED_MODEL: &str = r#"{"createTimeSinceEpoch":"1731103949567","customProperties":{"foo":{"metadataType":"MetadataStringValue","string_value":"bar"}},"description":"dummy model 1","id":"1","lastUpdateTimeSinceEpoch":"1731103975700","name":"model-1","owner":"kube:admin","state":"LIVE"}"#;
    pub const MODEL_VERSIONS: &str = r#"{"items":[{"author":"kube:admin","createTimeSinceEpoch":"1731103949724","customProperties":{},"description":"version 1","id":"2","lastUpdateTimeSinceEpoch":"1731103949724","name":"v1","registeredModelId":"1","state":"LIVE"}],"nextPageToken":"","pageSize":0,"size":1}"#;
    pub const MODEL_ARTIFACTS: &str = r#"{"items":[{"artifactType":"model-artifact","createTimeSinceEpoch":"1731103949909","customProperties":{},"description":"version 1","id":"1","lastUpdateTimeSinceEpoch":"1731103949909","modelFormatName":"tensorflow","modelFormatVersion":"v1","name":"model-1-v1-artifact","state":"LIVE","uri":"https://foo.com"}],"nextPageToken":"","pageSize":0,"size":1}"#;

    /* answers like a registry holding one model, one version, one artifact */
    pub fn registry(request: &Recorded) -> (u16, String) {
	let path = request.path();
	match request.method.as_str() {
	    "POST" | "PATCH" => (201, String::from(r#"{"id": "42", "name": "created"}"#)),
	    _ if path.ends_with(REG_MODELS_URI) => (200, String::from(REGISTERED_MODELS)),
	    _ if path.ends_with("/versions") => (200, String::from(MODEL_VERSIONS)),
	    _ if path.ends_with("/artifacts") => (200, String::from(MODEL_ARTIFACTS)),
	    _ if path.contains(REG_MODELS_URI) => (200, String::from(REGISTERED_MODEL)),
	    _ => (404, String::from("not found")),
	}
    }

    pub fn client(server: &MockServer) -> KubeflowClient {
	let rest = RestClient::new(&format!("{}{}", server.url, BASE_URI), Some(String::from("t0k3n")), false).unwrap();
	KubeflowClient::from_rest(rest)
    }

    #[tokio::test]
    async fn list_registered_models() {
	let server = MockServer::start(registry);

	let models = client(&server).list_registered_models().await.unwrap();

	assert_eq!(models.len(), 1);
	assert_eq!(models[0].name, "model-1");
	assert_eq!(models[0].description.as_deref(), Some("dummy model 1"));
	let request = &server.requests()[0];
	assert_eq!(request.path(), "/api/model_registry/v1alpha3/registered_models");
	assert_eq!(request.authorization.as_deref(), Some("Bearer t0k3n"));
    }

    #[tokio::test]
    async fn versions_and_artifacts() {
	let server = MockServer::start(registry);
	let kf = client(&server);

	let rm = kf.get_registered_model("1").await.unwrap();
	assert_eq!(rm.id.as_deref(), Some("1"));

	let versions = kf.list_model_versions("1").await.unwrap();
	assert_eq!(versions[0].name, "v1");
	assert_eq!(versions[0].registered_model_id, "1");

	let artifacts = kf.list_model_artifacts("2").await.unwrap();
	assert_eq!(artifacts[0].uri.as_deref(), Some("https://foo.com"));
	assert_eq!(artifacts[0].model_format_name.as_deref(), Some("tensorflow"));

	let paths: Vec<String> = server.requests().iter().map(|r| r.path().to_string()).collect();
	assert_eq!(paths, vec![
	    "/api/model_registry/v1alpha3/registered_models/1",
	    "/api/model_registry/v1alpha3/registered_models/1/versions",
	    "/api/model_registry/v1alpha3/model_versions/2/artifacts",
	]);
    }

    #[tokio::test]
    async fn list_all() {
	let server = MockServer::start(|request| {
	    match request.path() {
		"/api/model_registry/v1alpha3/model_versions" => (200, String::from(MODEL_VERSIONS)),
		"/api/model_registry/v1alpha3/model_artifacts" => (200, String::from(MODEL_ARTIFACTS)),
		_ => (404, String::new()),
	    }
	});
	let kf = client(&server);

	assert_eq!(kf.list_all_model_versions().await.unwrap()[0].id.as_deref(), Some("2"));
	assert_eq!(kf.list_all_model_artifacts().await.unwrap()[0].name.as_deref(), Some("model-1-v1-artifact"));
    }

    #[tokio::test]
    async fn list_follows_page_tokens() {
	let server = MockServer::start(|request| {
	    match request.query("nextPageToken").first().map(String::as_str) {
		None => (200, String::from(r#"{"items":[{"id":"1","name":"model-1"}],"nextPageToken":"page2","pageSize":1,"size":1}"#)),
		Some("page2") => (200, String::from(r#"{"items":[{"id":"2","name":"model-2"}],"nextPageToken":"","pageSize":1,"size":1}"#)),
		Some(_) => (400, String::from("bad token")),
	    }
	});

	let models = client(&server).list_registered_models().await.unwrap();

	let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
	assert_eq!(names, vec!["model-1", "model-2"]);
	assert_eq!(server.requests().len(), 2);
	assert_eq!(server.requests()[1].path(), "/api/model_registry/v1alpha3/registered_models");
    }

    #[tokio::test]
    async fn repeated_page_token_stops_listing() {
	let server = MockServer::start(|_| {
	    (200, String::from(r#"{"items":[{"id":"1","name":"model-1"}],"nextPageToken":"same","pageSize":1,"size":1}"#))
	});

	let models = client(&server).list_registered_models().await.unwrap();

	assert_eq!(models.len(), 2);
	assert_eq!(server.requests().len(), 2);
    }

    #[tokio::test]
    async fn unknown_object_is_an_error() {
	let server = MockServer::start(registry);

	match client(&server).get_model_version("9").await {
	    Err(Error::Status{ status, .. }) => assert_eq!(status, 404),
	    other => panic!("expected a status error, got {:?}", other),
	}
    }

    #[tokio::test]
    async fn writes_return_the_id() {
	let server = MockServer::start(registry);
	let kf = client(&server);

	let id = kf.create_registered_model(&RegisteredModel::new("model-2")).await.unwrap();
	assert_eq!(id, "42");
	let id = kf.create_model_version(&ModelVersion::new("v2", "42")).await.unwrap();
	assert_eq!(id, "42");
	let id = kf.create_model_artifact("42", &ModelArtifact::new("a2")).await.unwrap();
	assert_eq!(id, "42");
	kf.patch_model_artifact("42", &ModelArtifact::new("a2")).await.unwrap();

	let requests = server.requests();
	assert_eq!(requests[0].method, "POST");
	assert_eq!(requests[0].path(), "/api/model_registry/v1alpha3/registered_models");
	assert_eq!(requests[1].path(), "/api/model_registry/v1alpha3/registered_models/42/versions");
	assert_eq!(requests[2].path(), "/api/model_registry/v1alpha3/model_versions/42/artifacts");
	assert_eq!(requests[3].method, "PATCH");
	assert_eq!(requests[3].path(), "/api/model_registry/v1alpha3/model_artifacts/42");

	let body: Value = serde_json::from_str(&requests[1].body).unwrap();
	assert_eq!(body, serde_json::json!({"name": "v2", "registeredModelId": "42"}));
    }

    #[tokio::test]
    async fn patches_and_artifact_get() {
	let server = MockServer::start(|request| {
	    match (request.method.as_str(), request.path()) {
		("PATCH", _) => (200, request.body.clone()),
		("GET", "/api/model_registry/v1alpha3/model_artifacts/1") => (200, String::from(r#"{"id": "1", "name": "a1", "artifactType": "model-artifact"}"#)),
		_ => (404, String::new()),
	    }
	});
	let kf = client(&server);

	let mut model = RegisteredModel::new("model-1");
	model.id = Some(String::from("1"));
	assert_eq!(kf.patch_registered_model("1", &model).await.unwrap(), "1");

	let mut version = ModelVersion::new("v1", "1");
	version.id = Some(String::from("2"));
	assert_eq!(kf.patch_model_version("2", &version).await.unwrap(), "2");

	let artifact = kf.get_model_artifact("1").await.unwrap();
	assert_eq!(artifact.name.as_deref(), Some("a1"));

	let requests = server.requests();
	assert_eq!(requests[0].path(), "/api/model_registry/v1alpha3/registered_models/1");
	assert_eq!(requests[1].path(), "/api/model_registry/v1alpha3/model_versions/2");
	assert_eq!(requests[1].method, "PATCH");
    }

    #[tokio::test]
    async fn write_without_id_fails() {
	let server = MockServer::start(|_| (200, String::from(r#"{"name": "no id"}"#)));

	let res = client(&server).patch_registered_model("1", &RegisteredModel::new("m")).await;
	assert!(matches!(res, Err(Error::Other(_))));
    }

    #[test]
    fn numeric_ids() {
	assert_eq!(response_id(r#"{"id": 7}"#).unwrap(), "7");
    }
}
