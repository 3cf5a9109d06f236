/*
 * Client side of the Backstage catalog REST API, plus the populator
 * traits and builders that turn model metadata into catalog entities.
 */
pub mod entities;
pub mod filter;
pub mod locations;
pub mod populator;

use crate::config::Config;
use crate::errors::Result;
use crate::output;
use crate::rest::RestClient;
use filter::TagMatch;

use bkstg_ai_api::catalog::{API_TYPE, COMPONENT_TYPE, RESOURCE_TYPE};

pub const ENTITIES_URI: &str = "/api/catalog/entities";
pub const QUERY_URI: &str = "/api/catalog/entities/by-query";
pub const BY_NAME_URI: &str = "/api/catalog/entities/by-name";
pub const LOCATION_URI: &str = "/api/catalog/locations";

/*
 * An AI related kind: the lowercase kind used in filters and by-name
 * paths, and the spec.type value the CLI stamps on its entities.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityKind {
    pub kind: &'static str,
    pub spec_type: &'static str,
}

pub const COMPONENTS: EntityKind = EntityKind{ kind: "component", spec_type: COMPONENT_TYPE };
pub const RESOURCES: EntityKind = EntityKind{ kind: "resource", spec_type: RESOURCE_TYPE };
pub const APIS: EntityKind = EntityKind{ kind: "api", spec_type: API_TYPE };

impl EntityKind {

    pub fn by_name_path(&self, namespace: &str, name: &str) -> String {
	format!("{}/{}/{}/{}", BY_NAME_URI, self.kind, namespace, name)
    }
}

#[derive(Clone, Debug)]
pub struct BackstageClient {
    rest: RestClient,

    /* when set, positional arguments of the get commands are tags */
    tag_match: Option<TagMatch>,
}

impl BackstageClient {

    pub fn new(cfg: &Config) -> Result<Self> {
	let url = cfg.backstage_url()?;
	let rest = RestClient::new(&url, cfg.backstage_token(), cfg.backstage_skip_tls)?;
	Ok(Self::from_rest(rest))
    }

    pub fn from_rest(rest: RestClient) -> Self {
	Self{
	    rest: rest,
	    tag_match: None,
	}
    }

    pub fn with_tag_match(mut self, tag_match: Option<TagMatch>) -> Self {
	self.tag_match = tag_match;
	self
    }

    /*
     * Every entity in the catalog, AI related or not.
     */
    pub async fn list_entities(&self) -> Result<String> {
	let body = self.rest.get(ENTITIES_URI).await?;
	output::indent_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockServer;

    pub fn client(server: &MockServer) -> BackstageClient {
	BackstageClient::from_rest(RestClient::new(&server.url, None, false).unwrap())
    }

    #[tokio::test]
    async fn list_entities_is_indented() {
	let server = MockServer::start(|_| (200, String::from(r#"{"TestGet": "JSON response"}"#)));

	let out = client(&server).list_entities().await.unwrap();

	assert_eq!(out, "{\n    \"TestGet\": \"JSON response\"\n}");
	assert_eq!(server.requests()[0].path(), ENTITIES_URI);
    }

    #[test]
    fn new_requires_url() {
	assert!(BackstageClient::new(&Config::default()).is_err());
    }

    #[test]
    fn by_name_paths() {
	assert_eq!(COMPONENTS.by_name_path("default", "m"), "/api/catalog/entities/by-name/component/default/m");
	assert_eq!(APIS.by_name_path("ns", "m"), "/api/catalog/entities/by-name/api/ns/m");
    }
}
