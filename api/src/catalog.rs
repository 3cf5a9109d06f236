use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const VERSION: &str = "backstage.io/v1alpha1";
pub const TECHDOC_REFS: &str = "backstage.io/techdocs-ref";
pub const DEFAULT_NS: &str = "default";

pub const COMPONENT_KIND: &str = "Component";
pub const RESOURCE_KIND: &str = "Resource";
pub const API_KIND: &str = "API";

/* spec.type values marking an entity as AI related */
pub const COMPONENT_TYPE: &str = "model-server";
pub const RESOURCE_TYPE: &str = "ai-model";
pub const API_TYPE: &str = "openapi";

pub const LINK_API_URL: &str = "API URL";
pub const LINK_TYPE_WEBSITE: &str = "website";
pub const LINK_ICON_WEBASSET: &str = "WebAsset";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityLink {
    pub url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,

    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub link_type: String,
}

impl EntityLink {

    /*
     * All links the CLI generates are website links rendered with the
     * WebAsset icon, only url and title vary.
     */
    pub fn website(url: &str, title: &str) -> Self {
	Self{
	    url: url.to_string(),
	    title: title.to_string(),
	    icon: LINK_ICON_WEBASSET.to_string(),
	    link_type: LINK_TYPE_WEBSITE.to_string(),
	}
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMeta {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<EntityLink>,

    // uid, etag and whatever else the catalog hands back
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/*
 * A catalog entity envelope. The kind specific part lives in `spec`, any
 * field the catalog returns that we do not model (relations, status) is
 * kept in `extra` so re-serialized query results are not lossy.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity<S> {
    pub api_version: String,
    pub kind: String,
    pub metadata: EntityMeta,
    pub spec: S,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl<S> Entity<S> {

    pub fn new(kind: &str, metadata: EntityMeta, spec: S) -> Self {
	Self{
	    api_version: VERSION.to_string(),
	    kind: kind.to_string(),
	    metadata: metadata,
	    spec: spec,
	    extra: BTreeMap::new(),
	}
    }

    pub fn tags(&self) -> &[String] {
	&self.metadata.tags
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    #[serde(rename = "type")]
    pub component_type: String,

    pub lifecycle: String,

    pub owner: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcomponent_of: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provides_apis: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes_apis: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    #[serde(rename = "type")]
    pub resource_type: String,

    pub owner: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub lifecycle: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provides_apis: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependency_of: Vec<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSpec {
    #[serde(rename = "type")]
    pub api_type: String,

    pub lifecycle: String,

    pub owner: String,

    // the catalog rejects API entities without a definition
    #[serde(default)]
    pub definition: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependency_of: Vec<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

pub type ComponentEntity = Entity<ComponentSpec>;
pub type ResourceEntity = Entity<ResourceSpec>;
pub type ApiEntity = Entity<ApiSpec>;

/*
 * Response envelope of the catalog's by-query endpoint.
 */
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,

    #[serde(default)]
    pub total_items: Option<u64>,

    #[serde(default)]
    pub page_info: Option<Value>,
}

/*
 * Body of a location registration, `target` being the URL of a catalog
 * info file.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationSpec {
    #[serde(rename = "type")]
    pub location_type: String,

    pub target: String,
}

impl LocationSpec {

    pub fn url(target: &str) -> Self {
	Self{
	    location_type: String::from("url"),
	    target: target.to_string(),
	}
    }
}
