use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/*
 * Kubeflow Model Registry objects (REST API v1alpha3). Only the fields the
 * catalog entities are built from, or the CLI creates, are modeled.
 */

/*
 * A custom property value. The registry discriminates the variants with
 * `metadataType` and stores each one under its own `*_value` key.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "metadataType")]
pub enum MetadataValue {
    #[serde(rename = "MetadataStringValue")]
    String { string_value: String },

    // int64 travels as a JSON string
    #[serde(rename = "MetadataIntValue")]
    Int { int_value: String },

    #[serde(rename = "MetadataDoubleValue")]
    Double { double_value: f64 },

    #[serde(rename = "MetadataBoolValue")]
    Bool { bool_value: bool },

    #[serde(rename = "MetadataStructValue")]
    Struct { struct_value: String },

    #[serde(rename = "MetadataProtoValue")]
    Proto {
	#[serde(rename = "type")]
	proto_type: String,
	proto_value: String,
    },
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	match self {
	    MetadataValue::String { string_value } => write!(f, "{}", string_value),
	    MetadataValue::Int { int_value } => write!(f, "{}", int_value),
	    MetadataValue::Double { double_value } => write!(f, "{}", double_value),
	    MetadataValue::Bool { bool_value } => write!(f, "{}", bool_value),
	    MetadataValue::Struct { struct_value } => write!(f, "{}", struct_value),
	    MetadataValue::Proto { proto_value, .. } => write!(f, "{}", proto_value),
	}
    }
}

pub type CustomProperties = BTreeMap<String, MetadataValue>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time_since_epoch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_time_since_epoch: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_properties: CustomProperties,
}

impl RegisteredModel {

    pub fn new(name: &str) -> Self {
	Self{
	    name: name.to_string(),
	    ..Self::default()
	}
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelVersion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub registered_model_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time_since_epoch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_time_since_epoch: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_properties: CustomProperties,
}

impl ModelVersion {

    pub fn new(name: &str, registered_model_id: &str) -> Self {
	Self{
	    name: name.to_string(),
	    registered_model_id: registered_model_id.to_string(),
	    ..Self::default()
	}
    }
}

pub const MODEL_ARTIFACT_TYPE: &str = "model-artifact";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelArtifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default)]
    pub artifact_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_format_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_format_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time_since_epoch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_time_since_epoch: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_properties: CustomProperties,
}

impl ModelArtifact {

    pub fn new(name: &str) -> Self {
	Self{
	    name: Some(name.to_string()),
	    artifact_type: MODEL_ARTIFACT_TYPE.to_string(),
	    ..Self::default()
	}
    }
}

/*
 * Envelope of every list endpoint of the registry.
 */
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,

    #[serde(default)]
    pub next_page_token: String,

    #[serde(default)]
    pub page_size: i64,

    #[serde(default)]
    pub size: i64,
}
