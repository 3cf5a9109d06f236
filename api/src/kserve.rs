use kube_derive::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/*
 * The subset of the KServe InferenceService (serving.kserve.io/v1beta1)
 * the catalog entities are populated from. Framework specific predictor
 * settings are irrelevant here, only which one is set matters, so they
 * are carried as raw JSON.
 */
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(group = "serving.kserve.io", version = "v1beta1", kind = "InferenceService", namespaced)]
#[kube(status = "InferenceServiceStatus")]
#[serde(rename_all = "camelCase")]
pub struct InferenceServiceSpec {

    #[serde(default)]
    pub predictor: PredictorSpec,

    pub explainer: Option<ExplainerSpec>,

    pub transformer: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictorSpec {
    pub sklearn: Option<Value>,
    pub xgboost: Option<Value>,
    pub tensorflow: Option<Value>,
    pub pytorch: Option<Value>,
    pub triton: Option<Value>,
    pub onnx: Option<Value>,
    pub huggingface: Option<Value>,
    pub pmml: Option<Value>,
    pub lightgbm: Option<Value>,
    pub paddle: Option<Value>,

    /* the generic predictor, where the framework is named by modelFormat */
    pub model: Option<ModelSpec>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelSpec {
    pub model_format: ModelFormat,

    pub runtime: Option<String>,

    pub storage_uri: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct ModelFormat {
    pub name: String,

    pub version: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct ExplainerSpec {
    pub art: Option<ArtExplainerSpec>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct ArtExplainerSpec {
    #[serde(rename = "type")]
    pub explainer_type: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InferenceServiceStatus {
    pub url: Option<String>,

    /* keyed by component type: predictor, transformer, explainer */
    #[serde(default)]
    pub components: BTreeMap<String, ComponentStatusSpec>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStatusSpec {
    pub url: Option<String>,

    pub rest_url: Option<String>,

    pub grpc_url: Option<String>,
}

impl PredictorSpec {

    /*
     * Returns the name of the serving framework. KServe admits one and
     * only one predictor to be set; for the generic `model` predictor the
     * name is the lowercase model format, suffixed with its version.
     */
    pub fn framework(&self) -> Option<String> {
	let builtin = [
	    ("sklearn", &self.sklearn),
	    ("xgboost", &self.xgboost),
	    ("tensorflow", &self.tensorflow),
	    ("pytorch", &self.pytorch),
	    ("triton", &self.triton),
	    ("onnx", &self.onnx),
	    ("huggingface", &self.huggingface),
	    ("pmml", &self.pmml),
	    ("lightgbm", &self.lightgbm),
	    ("paddle", &self.paddle),
	];

	if let Some((name, _)) = builtin.iter().find(|(_, spec)| spec.is_some()) {
	    return Some(name.to_string());
	}

	let model = self.model.as_ref()?;
	let format = &model.model_format;
	let name = match &format.version {
	    Some(version) => format!("{}-{}", format.name, version),
	    None => format.name.clone(),
	};
	Some(name.to_lowercase())
    }
}

impl InferenceService {

    pub fn namespace_or_default(&self) -> String {
	match &self.metadata.namespace {
	    Some(ns) => ns.clone(),
	    None => String::from("default"),
	}
    }

    pub fn name_or_empty(&self) -> String {
	match &self.metadata.name {
	    Some(name) => name.clone(),
	    None => String::new(),
	}
    }

    /*
     * The lowercase ART explainer type, when an ART explainer is deployed.
     */
    pub fn explainer_type(&self) -> Option<String> {
	let explainer = self.spec.explainer.as_ref()?;
	let art = explainer.art.as_ref()?;
	Some(art.explainer_type.to_lowercase())
    }
}
