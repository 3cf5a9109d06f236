/*
 * bkstg-ai/api - defines the objects exchanged with the three systems
 * the CLI bridges: the Backstage catalog, KServe and the Kubeflow model
 * registry.
 */

pub mod catalog;
pub use catalog::ApiEntity;
pub use catalog::ApiSpec;
pub use catalog::ComponentEntity;
pub use catalog::ComponentSpec;
pub use catalog::Entity;
pub use catalog::EntityLink;
pub use catalog::EntityList;
pub use catalog::EntityMeta;
pub use catalog::LocationSpec;
pub use catalog::ResourceEntity;
pub use catalog::ResourceSpec;

pub mod kserve;
pub use kserve::InferenceService;
pub use kserve::InferenceServiceSpec;
pub use kserve::InferenceServiceStatus;

pub mod registry;
pub use registry::MetadataValue;
pub use registry::ModelArtifact;
pub use registry::ModelVersion;
pub use registry::RegisteredModel;
pub use registry::RegistryList;
