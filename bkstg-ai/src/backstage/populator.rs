use crate::config::OutputFormat;
use crate::errors::Result;
use crate::output;

use bkstg_ai_api::catalog::{API_KIND, API_TYPE, COMPONENT_KIND, COMPONENT_TYPE, RESOURCE_KIND, RESOURCE_TYPE, TECHDOC_REFS};
use bkstg_ai_api::{ApiEntity, ApiSpec, ComponentEntity, ComponentSpec, EntityLink, EntityMeta, ResourceEntity, ResourceSpec};
use std::collections::BTreeMap;
use std::io::Write;

/*
 * Which of the three entities a populator is feeding. Sources expose the
 * same model as a Component (the model server), a Resource (the model)
 * and an API (its serving endpoint), and some accessors answer per role.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityRole {
    Component,
    Resource,
    Api,
}

impl EntityRole {

    /* where the techdocs of each entity live, relative to the catalog-info */
    pub fn techdoc_ref(&self) -> &'static str {
	match self {
	    EntityRole::Component => "./",
	    EntityRole::Resource => "resource/",
	    EntityRole::Api => "api/",
	}
    }
}

/*
 * Uniform view over a source object (an InferenceService, a registered
 * model) from which catalog entities get built.
 */
pub trait CommonPopulator {
    fn role(&self) -> EntityRole;
    fn owner(&self) -> String;
    fn lifecycle(&self) -> String;
    fn name(&self) -> String;
    fn description(&self) -> String;
    fn display_name(&self) -> String;
    fn links(&self) -> Vec<EntityLink>;
    fn tags(&self) -> Vec<String>;
    fn provided_apis(&self) -> Vec<String>;

    fn techdoc_ref(&self) -> String {
	self.role().techdoc_ref().to_string()
    }
}

pub trait ComponentPopulator: CommonPopulator {
    fn depends_on(&self) -> Vec<String>;
}

pub trait ResourcePopulator: CommonPopulator {
    fn dependency_of(&self) -> Vec<String>;
}

pub trait ApiPopulator: CommonPopulator {
    fn definition(&self) -> String;
    fn dependency_of(&self) -> Vec<String>;
}

fn user_ref(owner: &str) -> String {
    format!("user:{}", owner)
}

fn build_metadata<P: CommonPopulator + ?Sized>(pop: &P) -> EntityMeta {
    let description = pop.description();
    let title = pop.display_name();

    let mut annotations = BTreeMap::new();
    annotations.insert(TECHDOC_REFS.to_string(), pop.techdoc_ref());

    EntityMeta{
	name: pop.name(),
	title: if title.is_empty() { None } else { Some(title) },
	description: if description.is_empty() { None } else { Some(description) },
	annotations: annotations,
	tags: pop.tags(),
	links: pop.links(),
	..EntityMeta::default()
    }
}

pub fn build_component<P: ComponentPopulator + ?Sized>(pop: &P) -> ComponentEntity {
    let spec = ComponentSpec{
	component_type: COMPONENT_TYPE.to_string(),
	lifecycle: pop.lifecycle(),
	owner: user_ref(&pop.owner()),
	provides_apis: pop.provided_apis(),
	depends_on: pop.depends_on(),
	..ComponentSpec::default()
    };
    ComponentEntity::new(COMPONENT_KIND, build_metadata(pop), spec)
}

pub fn build_resource<P: ResourcePopulator + ?Sized>(pop: &P) -> ResourceEntity {
    let spec = ResourceSpec{
	resource_type: RESOURCE_TYPE.to_string(),
	owner: user_ref(&pop.owner()),
	lifecycle: pop.lifecycle(),
	provides_apis: pop.provided_apis(),
	dependency_of: pop.dependency_of(),
	..ResourceSpec::default()
    };
    ResourceEntity::new(RESOURCE_KIND, build_metadata(pop), spec)
}

pub fn build_api<P: ApiPopulator + ?Sized>(pop: &P) -> ApiEntity {
    let spec = ApiSpec{
	api_type: API_TYPE.to_string(),
	lifecycle: pop.lifecycle(),
	owner: user_ref(&pop.owner()),
	definition: pop.definition(),
	dependency_of: pop.dependency_of(),
	..ApiSpec::default()
    };
    ApiEntity::new(API_KIND, build_metadata(pop), spec)
}

/*
 * Writes the three entities of one model as a multi-document stream:
 * Component, Resource, then API. Models are separated from each other by
 * the divider as well.
 */
pub fn print_model<W, C, R, A>(out: &mut W, format: OutputFormat, component: &C, resource: &R, api: &A, last: bool) -> Result<()>
where
    W: Write,
    C: ComponentPopulator + ?Sized,
    R: ResourcePopulator + ?Sized,
    A: ApiPopulator + ?Sized,
{
    output::print_entity(out, &build_component(component), format, true)?;
    output::print_entity(out, &build_resource(resource), format, true)?;
    output::print_entity(out, &build_api(api), format, !last)?;
    Ok(())
}
