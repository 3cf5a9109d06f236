use super::filter;
use super::filter::TagMatch;
use super::{BackstageClient, EntityKind, APIS, COMPONENTS, QUERY_URI, RESOURCES};
use crate::errors::Result;
use crate::output;

use bkstg_ai_api::catalog::{ApiSpec, ComponentSpec, ResourceSpec};
use bkstg_ai_api::{Entity, EntityList};
use log;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/*
 * The cursor of the next page, if the catalog says there is one.
 */
fn next_cursor(page_info: &Option<Value>) -> Option<String> {
    page_info.as_ref()?
	.get("nextCursor")?
	.as_str()
	.map(|c| c.to_string())
}

impl BackstageClient {

    pub async fn get_components(&self, args: &[String]) -> Result<String> {
	self.get_kind::<ComponentSpec>(&COMPONENTS, args).await
    }

    pub async fn get_resources(&self, args: &[String]) -> Result<String> {
	self.get_kind::<ResourceSpec>(&RESOURCES, args).await
    }

    pub async fn get_apis(&self, args: &[String]) -> Result<String> {
	self.get_kind::<ApiSpec>(&APIS, args).await
    }

    /*
     * No arguments lists every AI entity of the kind. With tag matching on
     * the arguments are tags, otherwise `namespace:name` keys.
     */
    async fn get_kind<S>(&self, kind: &EntityKind, args: &[String]) -> Result<String>
    where
	S: Serialize + DeserializeOwned,
    {
	if args.is_empty() {
	    return self.list_kind::<S>(kind, &[], None).await;
	}

	if let Some(mode) = self.tag_match {
	    return self.list_kind::<S>(kind, args, Some(mode)).await;
	}

	self.get_by_names(kind, args).await
    }

    /*
     * Runs the by-query list for a kind, follows the page cursors, then
     * applies the tag filter the server could not express.
     */
    pub async fn list_kind<S>(&self, kind: &EntityKind, tags: &[String], mode: Option<TagMatch>) -> Result<String>
    where
	S: Serialize + DeserializeOwned,
    {
	let filter = filter::filter_value(kind.kind, kind.spec_type, tags, mode);
	let mut query = vec![("filter", filter)];
	let mut items: Vec<Entity<S>> = vec![];

	loop {
	    let body = self.rest.get_with_query(QUERY_URI, &query).await?;
	    let list: EntityList<Entity<S>> = serde_json::from_str(&body)?;
	    items.extend(list.items);

	    match next_cursor(&list.page_info) {
		Some(cursor) => query = vec![("cursor", cursor)],
		None => break,
	    }
	}

	if let Some(mode) = mode {
	    let fetched = items.len();
	    items.retain(|entity| filter::tags_match(tags, entity.tags(), mode));
	    log::debug!("{} of {} {} entities match tags {:?} ({:?})", items.len(), fetched, kind.kind, tags, mode);
	}

	output::to_json_indented(&items)
    }

    async fn get_by_names(&self, kind: &EntityKind, args: &[String]) -> Result<String> {
	let mut buffer = String::new();

	for (namespace, names) in filter::build_keys(args) {
	    for name in names {
		let body = self.rest.get(&kind.by_name_path(&namespace, &name)).await?;
		buffer.push_str(&output::indent_json(&body)?);
		buffer.push('\n');
	    }
	}
	Ok(buffer)
    }
}
