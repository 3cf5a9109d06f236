use super::{BackstageClient, LOCATION_URI};
use crate::errors::Result;
use crate::output;

use bkstg_ai_api::LocationSpec;
use log;
use url::Url;

impl BackstageClient {

    pub async fn list_locations(&self) -> Result<String> {
	let body = self.rest.get(LOCATION_URI).await?;
	output::indent_json(&body)
    }

    /*
     * Locations are addressed by the id the catalog generated at import
     * time; there is no lookup by target URL.
     */
    pub async fn get_location(&self, ids: &[String]) -> Result<String> {
	if ids.is_empty() {
	    return self.list_locations().await;
	}

	let mut buffer = String::new();
	for id in ids {
	    let body = self.rest.get(&format!("{}/{}", LOCATION_URI, id)).await?;
	    buffer.push_str(&output::indent_json(&body)?);
	    buffer.push('\n');
	}
	Ok(buffer)
    }

    /*
     * Registers a catalog-info URL with the catalog, which then ingests
     * every entity found there.
     */
    pub async fn import_location(&self, target: &str) -> Result<String> {
	/* validated only, the catalog gets the URL as given */
	Url::parse(target)?;
	let body = LocationSpec::url(target);

	log::debug!("importing location {}", target);
	let resp = self.rest.post(LOCATION_URI, &body).await?;
	output::indent_json(&resp)
    }

    pub async fn delete_location(&self, id: &str) -> Result<String> {
	let resp = self.rest.delete(&format!("{}/{}", LOCATION_URI, id)).await?;

	// the catalog answers 204 without a body
	if resp.trim().is_empty() {
	    return Ok(format!("location {} deleted", id));
	}
	output::indent_json(&resp)
    }
}
