use crate::errors::{Error, Result};

use log;
use reqwest::Client as HttpClient;
use reqwest::Method;
use reqwest::RequestBuilder;
use serde::Serialize;

/*
 * RestClient is the thin layer both backends share: a root URL every path
 * is appended to, an optional bearer token, and status checking that turns
 * any non-2xx answer into an Error::Status carrying the response body.
 */
#[derive(Clone, Debug)]
pub struct RestClient {
    http: HttpClient,
    root_url: String,
    token: Option<String>,
}

impl RestClient {

    pub fn new(root_url: &str, token: Option<String>, skip_tls: bool) -> Result<Self> {
	let http = HttpClient::builder()
	    .danger_accept_invalid_certs(skip_tls)
	    .build()?;

	Ok(Self{
	    http: http,
	    root_url: root_url.trim_end_matches('/').to_string(),
	    token: token,
	})
    }

    pub fn url(&self, path: &str) -> String {
	format!("{}{}", self.root_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
	let builder = self.http.request(method, self.url(path));
	match &self.token {
	    Some(token) => builder.bearer_auth(token),
	    None => builder,
	}
    }

    async fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<String> {
	let url = self.url(path);
	log::debug!("{} {}", method, url);

	let response = builder.send().await?;
	let status = response.status();
	let body = response.text().await?;

	if !status.is_success() {
	    return Err(Error::Status{
		method: method.to_string(),
		url: url,
		status: status.as_u16(),
		body: body,
	    });
	}

	log::debug!("{} {} returned {}", method, url, status.as_u16());
	Ok(body)
    }

    pub async fn get(&self, path: &str) -> Result<String> {
	self.get_with_query(path, &[]).await
    }

    pub async fn get_with_query(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
	let builder = self.request(Method::GET, path).query(query);
	self.send(Method::GET, path, builder).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
	let builder = self.request(Method::POST, path).json(body);
	self.send(Method::POST, path, builder).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
	let builder = self.request(Method::PATCH, path).json(body);
	self.send(Method::PATCH, path, builder).await
    }

    pub async fn delete(&self, path: &str) -> Result<String> {
	let builder = self.request(Method::DELETE, path);
	self.send(Method::DELETE, path, builder).await
    }
}

/*
 * Plain GET of an absolute URL, used for documents served by the model
 * servers themselves (their OpenAPI definition).
 */
pub async fn fetch_url(http: &HttpClient, url: &str) -> Result<String> {
    let response = http.get(url).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
	return Err(Error::Status{
	    method: String::from("GET"),
	    url: url.to_string(),
	    status: status.as_u16(),
	    body: body,
	});
    }
    Ok(body)
}
