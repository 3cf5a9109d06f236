/*
 * In-process HTTP server standing in for the Backstage catalog and the
 * model registry. Every request is recorded and answered by the handler
 * given to `start`.
 */
use std::io::Read;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl Recorded {

    pub fn path(&self) -> &str {
	match self.url.split_once('?') {
	    Some((path, _)) => path,
	    None => &self.url,
	}
    }

    /* all decoded values of a query parameter, in request order */
    pub fn query(&self, key: &str) -> Vec<String> {
	let parsed = url::Url::parse(&format!("http://localhost{}", self.url)).unwrap();
	parsed.query_pairs()
	    .filter(|(k, _)| k == key)
	    .map(|(_, v)| v.into_owned())
	    .collect()
    }
}

pub struct MockServer {
    pub url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {

    pub fn start<F>(handler: F) -> Self
    where
	F: Fn(&Recorded) -> (u16, String) + Send + 'static,
    {
	let server = Server::http("127.0.0.1:0").unwrap();
	let addr = server.server_addr().to_ip().unwrap();
	let requests = Arc::new(Mutex::new(Vec::new()));
	let seen = requests.clone();

	thread::spawn(move || {
	    for mut request in server.incoming_requests() {
		let mut body = String::new();
		let _ = request.as_reader().read_to_string(&mut body);

		let authorization = request.headers().iter()
		    .find(|h| h.field.equiv("Authorization"))
		    .map(|h| h.value.as_str().to_string());
		let recorded = Recorded{
		    method: request.method().to_string(),
		    url: request.url().to_string(),
		    authorization: authorization,
		    body: body,
		};

		let (status, payload) = handler(&recorded);
		seen.lock().unwrap().push(recorded);

		let content_type = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
		let response = Response::from_string(payload)
		    .with_status_code(status)
		    .with_header(content_type);
		let _ = request.respond(response);
	    }
	});

	Self{
	    url: format!("http://{}", addr),
	    requests: requests,
	}
    }

    pub fn requests(&self) -> Vec<Recorded> {
	self.requests.lock().unwrap().clone()
    }
}
