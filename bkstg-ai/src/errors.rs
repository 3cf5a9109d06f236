use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {

    /* encapsulate a kube-rust error */
    #[error("kube error: {0}")]
    Kube(#[from] kube::Error),

    #[error("kubeconfig error: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    #[error("unable to infer kubernetes configuration: {0}")]
    InferConfig(#[from] kube::config::InferConfigError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /* the remote end answered, but not with a success status */
    #[error("{method} {url} returned status {status}: {body}")]
    Status {
	method: String,
	url: String,
	status: u16,
	body: String,
    },

    #[error("{0}")]
    Usage(String),

    #[error("`{0}`")]
    Other(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
