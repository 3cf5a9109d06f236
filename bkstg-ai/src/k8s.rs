use crate::config::Config;
use crate::errors::Result;

use kube::config::KubeConfigOptions;
use kube::config::Kubeconfig;
use kube::Client as KubeClient;
use kube::Config as KubeConfig;
use log;
use std::path::Path;

/*
 * A kube client together with the namespace the command operates in.
 */
pub struct KubeTarget {
    pub client: KubeClient,
    pub namespace: String,
}

/*
 * Loads the client configuration from an explicit kubeconfig file, or
 * infers it (KUBECONFIG, ~/.kube/config, in-cluster service account).
 */
pub async fn load_config(kubeconfig: Option<&Path>) -> Result<KubeConfig> {
    let config = match kubeconfig {
	Some(path) => {
	    let kubeconfig = Kubeconfig::read_from(path)?;
	    KubeConfig::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?
	},
	None => KubeConfig::infer().await?,
    };
    Ok(config)
}

/*
 * The --namespace flag wins; otherwise the namespace of the current
 * context (kube already falls back to "default" when it has none).
 */
pub fn resolve_namespace(flag: Option<&str>, config: &KubeConfig) -> String {
    match flag {
	Some(ns) if !ns.is_empty() => ns.to_string(),
	_ => config.default_namespace.clone(),
    }
}

pub async fn connect(cfg: &Config) -> Result<KubeTarget> {
    let config = load_config(cfg.kubeconfig.as_deref()).await?;
    let namespace = resolve_namespace(cfg.namespace.as_deref(), &config);
    log::debug!("using cluster {} namespace {}", config.cluster_url, namespace);

    let client = KubeClient::try_from(config)?;
    Ok(KubeTarget{
	client: client,
	namespace: namespace,
    })
}
