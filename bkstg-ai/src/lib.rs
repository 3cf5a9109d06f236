/*
 * bkstg-ai - renders AI models found in KServe or in a Kubeflow Model
 * Registry as Backstage catalog entities, and manages them in the catalog.
 */

pub mod backstage;
pub mod cli;
pub mod config;
pub mod errors;
pub mod k8s;
pub mod kserve;
pub mod kubeflow;
pub mod output;
pub mod rest;

#[cfg(test)]
mod testutil;
