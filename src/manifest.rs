//! Deployment-field sync for manifests
//!
//! Copies a few named fields from an external deployment-description record
//! into a manifest: the deployment name, the stemcell version/OS, and the
//! release name/version list. The mapping is fixed; everything else in the
//! manifest passes through untouched.

use crate::core::node::Node;
use crate::error::{OpsmithError, Result};
use serde::Deserialize;

/// An external deployment-description record
///
/// Unknown fields in the source data (release job lists and the like) are
/// ignored during decoding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceDeployment {
    pub deployment_name: String,
    pub stemcell: StemcellSpec,
    #[serde(default)]
    pub releases: Vec<ReleaseSpec>,
}

/// The stemcell portion of a deployment record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StemcellSpec {
    pub version: String,
    pub os: String,
}

/// One release reference in a deployment record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReleaseSpec {
    pub name: String,
    pub version: String,
}

impl ServiceDeployment {
    /// Decode a deployment record from YAML bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_yaml::from_slice(bytes).map_err(|e| OpsmithError::parse("deployment record", e))
    }
}

/// Rewrite `manifest` with the record's name, stemcell, and releases
///
/// The stemcell list collapses to exactly one entry: when the manifest
/// already has a single stemcell, its other fields (the alias in particular)
/// are kept and only version/OS are overwritten. The release list is replaced
/// wholesale with `{name, version}` pairs.
pub fn update_from_service_deployment(
    manifest: &[u8],
    deployment: &ServiceDeployment,
) -> Result<Vec<u8>> {
    let root = Node::from_bytes(manifest)?;
    let mut entries = match root {
        Node::Mapping(entries) => entries,
        Node::Null => Vec::new(),
        other => {
            return Err(OpsmithError::invalid_document(format!(
                "expected the manifest root to be a mapping, found {}",
                other.type_name()
            )))
        }
    };

    upsert(
        &mut entries,
        "name",
        Node::string(&deployment.deployment_name),
    );

    let mut stemcell = match entries
        .iter()
        .find(|(k, _)| k == "stemcells")
        .map(|(_, v)| v)
    {
        Some(Node::Sequence(items)) if items.len() == 1 => match &items[0] {
            Node::Mapping(fields) => fields.clone(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    upsert(
        &mut stemcell,
        "version",
        Node::string(&deployment.stemcell.version),
    );
    upsert(&mut stemcell, "os", Node::string(&deployment.stemcell.os));
    upsert(
        &mut entries,
        "stemcells",
        Node::Sequence(vec![Node::Mapping(stemcell)]),
    );

    let releases = deployment
        .releases
        .iter()
        .map(|release| {
            Node::mapping(vec![
                ("name".to_string(), Node::string(&release.name)),
                ("version".to_string(), Node::string(&release.version)),
            ])
        })
        .collect();
    upsert(&mut entries, "releases", Node::Sequence(releases));

    Ok(Node::Mapping(entries).to_yaml_string()?.into_bytes())
}

/// Overwrite an entry in place, or append it when absent
fn upsert(entries: &mut Vec<(String, Node)>, key: &str, value: Node) {
    match entries.iter_mut().find(|(k, _)| k == key) {
        Some((_, existing)) => *existing = value,
        None => entries.push((key.to_string(), value)),
    }
}
