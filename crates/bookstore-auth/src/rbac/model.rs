//! Rule model: the resource classes the enforcer knows and the grants a
//! newly registered principal receives.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use bookstore_core::types::{Action, PolicyRule};

use crate::error::AuthError;

use super::BUILTIN_MODEL;

/// A grant applied to every newly registered principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultGrant {
    /// Resource class.
    pub resource: String,
    /// Granted action.
    pub action: Action,
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    model: ModelSection,
}

#[derive(Debug, Deserialize)]
struct ModelSection {
    resources: Vec<String>,
    #[serde(default)]
    default_grants: Vec<DefaultGrant>,
}

/// Validated rule model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyModel {
    resources: BTreeSet<String>,
    default_grants: Vec<DefaultGrant>,
}

impl PolicyModel {
    /// The model compiled into the binary.
    pub fn builtin() -> Result<Self, AuthError> {
        Self::from_toml_str(BUILTIN_MODEL)
    }

    /// Loads a model from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AuthError::PolicyLoadFailed(format!("cannot read model {}: {e}", path.display()))
        })?;
        let model = Self::from_toml_str(&raw)?;
        info!(path = %path.display(), resources = model.resources.len(), "Loaded policy model");
        Ok(model)
    }

    /// Loads the model at `path`, or the built-in one when `path` is `None`.
    pub fn load_or_builtin(path: Option<&str>) -> Result<Self, AuthError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    /// Parses and validates a TOML model definition.
    pub fn from_toml_str(raw: &str) -> Result<Self, AuthError> {
        let file: ModelFile = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AuthError::PolicyLoadFailed(format!("invalid policy model: {e}")))?;

        Self::new(file.model.resources, file.model.default_grants)
    }

    /// Builds a model from parts.
    pub fn new(
        resources: impl IntoIterator<Item = String>,
        default_grants: Vec<DefaultGrant>,
    ) -> Result<Self, AuthError> {
        let resources: BTreeSet<String> = resources.into_iter().collect();
        if resources.is_empty() {
            return Err(AuthError::PolicyLoadFailed(
                "policy model declares no resource classes".to_string(),
            ));
        }
        if let Some(blank) = resources.iter().find(|r| r.trim().is_empty() || r.contains(',')) {
            return Err(AuthError::PolicyLoadFailed(format!(
                "invalid resource class name '{blank}'"
            )));
        }
        if let Some(grant) = default_grants
            .iter()
            .find(|g| !resources.contains(&g.resource))
        {
            return Err(AuthError::PolicyLoadFailed(format!(
                "default grant references unknown resource class '{}'",
                grant.resource
            )));
        }

        Ok(Self {
            resources,
            default_grants,
        })
    }

    /// Whether `resource` is a declared resource class.
    pub fn knows_resource(&self, resource: &str) -> bool {
        self.resources.contains(resource)
    }

    /// Declared resource classes, sorted.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(String::as_str)
    }

    /// Grants applied on registration.
    pub fn default_grants(&self) -> &[DefaultGrant] {
        &self.default_grants
    }

    /// The default grants expanded into rules for `principal_id`.
    pub fn default_rules_for(&self, principal_id: &str) -> Vec<PolicyRule> {
        self.default_grants
            .iter()
            .map(|g| PolicyRule::new(principal_id, g.resource.clone(), g.action))
            .collect()
    }
}
