use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    feature::{ActionSpec, FeatureDefinition},
    GateError,
};

/// Ordered catalog of feature definitions.
///
/// Built once during application startup and shared read-only while requests
/// are served (under actix, via `web::Data<FeatureRegistry>`). Registration
/// is append-only and performs no duplicate or overlap validation: lookup is
/// first match in registration order, so when coverage overlaps the earliest
/// registration wins. Applications may depend on that ordering.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct FeatureRegistry {
    features: Vec<FeatureDefinition>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        FeatureRegistry::default()
    }

    /// Register a feature covering the given controllers, plus optional
    /// finer-grained (controller, action) coverage.
    pub fn add_feature<I, S>(
        &mut self,
        identifier: impl Into<String>,
        controllers: I,
        other_actions: Option<Vec<ActionSpec>>,
    ) where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let definition =
            FeatureDefinition::new(identifier, controllers, other_actions.unwrap_or_default());
        debug!("registered feature {}", definition.identifier);
        self.features.push(definition);
    }

    /// Identifier of the first registered feature covering (controller,
    /// action), or `None` if the endpoint is unguarded.
    pub fn feature_accessed(&self, controller: &str, action: &str) -> Option<&str> {
        self.features
            .iter()
            .find(|f| f.includes_action(controller, action))
            .map(|f| f.identifier.as_str())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Load a registry from a JSON definitions file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GateError> {
        let file = File::open(path.as_ref()).map_err(|_| GateError::NoFeaturesFile)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|_| GateError::FeaturesFileReadError)
    }
}
