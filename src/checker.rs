use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{registry::FeatureRegistry, GateError};

/// Strategy invoked when a guarded endpoint's feature is not in the caller's
/// enabled set. The checker hands the effect back to the caller unconsumed;
/// the surrounding framework decides whether it aborts dispatch.
pub trait DenialHandler {
    type Effect;

    fn handle(&self, feature: &str) -> Self::Effect;
}

/// Default denial strategy: signal an authorization failure. Under actix the
/// resulting [`GateError`] renders as HTTP 403.
#[derive(Debug, Clone, Default)]
pub struct RaiseDenial;

impl DenialHandler for RaiseDenial {
    type Effect = GateError;

    fn handle(&self, feature: &str) -> GateError {
        GateError::FeatureNotEnabled(feature.to_string())
    }
}

/// Outcome of a passing access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No feature covers the endpoint; the gate does not apply.
    Unguarded,
    /// The covering feature is in the enabled set.
    Allowed,
}

/// Per-request gate over a shared [`FeatureRegistry`].
///
/// Holds the caller's enabled-feature set for one request context. The set
/// starts empty and stays empty until [`enable_features`] is called, so a
/// guarded endpoint is denied by default — the gate fails closed.
///
/// [`enable_features`]: AccessChecker::enable_features
pub struct AccessChecker<'r, H = RaiseDenial> {
    registry: &'r FeatureRegistry,
    enabled: HashSet<String>,
    handler: H,
}

impl<'r> AccessChecker<'r, RaiseDenial> {
    pub fn new(registry: &'r FeatureRegistry) -> Self {
        AccessChecker::with_handler(registry, RaiseDenial)
    }
}

impl<'r, H: DenialHandler> AccessChecker<'r, H> {
    pub fn with_handler(registry: &'r FeatureRegistry, handler: H) -> Self {
        AccessChecker {
            registry,
            enabled: HashSet::new(),
            handler,
        }
    }

    /// Replace the enabled-feature set for this request context. The caller
    /// sources the identifiers externally (session, user profile, settings
    /// model); any prior value is discarded.
    pub fn enable_features<I, S>(&mut self, identifiers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled = identifiers.into_iter().map(Into::into).collect();
    }

    pub fn feature_enabled(&self, identifier: &str) -> bool {
        self.enabled.contains(identifier)
    }

    /// Identifier of the feature covering (controller, action), independent
    /// of the enabled set.
    pub fn feature_accessed(&self, controller: &str, action: &str) -> Option<&'r str> {
        self.registry.feature_accessed(controller, action)
    }

    /// Pre-action gate. Unguarded endpoints and endpoints whose covering
    /// feature is enabled pass; otherwise the denial handler runs and its
    /// effect is returned as `Err`.
    pub fn check_feature_access(&self, controller: &str, action: &str) -> Result<Access, H::Effect> {
        let Some(feature) = self.feature_accessed(controller, action) else {
            return Ok(Access::Unguarded);
        };
        if self.enabled.contains(feature) {
            debug!("feature {} enabled for {}/{}", feature, controller, action);
            Ok(Access::Allowed)
        } else {
            warn!("feature {} not enabled for {}/{}", feature, controller, action);
            Err(self.handler.handle(feature))
        }
    }
}
