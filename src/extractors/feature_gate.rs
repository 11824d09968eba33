use std::future::{ready, Ready};

use actix_web::{dev::Payload, web::Data, FromRequest, HttpMessage, HttpRequest};
use tracing::info;

use crate::{Access, AccessChecker, FeatureRegistry, GateError};

/// Request-scoped enabled-feature set, inserted into request extensions by
/// the hosting application (session middleware, auth layer, ...). An absent
/// extension is an empty set, so guarded endpoints are denied.
#[derive(Debug, Clone, Default)]
pub struct EnabledFeatures(pub Vec<String>);

/// Pre-action gate as an extractor: a handler that takes a `FeatureGate`
/// parameter only runs when the covering feature is enabled (or the
/// endpoint is unguarded); otherwise extraction fails with
/// [`GateError::FeatureNotEnabled`] and actix renders the 403.
///
/// Endpoint identity comes from the matched route's `{controller}` and
/// `{action}` segments. Routes without both segments carry no endpoint
/// identity and are unguarded.
#[derive(Debug, Clone)]
pub struct FeatureGate {
    pub access: Access,
    /// Identifier of the covering feature, when the endpoint is guarded.
    pub feature: Option<String>,
}

impl FromRequest for FeatureGate {
    type Error = GateError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(registry) = req.app_data::<Data<FeatureRegistry>>() else {
            info!("no FeatureRegistry registered as app data");
            return ready(Err(GateError::MissingRegistry));
        };
        let match_info = req.match_info();
        let (controller, action) = match (match_info.get("controller"), match_info.get("action")) {
            (Some(c), Some(a)) => (c.to_string(), a.to_string()),
            _ => {
                return ready(Ok(FeatureGate {
                    access: Access::Unguarded,
                    feature: None,
                }))
            }
        };
        let enabled = req
            .extensions()
            .get::<EnabledFeatures>()
            .cloned()
            .unwrap_or_default();

        let mut checker = AccessChecker::new(registry.get_ref());
        checker.enable_features(enabled.0);
        let feature = checker
            .feature_accessed(&controller, &action)
            .map(str::to_string);
        ready(
            checker
                .check_feature_access(&controller, &action)
                .map(|access| FeatureGate { access, feature }),
        )
    }
}
