//! Controller-level feature gating for web applications.
//!
//! Applications declare named features and the controller/action endpoints
//! each one covers, then gate every incoming request: if a feature covers
//! the requested endpoint and the caller's enabled-feature set does not
//! contain it, a denial handler runs (by default this surfaces as an
//! authorization failure, HTTP 403 under actix-web).
//!
//! ```
//! use featgate::{AccessChecker, FeatureRegistry};
//!
//! let mut registry = FeatureRegistry::new();
//! registry.add_feature("Files", ["files", "file_comments"], None);
//!
//! let mut checker = AccessChecker::new(&registry);
//! checker.enable_features(["Files"]);
//! assert!(checker.check_feature_access("files", "index").is_ok());
//! ```
//!
//! Persistence of which features are enabled (session, user profile,
//! settings model) is the application's concern; the caller supplies the
//! enabled identifiers per request via [`AccessChecker::enable_features`]
//! or the [`EnabledFeatures`] request extension.

use std::fmt::{Display, Formatter};

use actix_web::{body::BoxBody, http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

mod checker;
mod extractors;
mod feature;
mod registry;

pub use checker::{Access, AccessChecker, DenialHandler, RaiseDenial};
pub use extractors::{EnabledFeatures, FeatureGate};
pub use feature::{Actions, ActionSpec, FeatureDefinition};
pub use registry::FeatureRegistry;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    MissingRegistry,
    FeatureNotEnabled(String),
    NoFeaturesFile,
    FeaturesFileReadError,
}

impl Display for GateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#?}", self)
    }
}

impl ResponseError for GateError {
    fn status_code(&self) -> StatusCode {
        match self {
            GateError::FeatureNotEnabled(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

pub type GateResult<T> = Result<T, GateError>;
