mod feature_gate;

pub use feature_gate::{EnabledFeatures, FeatureGate};
