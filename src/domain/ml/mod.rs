pub mod feature_registry;
pub mod scaler;
pub mod synthetic;

pub use feature_registry::{FEATURE_COUNT, FEATURE_NAMES, engineer_features, select_features};
pub use scaler::StandardScaler;
