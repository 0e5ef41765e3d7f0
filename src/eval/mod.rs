pub mod dependence;
pub mod driver;
pub mod locator;
pub mod merge;
pub mod scope;

pub use driver::{ExperimentKind, ExperimentPlan, MicResult};
pub use scope::TableScope;
