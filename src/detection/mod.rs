pub mod domain_overrides;

pub use domain_overrides::{OverrideEngine, OverrideOutcome, OverrideRule, RuleEffect};
