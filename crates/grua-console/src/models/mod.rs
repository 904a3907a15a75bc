mod documents;
mod parameter;
mod record;
mod request_log;

pub use documents::{
    ClassAssignment, ConfigurationDocument, EnvironmentSummary, FactRule, MatchType,
    NodeClassification, ParameterAssignment, RuleOperator, RulesDocument, VariablesDocument,
};
pub use parameter::{ParameterSpec, ParameterType};
pub use record::{ActivationState, RecordId, SearchableRecord};
pub use request_log::RequestLogEntry;
