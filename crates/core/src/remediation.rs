use crate::diagnosis::{DiagnosisResult, FixAction, Status};

/// What the monitor should do with a diagnosis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NoOp,
    /// Surface the fix to the operator. Never executed by the gate itself.
    ProposeAction { description: String, fix: FixAction },
}

impl Action {
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::NoOp => None,
            Self::ProposeAction { description, .. } => Some(description),
        }
    }
}

/// Turn a diagnosis into an action.
///
/// A `Stable` verdict always yields `NoOp`, even if a fix was (wrongly)
/// populated. A `Critical` verdict without a fix has nothing to propose.
pub fn gate(result: &DiagnosisResult) -> Action {
    match (result.status, &result.fix_script) {
        (Status::Critical, Some(fix)) => Action::ProposeAction {
            description: fix.description(),
            fix: fix.clone(),
        },
        (Status::Critical, None) | (Status::Stable, _) => Action::NoOp,
    }
}
