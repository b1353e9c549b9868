use serde::Serialize;

use crate::workflows::notifications::NotificationPublisher;

use super::action::ModerationAction;
use super::domain::EntityRef;
use super::service::{ModerationService, TransitionOutcome, WorkflowError};
use super::store::BoardStore;

/// Lifecycle of a confirmation dialog gating one transition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DialogState {
    #[default]
    Closed,
    Open {
        target: EntityRef,
        action: ModerationAction,
        draft: String,
        error: Option<String>,
    },
    Submitting {
        target: EntityRef,
        action: ModerationAction,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("a dialog for {action} on {target} is already open")]
    AlreadyOpen {
        target: EntityRef,
        action: ModerationAction,
    },
    #[error("no dialog is open")]
    NotOpen,
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

/// Confirmation dialog: collects an optional justification and submits the
/// transition. A failed submission leaves the dialog open with its draft intact.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModerationDialog {
    state: DialogState,
}

impl ModerationDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open { .. })
    }

    pub fn open(&mut self, target: EntityRef, action: ModerationAction) -> Result<(), DialogError> {
        match &self.state {
            DialogState::Closed => {
                self.state = DialogState::Open {
                    target,
                    action,
                    draft: String::new(),
                    error: None,
                };
                Ok(())
            }
            DialogState::Open { target, action, .. }
            | DialogState::Submitting { target, action } => Err(DialogError::AlreadyOpen {
                target: *target,
                action: *action,
            }),
        }
    }

    /// Replace the justification text; ignored unless the dialog is open.
    pub fn edit(&mut self, text: impl Into<String>) {
        if let DialogState::Open { draft, .. } = &mut self.state {
            *draft = text.into();
        }
    }

    pub fn cancel(&mut self) {
        self.state = DialogState::Closed;
    }

    pub fn submit<S, N>(
        &mut self,
        service: &ModerationService<S, N>,
    ) -> Result<TransitionOutcome, DialogError>
    where
        S: BoardStore + 'static,
        N: NotificationPublisher + 'static,
    {
        let (target, action, draft) = match std::mem::take(&mut self.state) {
            DialogState::Open {
                target,
                action,
                draft,
                ..
            } => (target, action, draft),
            other => {
                self.state = other;
                return Err(DialogError::NotOpen);
            }
        };

        self.state = DialogState::Submitting { target, action };
        let justification = (!draft.is_empty()).then_some(draft.as_str());

        match service.transition_ref(target, action, justification) {
            Ok(outcome) => {
                self.state = DialogState::Closed;
                Ok(outcome)
            }
            Err(error) => {
                self.state = DialogState::Open {
                    target,
                    action,
                    error: Some(error.to_string()),
                    draft,
                };
                Err(error.into())
            }
        }
    }
}
