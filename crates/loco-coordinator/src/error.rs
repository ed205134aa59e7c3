use loco_core::{AgentId, CoreError, ProviderGroup, ProviderId};
use loco_provider::ProviderError;
use loco_validation::AnchorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocomotionError {
    #[error("event raised for an invalid input source")]
    InvalidSource,

    #[error("provider {0} not registered")]
    UnknownProvider(ProviderId),

    #[error("agent {0} not registered")]
    UnknownAgent(AgentId),

    #[error("no registered provider matches {0:?}")]
    UnknownKind(String),

    #[error("provider {name:?} is a {family} provider but was assigned to the {group} group")]
    GroupMismatch {
        name:   String,
        family: ProviderGroup,
        group:  ProviderGroup,
    },

    #[error("a locomotion target override is already installed")]
    DuplicateTargetOverride,

    #[error("locomotion configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Anchor(#[from] AnchorError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub type LocomotionResult<T> = Result<T, LocomotionError>;
