use thiserror::Error;

use loco_core::{AnchorId, EntityId};

#[derive(Debug, Error)]
pub enum AnchorError {
    #[error("anchor {0} not found")]
    UnknownAnchor(AnchorId),

    #[error("entity {0} already declares an anchor")]
    DuplicateEntity(EntityId),
}

pub type AnchorResult<T> = Result<T, AnchorError>;
