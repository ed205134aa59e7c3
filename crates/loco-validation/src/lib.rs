//! `loco-validation` — deciding where a teleport may land.
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`query`]   | `QueryResult`, `SpatialQuery` trait, `LatchedQuery`   |
//! | [`result`]  | `ValidationResult`                                    |
//! | [`policy`]  | `ValidationPolicy`                                    |
//! | [`anchor`]  | `Anchor`, `AnchorSet`                                 |
//! | [`error`]   | `AnchorError`, `AnchorResult`                         |
//!
//! The policy never casts rays.  Hosts run their own spatial queries and
//! hand the results in through [`SpatialQuery`].

pub mod anchor;
pub mod error;
pub mod policy;
pub mod query;
pub mod result;


pub use anchor::{Anchor, AnchorSet};
pub use error::{AnchorError, AnchorResult};
pub use policy::ValidationPolicy;
pub use query::{LatchedQuery, QueryResult, SpatialQuery};
pub use result::ValidationResult;
