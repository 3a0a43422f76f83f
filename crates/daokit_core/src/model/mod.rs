//! Entity contracts and reference domain model.
//!
//! # Responsibility
//! - Define the capability traits engine primitives are generic over.
//! - Provide lookup keys, owner references and credentials.
//! - Ship reference entities that exercise every capability.
//!
//! # Invariants
//! - Capabilities are expressed as traits; nothing is probed at runtime.
//! - Every entity can be copied and normalized.

pub mod attachment;
pub mod capability;
pub mod credential;
pub mod key;
pub mod label;
pub mod member;
pub mod organization;
pub mod owner;
