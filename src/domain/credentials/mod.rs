//! Credential management domain

mod credential;

pub use credential::{Credential, ProviderTier};
