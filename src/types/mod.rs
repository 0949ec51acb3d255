// src/types/mod.rs
//! Data shapes produced by the AI pipeline

pub mod job_offer;
pub mod profile;

pub use job_offer::{JobOffer, SearchMode};
pub use profile::Profile;

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
