//! Serde helpers for gateway-produced envelopes.
//!
//! The function gateway emits `null` instead of an empty object for maps it
//! has nothing to put in (query parameters on a bare `GET`, for instance).

use serde::{Deserialize, Deserializer};

/// Deserializes `null` (or a missing field, together with `#[serde(default)]`)
/// as `T::default()`.
pub(crate) fn de_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
