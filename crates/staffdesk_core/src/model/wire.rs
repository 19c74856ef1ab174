//! Serde helpers for reading documents written by older or looser clients.

use serde::{Deserialize, Deserializer};

/// Deserializes `null` as `T::default()`.
///
/// Pair with `#[serde(default)]` so a missing key also falls back.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
