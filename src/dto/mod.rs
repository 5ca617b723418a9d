use serde::{Deserialize, Deserializer};

pub mod analysis;
pub mod auth;
pub mod catalog;
pub mod products;
pub mod reports;
pub mod rules;

/// Tell an explicit `null` apart from a missing field in partial updates:
/// missing is `None`, `null` is `Some(None)`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
