use serde::{Deserialize, Deserializer};

/// Deserialize an explicit `null` (or an empty YAML value) as the type's default.
pub fn null_as_default<'de, D, T>(data: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(data)?.unwrap_or_default())
}
