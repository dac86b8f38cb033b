use serde::{Deserialize, Deserializer, de::IgnoredAny};

/// Deserializes an object into `Some`. Steam sends an empty array instead of an object when an
/// app has no data for the requested filters, which becomes `None`.
pub fn empty_array_as_none<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ObjectOrArray<T> {
        Object(T),
        Array(Vec<IgnoredAny>),
    }

    match Option::<ObjectOrArray<T>>::deserialize(deserializer)? {
        Some(ObjectOrArray::Object(value)) => Ok(Some(value)),
        Some(ObjectOrArray::Array(_)) | None => Ok(None),
    }
}
