mod contributor;
mod date;
mod link;
mod metadata;
mod publication;

pub use self::contributor::{Contributor, LocalizedString};
pub use self::link::Link;
pub use self::metadata::Metadata;
pub use self::publication::Publication;

/// Readium manifests allow most list-valued properties to be written as a
/// single value instead of a one-element array.
pub(crate) mod one_or_many {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        One(T),
        Many(Vec<T>),
    }

    pub(crate) fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        })
    }
}
