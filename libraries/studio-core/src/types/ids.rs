/// ID types for catalog records
///
/// The hosted tables may use integer or UUID primary keys, so identifiers
/// are carried as opaque strings and accept either JSON form.
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from its string form
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the inner string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }
    };
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Int(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

record_id!(
    /// Genre identifier
    GenreId
);

record_id!(
    /// Track identifier
    TrackId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numeric_and_string_ids() {
        let numeric: GenreId = serde_json::from_str("42").unwrap();
        assert_eq!(numeric.as_str(), "42");

        let uuid: TrackId =
            serde_json::from_str("\"0b8e5c1e-2a34-4b7e-9a55-0f6c2f3d9a10\"").unwrap();
        assert_eq!(uuid.to_string(), "0b8e5c1e-2a34-4b7e-9a55-0f6c2f3d9a10");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = GenreId::from(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }
}
