//! Text fields that accept any scalar
//!
//! Pipeline files are written by hand, so `version: 1.0`, `name: 123` and
//! `stages: [1, 2]` all name things. These helpers bind numbers and booleans
//! into `String` fields as their text instead of rejecting them.

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;

/// A string read from any scalar
struct ScalarText(String);

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScalarTextVisitor;

        impl<'de> Visitor<'de> for ScalarTextVisitor {
            type Value = ScalarText;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, number or boolean")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ScalarText(v.to_string()))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ScalarText(v))
            }

            fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ScalarText(v.to_string()))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ScalarText(v.to_string()))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ScalarText(v.to_string()))
            }

            // Debug keeps the fraction: 1.0 stays "1.0"
            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ScalarText(format!("{:?}", v)))
            }
        }

        deserializer.deserialize_any(ScalarTextVisitor)
    }
}

/// Required text field
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    ScalarText::deserialize(deserializer).map(|text| text.0)
}

/// Optional text field; `null` is `None`
pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<ScalarText>::deserialize(deserializer).map(|text| text.map(|t| t.0))
}

/// List of text items
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<ScalarText>::deserialize(deserializer)
        .map(|items| items.into_iter().map(|text| text.0).collect())
}
