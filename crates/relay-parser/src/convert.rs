//! Binds a loose value into a typed model.
//!
//! Works like `serde_yaml::from_value`, but walks the value itself so that a
//! failure can be attributed to the field path being converted when it
//! happened. Missing-field errors have no node of their own and land on the
//! mapping that lacks the field.

use crate::location::{index_path, key_path};
use serde::de::{self, DeserializeOwned, DeserializeSeed, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use serde::forward_to_deserialize_any;
use serde_yaml::{Number, Value as YamlValue};
use std::cell::RefCell;

/// A failed conversion
#[derive(Debug)]
pub(crate) struct ConversionError {
    pub error: serde_yaml::Error,

    /// Path of the innermost node whose conversion failed
    pub path: Option<String>,
}

pub(crate) fn from_loose<T: DeserializeOwned>(value: &YamlValue) -> Result<T, ConversionError> {
    let failed = RefCell::new(None);
    let result = T::deserialize(NodeDeserializer {
        value,
        path: String::new(),
        failed: &failed,
    });

    result.map_err(|error| ConversionError {
        error,
        path: failed.into_inner(),
    })
}

struct NodeDeserializer<'a> {
    value: &'a YamlValue,
    path: String,
    failed: &'a RefCell<Option<String>>,
}

impl<'a> NodeDeserializer<'a> {
    /// Remember this node as the failure site unless a deeper one already is
    fn track<T>(&self, result: Result<T, serde_yaml::Error>) -> Result<T, serde_yaml::Error> {
        if result.is_err() {
            let mut failed = self.failed.borrow_mut();
            if failed.is_none() {
                *failed = Some(self.path.clone());
            }
        }
        result
    }
}

impl<'de, 'a> de::Deserializer<'de> for NodeDeserializer<'a> {
    type Error = serde_yaml::Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let result = match self.value {
            YamlValue::Null => visitor.visit_unit(),
            YamlValue::Bool(b) => visitor.visit_bool(*b),
            YamlValue::Number(n) => visit_number(n, visitor),
            YamlValue::String(s) => visitor.visit_str(s),
            YamlValue::Sequence(items) => visitor.visit_seq(Items {
                iter: items.iter().enumerate(),
                parent: self.path.clone(),
                failed: self.failed,
            }),
            YamlValue::Mapping(mapping) => visitor.visit_map(Entries {
                iter: mapping.iter(),
                parent: self.path.clone(),
                pending: None,
                failed: self.failed,
            }),
            YamlValue::Tagged(tagged) => NodeDeserializer {
                value: &tagged.value,
                path: self.path.clone(),
                failed: self.failed,
            }
            .deserialize_any(visitor),
        };
        self.track(result)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            YamlValue::Null => {
                let result = visitor.visit_none();
                self.track(result)
            }
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let result = match self.value {
            YamlValue::String(s) => {
                let access: de::value::StrDeserializer<'_, serde_yaml::Error> =
                    s.as_str().into_deserializer();
                visitor.visit_enum(access)
            }
            other => de::Deserializer::deserialize_enum(other.clone(), name, variants, visitor),
        };
        self.track(result)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier
    }
}

fn visit_number<'de, V>(n: &Number, visitor: V) -> Result<V::Value, serde_yaml::Error>
where
    V: Visitor<'de>,
{
    if let Some(u) = n.as_u64() {
        visitor.visit_u64(u)
    } else if let Some(i) = n.as_i64() {
        visitor.visit_i64(i)
    } else if let Some(f) = n.as_f64() {
        visitor.visit_f64(f)
    } else {
        Err(de::Error::custom(format!("unsupported number {}", n)))
    }
}

struct Items<'a> {
    iter: std::iter::Enumerate<std::slice::Iter<'a, YamlValue>>,
    parent: String,
    failed: &'a RefCell<Option<String>>,
}

impl<'de, 'a> SeqAccess<'de> for Items<'a> {
    type Error = serde_yaml::Error;

    fn next_element_seed<S>(&mut self, seed: S) -> Result<Option<S::Value>, Self::Error>
    where
        S: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((i, value)) => seed
                .deserialize(NodeDeserializer {
                    value,
                    path: index_path(&self.parent, i),
                    failed: self.failed,
                })
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct Entries<'a> {
    iter: serde_yaml::mapping::Iter<'a>,
    parent: String,
    /// Value of the key just handed out, and its path
    pending: Option<(&'a YamlValue, String)>,
    failed: &'a RefCell<Option<String>>,
}

impl<'de, 'a> MapAccess<'de> for Entries<'a> {
    type Error = serde_yaml::Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.iter.next() else {
            return Ok(None);
        };
        self.pending = Some((value, key_path(&self.parent, &key_text(key))));

        // Keys are located with their mapping
        seed.deserialize(NodeDeserializer {
            value: key,
            path: self.parent.clone(),
            failed: self.failed,
        })
        .map(Some)
    }

    fn next_value_seed<S>(&mut self, seed: S) -> Result<S::Value, Self::Error>
    where
        S: DeserializeSeed<'de>,
    {
        let (value, path) = self
            .pending
            .take()
            .ok_or_else(|| <Self::Error as de::Error>::custom("mapping value requested before its key"))?;

        seed.deserialize(NodeDeserializer {
            value,
            path,
            failed: self.failed,
        })
    }
}

fn key_text(key: &YamlValue) -> String {
    match key {
        YamlValue::String(s) => s.clone(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
