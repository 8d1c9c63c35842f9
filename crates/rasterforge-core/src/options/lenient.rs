//! Field deserializers that never reject a value.
//!
//! Option trees come from form state, so a slider may arrive as `"2"`, a
//! cleared input as `null` and a checkbox as `1`. Each helper accepts whatever
//! JSON value it is handed and maps anything it cannot use to a neutral value:
//! `NaN` for floats (which [`super::RenderPlan::normalized`] and the geometry
//! planner replace with the field default), `None`, `false` or `""`.

use std::fmt;

use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Any JSON value, sorted by how it can be read.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Number(f64),
    Text(String),
    Other(#[allow(dead_code)] IgnoredAny),
}

impl Loose {
    fn number(self) -> Option<f64> {
        match self {
            Loose::Number(n) => Some(n),
            Loose::Text(s) => s.trim().parse().ok(),
            Loose::Bool(_) | Loose::Other(_) => None,
        }
    }
}

pub fn f64_or_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Loose::deserialize(deserializer)?.number().unwrap_or(f64::NAN))
}

pub fn f32_or_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    Ok(Loose::deserialize(deserializer)?
        .number()
        .map_or(f32::NAN, |n| n as f32))
}

pub fn opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Loose::deserialize(deserializer)?.number())
}

pub fn bool_or_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Bool(b) => b,
        Loose::Number(n) => n != 0.0,
        Loose::Text(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        Loose::Other(_) => false,
    })
}

pub fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(s) => s,
        Loose::Number(n) => n.to_string(),
        Loose::Bool(b) => b.to_string(),
        Loose::Other(_) => String::new(),
    })
}

/// The string payload of a value, if it has one. Used by enum fields.
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(s) => Some(s),
        _ => None,
    })
}

/// Byte buffers arrive as a typed array, a plain number array or not at all.
pub fn bytes_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    deserializer.deserialize_any(BytesVisitor)
}

struct BytesVisitor;

impl<'de> Visitor<'de> for BytesVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a byte buffer")
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(v.to_vec())
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element::<Loose>()? {
            out.push(value.number().map_or(0, |n| n.clamp(0.0, 255.0) as u8));
        }
        Ok(out)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Vec::new())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }
}
