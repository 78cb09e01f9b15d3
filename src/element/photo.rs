use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::{ElementId, Placement};
use crate::geometry::CanvasPoint;

/// Compressed image bytes carried inside the entry payload.
///
/// Serializes as base64 text, the form the payload has always used; decoding
/// also accepts a raw byte array. Undecodable base64 degrades to empty bytes
/// so one bad blob cannot fail its record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhotoBytes(Vec<u8>);

impl PhotoBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for PhotoBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Serialize for PhotoBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for PhotoBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PhotoBytesVisitor)
    }
}

struct PhotoBytesVisitor;

impl<'de> Visitor<'de> for PhotoBytesVisitor {
    type Value = PhotoBytes;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a base64 string or a byte array")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(PhotoBytes(STANDARD.decode(value).unwrap_or_default()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
        }
        Ok(PhotoBytes(bytes))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoElement {
    #[serde(default = "Uuid::new_v4")]
    pub id: ElementId,
    #[serde(default)]
    pub data: PhotoBytes,
    #[serde(flatten)]
    pub placement: Placement,
}

impl PhotoElement {
    pub fn new(data: PhotoBytes, position: CanvasPoint) -> Self {
        Self {
            id: Uuid::new_v4(),
            data,
            placement: Placement::at(position),
        }
    }
}

/// Unscaled square edge a photo renders into before its transform applies.
pub const PHOTO_BASE_SIZE: f64 = 150.0;
