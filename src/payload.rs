use base64::Engine as _;

use crate::error::{ViewlinkError, ViewlinkResult};

/// Dynamic range of an arrived image, as declared by the engine.
///
/// The engine is free to grow new kinds; anything we do not recognize
/// deserializes into [`PayloadKind::Other`] and is decoded on the
/// low-dynamic-range path with a logged fallback.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayloadKind {
    LowDynamicRange,
    HighDynamicRange,
    #[serde(untagged)]
    Other(String),
}

/// Pixel bytes as they arrive over the transport: either raw binary or a
/// base64 text encoding of the same bytes. The two are distinguished by the
/// serde tag, never by sniffing content.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodedBytes {
    Binary(Vec<u8>),
    Base64(String),
}

impl EncodedBytes {
    /// Resolve to an owned byte buffer. Always copies, so the result never
    /// aliases the transport buffer; aliasing across frames previously caused
    /// visible corruption when a later write raced a pending paint.
    pub fn to_bytes(&self) -> ViewlinkResult<Vec<u8>> {
        match self {
            EncodedBytes::Binary(bytes) => Ok(bytes.clone()),
            EncodedBytes::Base64(text) => base64::engine::general_purpose::STANDARD
                .decode(text.as_bytes())
                .map_err(|err| ViewlinkError::payload(format!("invalid base64 image: {err}"))),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            EncodedBytes::Binary(bytes) => bytes.is_empty(),
            EncodedBytes::Base64(text) => text.is_empty(),
        }
    }
}

/// One arrived image. Immutable once constructed; moved by value from stage
/// to stage so exactly one component owns it at a time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelPayload {
    pub kind: PayloadKind,
    pub width: u32,
    pub height: u32,
    /// Row stride as declared by the engine. Observed payloads declare it in
    /// bytes, in pixels, or not meaningfully at all; the decoder infers which.
    pub row_stride: u32,
    /// For status display only.
    pub samples_accumulated: f32,
    pub encoded: EncodedBytes,
}

impl PixelPayload {
    pub fn new(kind: PayloadKind, width: u32, height: u32, encoded: EncodedBytes) -> Self {
        Self {
            kind,
            width,
            height,
            row_stride: 0,
            samples_accumulated: 0.0,
            encoded,
        }
    }
}

/// Inbound notification from the engine: zero or more payload records.
///
/// Only the first record is consumed; additional images (separate render
/// passes, perhaps) are observed in the wire shape but deliberately ignored.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageReadyNotification {
    pub images: Vec<PixelPayload>,
}

impl ImageReadyNotification {
    pub fn single(payload: PixelPayload) -> Self {
        Self {
            images: vec![payload],
        }
    }

    pub fn into_first(self) -> Option<PixelPayload> {
        self.images.into_iter().next()
    }
}

/// Decode output: a tightly packed `width x height x 4` RGBA8 raster.
///
/// Each decode produces a fresh allocation; frames are painted once and then
/// discarded, never cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl CanonicalFrame {
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}
