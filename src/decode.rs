//! Frame decoding: opaque engine payloads into canonical RGBA8 rasters.
//!
//! Decoding is pure and fully synchronous. A malformed payload never errors
//! upward; it either drops the frame (`None`) or yields a raster whose
//! unreachable region stays transparent black.

use crate::payload::{CanonicalFrame, PayloadKind, PixelPayload};

const RGBA_CHANNELS: usize = 4;

/// Decode one payload into a fresh raster, or `None` when the frame should
/// be dropped (zero dimensions, empty or undecodable byte source).
pub fn decode(payload: &PixelPayload) -> Option<CanonicalFrame> {
    if payload.width == 0 || payload.height == 0 {
        tracing::debug!(
            width = payload.width,
            height = payload.height,
            "dropping payload with empty dimensions"
        );
        return None;
    }
    let bytes = match payload.encoded.to_bytes() {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(%err, "dropping undecodable payload");
            return None;
        }
    };
    if bytes.is_empty() {
        tracing::debug!("dropping payload with no pixel bytes");
        return None;
    }

    let data = match payload.kind {
        PayloadKind::HighDynamicRange => {
            decode_hdr(&bytes, payload.width, payload.height, payload.row_stride)
        }
        PayloadKind::LowDynamicRange => {
            decode_ldr(&bytes, payload.width, payload.height, payload.row_stride)
        }
        PayloadKind::Other(ref kind) => {
            tracing::warn!(kind, "unknown payload kind, decoding as low dynamic range");
            decode_ldr(&bytes, payload.width, payload.height, payload.row_stride)
        }
    };

    Some(CanonicalFrame {
        width: payload.width,
        height: payload.height,
        data,
    })
}

/// Pick the source row stride, in elements (bytes for LDR, floats for HDR).
///
/// The declared stride is heuristic: observed payloads declare it in
/// elements, in pixels, or uselessly. Candidates are tried in a fixed
/// priority order and the first plausible one wins:
///
/// 1. `declared == total / height` (stride declared in elements)
/// 2. `declared * 4 == total / height` (stride declared in pixels)
/// 3. `width * 4` (assume tight packing)
fn infer_row_stride(declared: u32, width: u32, height: u32, total_elems: usize) -> usize {
    let tight = width as usize * RGBA_CHANNELS;
    let declared = declared as usize;
    if declared != 0 && total_elems % height as usize == 0 {
        let per_row = total_elems / height as usize;
        if declared == per_row {
            return declared;
        }
        if declared * RGBA_CHANNELS == per_row {
            return declared * RGBA_CHANNELS;
        }
    }
    tight
}

fn decode_ldr(bytes: &[u8], width: u32, height: u32, declared_stride: u32) -> Vec<u8> {
    let row_len = width as usize * RGBA_CHANNELS;
    let tight_len = row_len * height as usize;
    if bytes.len() == tight_len {
        return bytes.to_vec();
    }

    let stride = infer_row_stride(declared_stride, width, height, bytes.len());
    let mut data = vec![0u8; tight_len];
    for row in 0..height as usize {
        let src_start = row * stride;
        if src_start >= bytes.len() {
            break;
        }
        let avail = row_len.min(bytes.len() - src_start);
        data[row * row_len..row * row_len + avail]
            .copy_from_slice(&bytes[src_start..src_start + avail]);
    }
    data
}

fn decode_hdr(bytes: &[u8], width: u32, height: u32, declared_stride: u32) -> Vec<u8> {
    // Reinterpret the byte buffer as packed f32 components. The transport
    // buffer has no alignment guarantee, so copy into an f32-aligned buffer
    // instead of casting in place.
    let total_floats = bytes.len() / size_of::<f32>();
    let mut floats = vec![0f32; total_floats];
    bytemuck::cast_slice_mut::<f32, u8>(&mut floats)
        .copy_from_slice(&bytes[..total_floats * size_of::<f32>()]);

    let stride = infer_row_stride(declared_stride, width, height, total_floats);
    let row_len = width as usize * RGBA_CHANNELS;
    let mut data = vec![0u8; row_len * height as usize];
    for row in 0..height as usize {
        let src_start = row * stride;
        if src_start >= floats.len() {
            break;
        }
        let avail = row_len.min(floats.len() - src_start);
        for (i, &value) in floats[src_start..src_start + avail].iter().enumerate() {
            data[row * row_len + i] = tone_map(value);
        }
    }
    data
}

/// Linear exposure at unit scale. Deliberately not filmic; tone-mapping
/// quality is out of scope for this bridge.
fn tone_map(value: f32) -> u8 {
    (value * 255.0).clamp(0.0, 255.0).round() as u8
}
