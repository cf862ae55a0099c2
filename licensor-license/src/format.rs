//! User-facing license key strings.
//!
//! A key is a dash-separated list of segments:
//!
//! ```text
//! LK2-XXXXXXXX-XXXXXXXX- … -XXXXXXXX-CCCCCCCC
//! └┬┘ └────────── 28 body segments ────────┘ └──┬───┘
//!  tag   payload ‖ signature ‖ zero padding      checksum
//! ```
//!
//! Every body and checksum segment holds 8 symbols, 5 bits each, so one
//! segment carries exactly 5 bytes. The body is zero-padded to a whole
//! number of segments and parsing rejects non-zero padding. The alphabet leaves out `0`, `1`, `O`
//! and `I`. The checksum is the first 5 bytes of SHA-256 over the tag and
//! body symbols, so a single typo is reported as a format error before any
//! signature check runs.

use licensor_crypto::{sha256, SIGNATURE_SIZE};
use thiserror::Error;

use crate::payload::PAYLOAD_SIZE;

/// Tag segment of the current key format. Tag digits come from the key
/// alphabet, so format generations start at 2.
pub const KEY_TAG: &str = "LK2";

/// Symbols used in key segments.
pub const ALPHABET: &[u8; 32] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Symbols per segment.
pub const SEGMENT_LEN: usize = 8;

/// Bytes carried by one segment.
const SEGMENT_BYTES: usize = 5;

/// Payload and signature bytes carried by the body.
const BODY_BYTES: usize = PAYLOAD_SIZE + SIGNATURE_SIZE;

/// Number of body segments.
pub const BODY_SEGMENTS: usize = BODY_BYTES.div_ceil(SEGMENT_BYTES);

/// Body size including the zero padding of the last segment.
const PADDED_BODY_BYTES: usize = BODY_SEGMENTS * SEGMENT_BYTES;

/// Total number of dash-separated segments, tag and checksum included.
pub const SEGMENT_COUNT: usize = BODY_SEGMENTS + 2;

const INVALID: u8 = 0xFF;

const DECODE_TABLE: [u8; 128] = {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Reasons a string is not a well-formed license key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Tag segment is missing or names an unknown format.
    #[error("unknown key format tag")]
    UnknownTag,

    /// Wrong number of dash-separated segments.
    #[error("expected {expected} segments, found {found}")]
    SegmentCount { expected: usize, found: usize },

    /// A segment does not have exactly [`SEGMENT_LEN`] symbols.
    #[error("segment {index} has the wrong length")]
    SegmentLength { index: usize },

    /// A character outside the key alphabet.
    #[error("invalid character {character:?} in segment {index}")]
    InvalidCharacter { index: usize, character: char },

    /// Checksum segment does not match the rest of the key.
    #[error("checksum mismatch")]
    ChecksumMismatch,

    /// Padding after the signature is not zero.
    #[error("non-zero body padding")]
    Padding,
}

/// Payload and signature bytes recovered from a key string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKey {
    pub payload: [u8; PAYLOAD_SIZE],
    pub signature: [u8; SIGNATURE_SIZE],
}

/// Formats payload and signature bytes as a key string.
#[must_use]
pub fn format_key(payload: &[u8; PAYLOAD_SIZE], signature: &[u8; SIGNATURE_SIZE]) -> String {
    let mut body = Vec::with_capacity(PADDED_BODY_BYTES);
    body.extend_from_slice(payload);
    body.extend_from_slice(signature);
    body.resize(PADDED_BODY_BYTES, 0);

    let body_symbols: Vec<[u8; SEGMENT_LEN]> = body
        .chunks_exact(SEGMENT_BYTES)
        .map(encode_segment)
        .collect();
    let checksum = encode_segment(&checksum_bytes(&body_symbols));

    let mut out = String::with_capacity(KEY_TAG.len() + SEGMENT_COUNT * (SEGMENT_LEN + 1));
    out.push_str(KEY_TAG);
    for segment in body_symbols.iter().chain(std::iter::once(&checksum)) {
        out.push('-');
        out.extend(segment.iter().map(|b| char::from(*b)));
    }
    out
}

/// Parses a key string back into payload and signature bytes.
///
/// Surrounding whitespace is ignored and letters are upper-cased first.
/// Every input either yields a [`ParsedKey`] or a [`FormatError`].
pub fn parse_key(input: &str) -> Result<ParsedKey, FormatError> {
    let normalized = input.trim().to_ascii_uppercase();
    let segments: Vec<&str> = normalized.split('-').collect();

    if segments.first() != Some(&KEY_TAG) {
        return Err(FormatError::UnknownTag);
    }
    if segments.len() != SEGMENT_COUNT {
        return Err(FormatError::SegmentCount {
            expected: SEGMENT_COUNT,
            found: segments.len(),
        });
    }

    let mut symbols: Vec<[u8; SEGMENT_LEN]> = Vec::with_capacity(SEGMENT_COUNT - 1);
    for (index, segment) in segments.iter().enumerate().skip(1) {
        symbols.push(segment_symbols(index, segment)?);
    }

    let (checksum, body_symbols) = symbols
        .split_last()
        .ok_or(FormatError::SegmentCount {
            expected: SEGMENT_COUNT,
            found: segments.len(),
        })?;
    if encode_segment(&checksum_bytes(body_symbols)) != *checksum {
        return Err(FormatError::ChecksumMismatch);
    }

    let mut body = [0u8; PADDED_BODY_BYTES];
    for (chunk, segment) in body.chunks_exact_mut(SEGMENT_BYTES).zip(body_symbols) {
        chunk.copy_from_slice(&decode_segment(segment));
    }
    if body[BODY_BYTES..].iter().any(|b| *b != 0) {
        return Err(FormatError::Padding);
    }

    let mut payload = [0u8; PAYLOAD_SIZE];
    let mut signature = [0u8; SIGNATURE_SIZE];
    payload.copy_from_slice(&body[..PAYLOAD_SIZE]);
    signature.copy_from_slice(&body[PAYLOAD_SIZE..BODY_BYTES]);
    Ok(ParsedKey { payload, signature })
}

fn segment_symbols(index: usize, segment: &str) -> Result<[u8; SEGMENT_LEN], FormatError> {
    if segment.chars().count() != SEGMENT_LEN {
        return Err(FormatError::SegmentLength { index });
    }
    if let Some(character) = segment.chars().find(|c| symbol_value(*c).is_none()) {
        return Err(FormatError::InvalidCharacter { index, character });
    }
    let mut out = [0u8; SEGMENT_LEN];
    out.copy_from_slice(segment.as_bytes());
    Ok(out)
}

fn symbol_value(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    match DECODE_TABLE[c as usize] {
        INVALID => None,
        value => Some(value),
    }
}

fn checksum_bytes(body_symbols: &[[u8; SEGMENT_LEN]]) -> [u8; SEGMENT_BYTES] {
    let mut parts: Vec<&[u8]> = Vec::with_capacity(body_symbols.len() + 1);
    parts.push(KEY_TAG.as_bytes());
    parts.extend(body_symbols.iter().map(|s| s.as_slice()));
    let digest = sha256(&parts);

    let mut out = [0u8; SEGMENT_BYTES];
    out.copy_from_slice(&digest[..SEGMENT_BYTES]);
    out
}

fn encode_segment(bytes: &[u8]) -> [u8; SEGMENT_LEN] {
    let value = bytes
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    let mut out = [0u8; SEGMENT_LEN];
    for (i, symbol) in out.iter_mut().enumerate() {
        let shift = 5 * (SEGMENT_LEN - 1 - i);
        *symbol = ALPHABET[((value >> shift) & 0x1F) as usize];
    }
    out
}

/// Callers pass symbols already checked by `segment_symbols`.
fn decode_segment(symbols: &[u8; SEGMENT_LEN]) -> [u8; SEGMENT_BYTES] {
    let value = symbols.iter().fold(0u64, |acc, s| {
        (acc << 5) | u64::from(DECODE_TABLE[usize::from(*s & 0x7F)] & 0x1F)
    });
    let mut out = [0u8; SEGMENT_BYTES];
    for (i, byte) in out.iter_mut().enumerate() {
        let shift = 8 * (SEGMENT_BYTES - 1 - i);
        *byte = ((value >> shift) & 0xFF) as u8;
    }
    out
}
