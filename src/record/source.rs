use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::record::{RawValue, RecastError, Result, normalize};

const MAX_DECOMPRESSED_BYTES: usize = 256 * 1024 * 1024;
/// zstd frame magic used by compressed payloads.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compression mode detected for a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Plain text payload.
	None,
	/// zstd-compressed payload.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}
}

/// Raw payload loaded from a file or stream, decoded to structure.
#[derive(Debug, Clone)]
pub struct Payload {
	/// Compression detected on the source bytes.
	pub compression: Compression,
	/// Normalized raw value.
	pub value: RawValue,
}

impl Payload {
	/// Read and normalize a payload file.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		Self::from_bytes(fs::read(path)?)
	}

	/// Read and normalize a payload from any reader, e.g. stdin.
	pub fn read(mut reader: impl Read) -> Result<Self> {
		let mut raw = Vec::new();
		reader.read_to_end(&mut raw)?;
		Self::from_bytes(raw)
	}

	/// Detect compression, decode text, and normalize.
	pub fn from_bytes(raw: Vec<u8>) -> Result<Self> {
		let (compression, bytes) = decode_bytes(raw)?;
		let text = String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
		let value = normalize(text)?;
		Ok(Self { compression, value })
	}
}

/// Detect and decode compression, returning `(mode, decoded_bytes)`.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	if raw.starts_with(&ZSTD_MAGIC) {
		let out = decode_zstd(&raw)?;
		return Ok((Compression::Zstd, out));
	}

	Ok((Compression::None, raw))
}

fn decode_zstd(raw: &[u8]) -> Result<Vec<u8>> {
	let mut decoder = zstd::stream::read::Decoder::new(raw)?;
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];

	loop {
		let read = decoder.read(&mut buf)?;
		if read == 0 {
			break;
		}

		if out.len() + read > MAX_DECOMPRESSED_BYTES {
			return Err(RecastError::DecompressedTooLarge { limit: MAX_DECOMPRESSED_BYTES });
		}

		out.extend_from_slice(&buf[..read]);
	}

	Ok(out)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::{Compression, Payload, decode_bytes};
	use crate::record::RecastError;

	#[test]
	fn plain_payload_is_passed_through() {
		let (mode, bytes) = decode_bytes(b"{\"a\":1}".to_vec()).expect("plain bytes decode");
		assert_eq!(mode, Compression::None);
		assert_eq!(bytes, b"{\"a\":1}");
	}

	#[test]
	fn zstd_payload_is_decompressed_and_normalized() {
		let raw = br#"{"name":"root","children":[]}"#;
		let compressed = zstd::stream::encode_all(&raw[..], 3).expect("zstd encodes");

		let payload = Payload::from_bytes(compressed).expect("payload decodes");
		assert_eq!(payload.compression, Compression::Zstd);
		assert_eq!(payload.value, json!({"name": "root", "children": []}));
	}

	#[test]
	fn invalid_utf8_payload_is_rejected() {
		let err = Payload::from_bytes(b"{\"name\":\"a\xFFb\"}".to_vec()).expect_err("invalid utf-8 fails");
		let RecastError::Io(err) = err else {
			panic!("expected io error, got {err:?}");
		};
		assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
	}

	#[test]
	fn reader_payload_reports_decode_errors() {
		let err = Payload::read(&b"{not json"[..]).expect_err("malformed payload fails");
		assert!(matches!(err, RecastError::Decode { .. }));
	}
}
