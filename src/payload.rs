// Payload Codec
// Ordered list of bundled files, serialized as JSON with base64 bodies
//
// {"contents":[{"path":"hello.txt","body":"aGk="}]}

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One bundled file: the path it was read from and its raw content
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    #[serde(with = "base64_body")]
    pub body: Vec<u8>,
}

/// Ordered batch of files
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub contents: Vec<FileEntry>,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            body: body.into(),
        }
    }
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: FileEntry) {
        self.contents.push(entry);
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.contents.iter()
    }
}

impl FromIterator<FileEntry> for Payload {
    fn from_iter<I: IntoIterator<Item = FileEntry>>(iter: I) -> Self {
        Self {
            contents: iter.into_iter().collect(),
        }
    }
}

/// Serialize a payload to bytes
pub fn encode(payload: &Payload) -> Result<Vec<u8>> {
    serde_json::to_vec(payload).map_err(Error::EncodeFailed)
}

/// Deserialize a payload; paths are returned as stored, unvalidated
pub fn decode(bytes: &[u8]) -> Result<Payload> {
    serde_json::from_slice(bytes).map_err(Error::DecodeError)
}

mod base64_body {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(body))
    }

    // `null` is how an empty body is written by encoders that distinguish
    // nil from empty byte slices.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => STANDARD.decode(encoded.as_bytes()).map_err(de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Payload {
        Payload::from_iter([
            FileEntry::new("hello.txt", "hi"),
            FileEntry::new("bin/blob", vec![0u8, 0xff, 0x80, 0x0a]),
            FileEntry::new("empty", Vec::<u8>::new()),
        ])
    }

    #[test]
    fn roundtrip_preserves_order_and_bytes() {
        let payload = sample();
        let decoded = decode(&encode(&payload).unwrap()).unwrap();
        assert_eq!(decoded, payload);
        assert_eq!(decoded.contents[1].body, vec![0u8, 0xff, 0x80, 0x0a]);
    }

    #[test]
    fn wire_format_uses_base64_bodies() {
        let mut payload = Payload::new();
        payload.push(FileEntry::new("hello.txt", "hi"));
        let encoded = String::from_utf8(encode(&payload).unwrap()).unwrap();
        assert_eq!(encoded, r#"{"contents":[{"path":"hello.txt","body":"aGk="}]}"#);
    }

    #[test]
    fn null_body_decodes_as_empty() {
        let payload = decode(br#"{"contents":[{"path":"a","body":null}]}"#).unwrap();
        assert_eq!(payload.contents[0].body, Vec::<u8>::new());
    }

    #[test]
    fn empty_payload_roundtrips() {
        let payload = Payload::new();
        assert!(decode(&encode(&payload).unwrap()).unwrap().is_empty());
    }

    #[test]
    fn malformed_input_is_rejected() {
        let inputs: [&[u8]; 5] = [
            b"",
            b"\x00\x01\x02garbage",
            b"42",
            br#"{"contents":[{"path":"a","body":"not base64!"}]}"#,
            br#"{"contents":[{"body":"aGk="}]}"#,
        ];
        for input in inputs {
            assert!(matches!(decode(input), Err(Error::DecodeError(_))));
        }
    }

    #[test]
    fn paths_are_not_validated() {
        let payload = decode(br#"{"contents":[{"path":"../../etc/x","body":""}]}"#).unwrap();
        assert_eq!(payload.contents[0].path, "../../etc/x");
    }
}
