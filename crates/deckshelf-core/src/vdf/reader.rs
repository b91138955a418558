//! Decoder for the binary key-value format.

use super::{
    Node, VdfMap, END_OF_STRING, MARKER_END_OF_MAP, MARKER_MAP, MARKER_NUMBER, MARKER_STRING,
};
use crate::{Result, ShelfError};
use tracing::debug;

/// Decode a binary document into its root map.
///
/// Running out of input before the root map's terminator is a corruption
/// error, never a normal end of document.
pub fn decode(bytes: &[u8]) -> Result<VdfMap> {
    let first = *bytes
        .first()
        .ok_or_else(|| ShelfError::format("empty document", 0))?;

    if !matches!(
        first,
        MARKER_MAP | MARKER_STRING | MARKER_NUMBER | MARKER_END_OF_MAP
    ) {
        return Err(ShelfError::format(
            format!("unexpected leading byte 0x{:02x}", first),
            0,
        ));
    }

    let mut cursor = Cursor { data: bytes, pos: 0 };
    let root = cursor.read_map()?;

    if cursor.pos < bytes.len() {
        debug!(
            "Ignoring {} trailing bytes after document end",
            bytes.len() - cursor.pos
        );
    }

    Ok(root)
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn truncated(&self, what: &str) -> ShelfError {
        ShelfError::format(
            format!("reached end of input inside {}, data might be corrupted", what),
            self.pos,
        )
    }

    fn read_byte(&mut self, what: &str) -> Result<u8> {
        let byte = *self.data.get(self.pos).ok_or_else(|| self.truncated(what))?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_map(&mut self) -> Result<VdfMap> {
        let mut map = VdfMap::new();

        loop {
            let marker_pos = self.pos;
            let marker = self.read_byte("map")?;
            if marker == MARKER_END_OF_MAP {
                return Ok(map);
            }

            let key = self.read_string("key")?;
            let value = match marker {
                MARKER_MAP => Node::Map(self.read_map()?),
                MARKER_STRING => Node::String(self.read_string("string value")?),
                MARKER_NUMBER => Node::Number(self.read_number()?),
                other => {
                    return Err(ShelfError::format(
                        format!("unexpected type marker 0x{:02x}", other),
                        marker_pos,
                    ))
                }
            };

            map.insert(key, value);
        }
    }

    fn read_string(&mut self, what: &str) -> Result<String> {
        let data = self.data;
        let start = self.pos;
        let len = match data[start..].iter().position(|&b| b == END_OF_STRING) {
            Some(len) => len,
            None => {
                self.pos = data.len();
                return Err(self.truncated(what));
            }
        };

        let value = std::str::from_utf8(&data[start..start + len])
            .map_err(|e| ShelfError::format(format!("invalid UTF-8 in {}: {}", what, e), start))?
            .to_string();

        self.pos = start + len + 1;
        Ok(value)
    }

    fn read_number(&mut self) -> Result<u32> {
        let data = self.data;
        let end = self.pos + 4;
        let bytes: [u8; 4] = match data.get(self.pos..end) {
            Some(slice) => [slice[0], slice[1], slice[2], slice[3]],
            None => {
                self.pos = data.len();
                return Err(self.truncated("number"));
            }
        };

        self.pos = end;
        Ok(u32::from_le_bytes(bytes))
    }
}
