//! Encoder for the binary key-value format.

use super::{
    Node, VdfMap, END_OF_STRING, MARKER_END_OF_MAP, MARKER_MAP, MARKER_NUMBER, MARKER_STRING,
};
use crate::{Result, ShelfError};

/// Encode a root map into bytes.
///
/// Entries are written in the map's insertion order. Keys or string values
/// containing a NUL byte cannot be represented and fail with a format error.
pub fn encode(document: &VdfMap) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_map(&mut buffer, document)?;
    Ok(buffer)
}

fn write_map(buffer: &mut Vec<u8>, map: &VdfMap) -> Result<()> {
    for (key, value) in map.iter() {
        match value {
            Node::Map(nested) => {
                buffer.push(MARKER_MAP);
                write_string(buffer, key)?;
                write_map(buffer, nested)?;
            }
            Node::String(text) => {
                buffer.push(MARKER_STRING);
                write_string(buffer, key)?;
                write_string(buffer, text)?;
            }
            Node::Number(number) => {
                buffer.push(MARKER_NUMBER);
                write_string(buffer, key)?;
                buffer.extend_from_slice(&number.to_le_bytes());
            }
        }
    }

    buffer.push(MARKER_END_OF_MAP);
    Ok(())
}

fn write_string(buffer: &mut Vec<u8>, value: &str) -> Result<()> {
    if let Some(index) = value.bytes().position(|b| b == END_OF_STRING) {
        return Err(ShelfError::format(
            format!("embedded NUL byte in {:?}", value),
            buffer.len() + index,
        ));
    }

    buffer.extend_from_slice(value.as_bytes());
    buffer.push(END_OF_STRING);
    Ok(())
}
