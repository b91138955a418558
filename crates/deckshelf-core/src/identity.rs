//! Stable shortcut identifiers.
//!
//! The id is a CRC-32 (IEEE) over `executable || name` with the high bit
//! forced on, which is the same convention the game client applies to the
//! shortcuts it creates itself. The numeric value is the client's `appid`;
//! its decimal string form is the catalog id. Two shortcuts with the same
//! executable and name share an id, which is what de-duplicates them.

/// Generate the 32-bit shortcut id for an executable and display name.
pub fn generate_id(executable: &str, name: &str) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(executable.as_bytes());
    hasher.update(name.as_bytes());
    hasher.finalize() | 0x8000_0000
}

/// Catalog id string for an executable and display name.
pub fn generate_id_string(executable: &str, name: &str) -> String {
    format_id(generate_id(executable, name))
}

/// Decimal string form of a numeric id.
pub fn format_id(id: u32) -> String {
    id.to_string()
}

/// Parse a catalog id back to its numeric form.
///
/// Returns `None` for empty or non-numeric ids.
pub fn parse_id(id: &str) -> Option<u32> {
    id.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_stable() {
        let first = generate_id("/bin/test", "Test");
        let second = generate_id("/bin/test", "Test");
        assert_eq!(first, second);
    }

    #[test]
    fn test_id_matches_crc_of_concatenation() {
        let expected = crc32fast::hash(b"/bin/testTest") | 0x8000_0000;
        assert_eq!(generate_id("/bin/test", "Test"), expected);
    }

    #[test]
    fn test_high_bit_always_set() {
        for (exe, name) in [("", ""), ("a", "b"), ("/usr/bin/retroarch", "RetroArch")] {
            assert_ne!(generate_id(exe, name) & 0x8000_0000, 0);
        }
    }

    #[test]
    fn test_inputs_change_id() {
        let base = generate_id("/bin/test", "Test");
        assert_ne!(base, generate_id("/bin/test", "Test 2"));
        assert_ne!(base, generate_id("/bin/other", "Test"));
    }

    #[test]
    fn test_known_value() {
        // CRC-32/IEEE check value for "123456789" is 0xCBF43926
        assert_eq!(generate_id("12345", "6789"), 0xCBF4_3926);
    }

    #[test]
    fn test_string_roundtrip() {
        let id = generate_id_string("/bin/test", "Test");
        assert_eq!(parse_id(&id), Some(generate_id("/bin/test", "Test")));
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("abc"), None);
    }
}
