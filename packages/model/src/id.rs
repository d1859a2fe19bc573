//! Node id normalization.
//!
//! The platform addresses nodes as `12:34` (instances nest as `I12:34;56:78`).
//! Those ids are awkward in URLs and tool arguments, so everything crossing the
//! public boundary uses the dash form `12-34`.
//!
//! The conversions are plain character replacements, so a raw id that already
//! contains `-` (a UUID segment, say) does not survive dash -> colon. Lookups
//! therefore go through [`NodeId::matches`], which treats `:` and `-` as the
//! same separator and matches any raw id against its dash form losslessly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Convert a colon-delimited platform id into the external dash form.
pub fn to_external_id(internal: &str) -> String {
    internal.replace(':', "-")
}

/// Convert an external dash-delimited id into the platform's colon form.
pub fn to_internal_id(external: &str) -> String {
    external.replace('-', ":")
}

/// A node id carried in both encodings.
///
/// Constructed from the external form (what callers hand us) and compared
/// against raw-tree ids in the internal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct NodeId {
    internal: String,
}

impl NodeId {
    pub fn from_external(external: &str) -> Self {
        Self {
            internal: to_internal_id(external.trim()),
        }
    }

    pub fn from_internal(internal: &str) -> Self {
        Self {
            internal: internal.to_string(),
        }
    }

    pub fn internal(&self) -> &str {
        &self.internal
    }

    pub fn external(&self) -> String {
        to_external_id(&self.internal)
    }

    pub fn is_empty(&self) -> bool {
        self.internal.is_empty()
    }

    /// Match against a raw-tree id. A `:` here also matches a `-` in the raw
    /// id; every other character must be equal.
    pub fn matches(&self, raw_id: &str) -> bool {
        self.internal.len() == raw_id.len()
            && self
                .internal
                .bytes()
                .zip(raw_id.bytes())
                .all(|(ours, raw)| ours == raw || (ours == b':' && raw == b'-'))
    }
}

impl From<String> for NodeId {
    fn from(external: String) -> Self {
        Self::from_external(&external)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.external()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.external())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_ids_convert_both_ways() {
        assert_eq!(to_external_id("12:34"), "12-34");
        assert_eq!(to_internal_id("12-34"), "12:34");
    }

    #[test]
    fn test_instance_ids_round_trip() {
        let raw = "I5:120;7:3301;9:2";
        let external = to_external_id(raw);
        assert_eq!(external, "I5-120;7-3301;9-2");
        assert_eq!(to_internal_id(&external), raw);
    }

    #[test]
    fn test_generated_ids_round_trip_losslessly() {
        // Deterministic spread of large and nested ids
        let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let a = seed % 100_000;
            let b = (seed >> 20) % 1_000_000;
            let c = (seed >> 40) % 10_000;
            let raw = if seed % 3 == 0 {
                format!("I{}:{};{}:{}", a, b, c, a ^ c)
            } else {
                format!("{}:{}", a, b)
            };

            let id = NodeId::from_external(&to_external_id(&raw));
            assert!(id.matches(&raw), "{} did not survive the round trip", raw);
            assert_eq!(id.external(), to_external_id(&raw));
        }
    }

    #[test]
    fn test_uuid_bearing_ids_match_through_dash_form() {
        let raws = [
            "I12:34;0b5c7a0e-3f7d-4a8e-9c41-5d2b6e1f8a90",
            "f47ac10b-58cc-4372-a567-0e02b2c3d479:17",
            "I550e8400-e29b-41d4-a716-446655440000:1;2:3",
        ];
        for raw in raws {
            let id = NodeId::from_external(&to_external_id(raw));
            assert!(id.matches(raw), "{} did not survive the round trip", raw);
            assert_eq!(id.external(), to_external_id(raw));
        }
    }

    #[test]
    fn test_match_requires_equal_ids() {
        let id = NodeId::from_external("12-34");
        assert!(id.matches("12:34"));
        assert!(!id.matches("12:345"));
        assert!(!id.matches("12;34"));
        assert!(!NodeId::from_internal("1-2").matches("1:2"));
    }

    #[test]
    fn test_node_id_serializes_external_form() {
        let id = NodeId::from_internal("1:2");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1-2\"");

        let parsed: NodeId = serde_json::from_str("\"3-4\"").unwrap();
        assert_eq!(parsed.internal(), "3:4");
    }

    #[test]
    fn test_from_external_trims_whitespace() {
        let id = NodeId::from_external("  8-9 ");
        assert!(id.matches("8:9"));
    }
}
