//! Deterministic node identifiers.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the SHA-256 digest.
///
/// 16 hex characters is 64 bits: short enough to read in a snapshot, with a
/// birthday-bound collision risk that is negligible at corpus scale but not zero.
pub const ID_HEX_LEN: usize = 16;

/// Derive a node id from its type and name.
///
/// The id depends only on the lower-cased `"{type}:{name}"` string, so the
/// same pair always yields the same id and the type keeps ids of different
/// node kinds apart.
pub fn generate_id(node_type: &str, name: &str) -> String {
    let content = format!("{node_type}:{name}").to_lowercase();
    let digest = Sha256::digest(content.as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(ID_HEX_LEN);
    id
}

/// Full SHA-256 hex digest of a document's extracted text.
pub fn content_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_id_is_deterministic() {
        assert_eq!(generate_id("concept", "graphmert"), generate_id("concept", "graphmert"));
        assert_eq!(generate_id("concept", "graphmert").len(), ID_HEX_LEN);
    }

    #[test]
    fn test_id_is_case_insensitive() {
        assert_eq!(generate_id("Concept", "GraphMERT"), generate_id("concept", "graphmert"));
    }

    #[test]
    fn test_type_separates_ids() {
        assert_ne!(generate_id("concept", "convex"), generate_id("document", "convex"));
        assert_ne!(generate_id("concept", "convex"), generate_id("concept", "blockchain"));
    }

    #[test]
    fn test_id_matches_sha256_prefix() {
        // sha256("anchor:ems_ethics") truncated
        let full = hex::encode(Sha256::digest(b"anchor:ems_ethics"));
        assert_eq!(generate_id("anchor", "ems_ethics"), &full[..ID_HEX_LEN]);
    }

    #[test]
    fn test_content_hash_is_full_digest() {
        assert_eq!(content_hash("GraphMERT is used").len(), 64);
        assert_ne!(content_hash("a"), content_hash("b"));
    }
}
