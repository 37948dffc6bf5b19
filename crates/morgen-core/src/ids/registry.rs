//! Bidirectional registry mapping real identifiers to virtual identifiers

use std::collections::HashMap;
use std::sync::Mutex;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use sha2::{Digest, Sha256};
use tracing::trace;

use super::error::{IdError, IdResult};

/// Length of a virtual identifier in characters.
const VIRTUAL_ID_LEN: usize = 7;

/// Digest bytes kept before encoding (48 bits of the hash).
const DIGEST_PREFIX_LEN: usize = 6;

#[derive(Default)]
struct Maps {
    real_to_virtual: HashMap<String, String>,
    virtual_to_real: HashMap<String, String>,
}

/// Process-wide bidirectional map between real and virtual identifiers.
///
/// Entries are created only by [`register`](Self::register), which the
/// listing tools call while formatting responses. Nothing is persisted:
/// a restart invalidates every virtual identifier a caller may still
/// hold, and `resolve` tells them to re-list.
///
/// Both maps sit behind one mutex so the check-then-insert in `register`
/// is atomic.
pub struct VirtualIdRegistry {
    maps: Mutex<Maps>,
}

impl VirtualIdRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            maps: Mutex::new(Maps::default()),
        }
    }

    /// Register a real identifier and return its virtual identifier
    ///
    /// Idempotent: re-registering an already known identifier returns the
    /// existing virtual identifier without re-deriving or overwriting.
    pub fn register(&self, real_id: &str) -> String {
        let mut maps = self.maps.lock().unwrap();
        if let Some(existing) = maps.real_to_virtual.get(real_id) {
            return existing.clone();
        }

        let virtual_id = derive_virtual_id(real_id);
        trace!(virtual_id = %virtual_id, "registered new virtual ID");
        maps.real_to_virtual
            .insert(real_id.to_string(), virtual_id.clone());
        maps.virtual_to_real
            .insert(virtual_id.clone(), real_id.to_string());
        virtual_id
    }

    /// Resolve a virtual identifier back to the real identifier
    ///
    /// # Errors
    /// Returns [`IdError::NotFound`] if the identifier was never
    /// registered in this process. The error message tells the caller to
    /// re-run a listing tool, which is the only way entries are created.
    pub fn resolve(&self, virtual_id: &str) -> IdResult<String> {
        let maps = self.maps.lock().unwrap();
        maps.virtual_to_real
            .get(virtual_id)
            .cloned()
            .ok_or_else(|| IdError::NotFound {
                virtual_id: virtual_id.to_string(),
            })
    }

    /// Resolve a sequence of virtual identifiers, preserving order
    ///
    /// Fails on the first unknown identifier with no partial result.
    pub fn resolve_many<I, S>(&self, virtual_ids: I) -> IdResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        virtual_ids
            .into_iter()
            .map(|id| self.resolve(id.as_ref()))
            .collect()
    }

    /// Remove every mapping (test isolation)
    pub fn clear(&self) {
        let mut maps = self.maps.lock().unwrap();
        maps.real_to_virtual.clear();
        maps.virtual_to_real.clear();
    }

    /// Number of registered identifier pairs
    pub fn len(&self) -> usize {
        self.maps.lock().unwrap().real_to_virtual.len()
    }

    /// Check whether the registry holds no mappings
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VirtualIdRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a virtual identifier from a real identifier.
///
/// SHA-256 over the UTF-8 bytes, keep the first 6 digest bytes, URL-safe
/// base64 without padding, truncate to 7 characters. Deterministic within
/// a process; stability across processes is not promised. A hash collision
/// between two live identifiers shadows the earlier mapping.
fn derive_virtual_id(real_id: &str) -> String {
    let digest = Sha256::digest(real_id.as_bytes());
    let mut encoded = URL_SAFE_NO_PAD.encode(&digest[..DIGEST_PREFIX_LEN]);
    encoded.truncate(VIRTUAL_ID_LEN);
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_returns_seven_chars() {
        let registry = VirtualIdRegistry::new();
        for real in ["a", "6954a6179c9d703795f281ce", "WyJhIiwiYiJd", "日本語ID"] {
            let virtual_id = registry.register(real);
            assert_eq!(virtual_id.chars().count(), 7, "for input {:?}", real);
        }
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry = VirtualIdRegistry::new();
        let first = registry.register("6954a6179c9d703795f281ce");
        let second = registry.register("6954a6179c9d703795f281ce");
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_then_resolve_round_trips() {
        let registry = VirtualIdRegistry::new();
        let virtual_id = registry.register("account-123");
        assert_eq!(registry.resolve(&virtual_id).unwrap(), "account-123");
    }

    #[test]
    fn test_resolve_unknown_id_fails() {
        let registry = VirtualIdRegistry::new();
        let err = registry.resolve("unknown").unwrap_err();
        match &err {
            IdError::NotFound { virtual_id } => assert_eq!(virtual_id, "unknown"),
            other => panic!("unexpected error: {:?}", other),
        }
        // The message must point the caller at the listing tools.
        let msg = err.to_string();
        assert!(msg.contains("ID 'unknown' not found"));
        assert!(msg.contains("list_accounts"));
        assert!(msg.contains("list_calendars"));
        assert!(msg.contains("list_events"));
    }

    #[test]
    fn test_derivation_is_deterministic_across_instances() {
        let a = VirtualIdRegistry::new();
        let b = VirtualIdRegistry::new();
        assert_eq!(
            a.register("6954a6179c9d703795f281ce"),
            b.register("6954a6179c9d703795f281ce")
        );
    }

    #[test]
    fn test_distinct_ids_get_distinct_virtual_ids() {
        let registry = VirtualIdRegistry::new();
        let v1 = registry.register("6954a6179c9d703795f281ce");
        let v2 = registry.register("a@test.com");
        assert_ne!(v1, v2);
        assert_eq!(registry.resolve(&v1).unwrap(), "6954a6179c9d703795f281ce");
        assert_eq!(registry.resolve(&v2).unwrap(), "a@test.com");
    }

    #[test]
    fn test_resolve_many_preserves_order() {
        let registry = VirtualIdRegistry::new();
        let v1 = registry.register("real-1");
        let v2 = registry.register("real-2");
        let v3 = registry.register("real-3");

        let reals = registry.resolve_many([&v3, &v1, &v2]).unwrap();
        assert_eq!(reals, vec!["real-3", "real-1", "real-2"]);
    }

    #[test]
    fn test_resolve_many_fails_fast_on_unknown() {
        let registry = VirtualIdRegistry::new();
        let v1 = registry.register("real-1");

        let err = registry.resolve_many([v1.as_str(), "nope"]).unwrap_err();
        assert!(matches!(err, IdError::NotFound { virtual_id } if virtual_id == "nope"));
    }

    #[test]
    fn test_clear_invalidates_virtual_ids() {
        let registry = VirtualIdRegistry::new();
        let virtual_id = registry.register("real-1");
        assert!(registry.resolve(&virtual_id).is_ok());

        registry.clear();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.resolve(&virtual_id),
            Err(IdError::NotFound { .. })
        ));
    }

    #[test]
    fn test_virtual_ids_are_url_safe() {
        let registry = VirtualIdRegistry::new();
        let virtual_id = registry.register("some/real+id=with?chars");
        assert!(virtual_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_concurrent_registration_of_same_id() {
        use std::sync::Arc;

        let registry = Arc::new(VirtualIdRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.register("shared-real-id"))
            })
            .collect();

        let ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(registry.len(), 1);
    }
}
