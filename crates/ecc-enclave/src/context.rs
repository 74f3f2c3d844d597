//! Invocation context handed to business logic.
//!
//! The context owns the decoded arguments and records every ledger access
//! made through it. Reads are served by a [`StateShim`] supplied by the
//! host; writes are buffered and never reach the shim. The recorded
//! accesses become the read/write set of the signed response.

use ecc_keys::MessageHash;
use ecc_types::{FpcKvSet, KvRead, KvRwSet, KvWrite};
use tracing::trace;

const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';
const COMPOSITE_KEY_SEPARATOR: char = '\u{0}';

/// Read access to committed world state.
pub trait StateShim: Send + Sync {
    fn get_state(&self, key: &str) -> Option<Vec<u8>>;
}

/// World state with nothing in it.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyState;

impl StateShim for EmptyState {
    fn get_state(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }
}

/// One recorded read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRead {
    pub key: String,
    /// SHA-256 of the value observed (empty value when the key was absent)
    pub value_hash: MessageHash,
}

/// One recorded write. `None` marks a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateWrite {
    pub key: String,
    pub value: Option<Vec<u8>>,
}

/// Ordered reads and writes of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadWriteSet {
    reads: Vec<StateRead>,
    writes: Vec<StateWrite>,
}

impl ReadWriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_read(&mut self, key: &str, value: Option<&[u8]>) {
        self.reads.push(StateRead {
            key: key.to_string(),
            value_hash: MessageHash::digest(value.unwrap_or_default()),
        });
    }

    pub fn record_write(&mut self, key: &str, value: &[u8]) {
        self.writes.push(StateWrite {
            key: key.to_string(),
            value: Some(value.to_vec()),
        });
    }

    pub fn record_delete(&mut self, key: &str) {
        self.writes.push(StateWrite {
            key: key.to_string(),
            value: None,
        });
    }

    pub fn reads(&self) -> &[StateRead] {
        &self.reads
    }

    pub fn writes(&self) -> &[StateWrite] {
        &self.writes
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty() && self.writes.is_empty()
    }

    /// Latest buffered write to `key`, if any.
    pub fn pending_write(&self, key: &str) -> Option<&StateWrite> {
        self.writes.iter().rev().find(|w| w.key == key)
    }

    pub fn to_proto(&self) -> FpcKvSet {
        FpcKvSet {
            rw_set: Some(KvRwSet {
                reads: self
                    .reads
                    .iter()
                    .map(|r| KvRead { key: r.key.clone() })
                    .collect(),
                writes: self
                    .writes
                    .iter()
                    .map(|w| KvWrite {
                        key: w.key.clone(),
                        is_delete: w.value.is_none(),
                        value: w.value.clone().unwrap_or_default(),
                    })
                    .collect(),
            }),
            read_value_hashes: self.reads.iter().map(|r| r.value_hash.to_vec()).collect(),
        }
    }
}

/// Per-invocation view offered to business logic.
pub struct InvocationContext<'s> {
    args: Vec<String>,
    shim: &'s dyn StateShim,
    rwset: ReadWriteSet,
}

impl<'s> InvocationContext<'s> {
    pub fn new(args: Vec<String>, shim: &'s dyn StateShim) -> Self {
        Self {
            args,
            shim,
            rwset: ReadWriteSet::new(),
        }
    }

    /// All arguments, function name first.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn function(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }

    pub fn parameters(&self) -> &[String] {
        self.args.get(1..).unwrap_or_default()
    }

    /// Read committed state. The read and a hash of the observed value are
    /// recorded.
    pub fn get_state(&mut self, key: &str) -> Option<Vec<u8>> {
        let value = self.shim.get_state(key);
        self.rwset.record_read(key, value.as_deref());
        trace!(key, found = value.is_some(), "get_state");
        value
    }

    /// Buffer a write.
    pub fn put_state(&mut self, key: &str, value: &[u8]) {
        trace!(key, len = value.len(), "put_state");
        self.rwset.record_write(key, value);
    }

    /// Buffer a delete.
    pub fn del_state(&mut self, key: &str) {
        trace!(key, "del_state");
        self.rwset.record_delete(key);
    }

    /// Build a composite key as `\0type\0attr1\0attr2\0...`.
    pub fn create_composite_key<S: AsRef<str>>(&self, object_type: &str, attributes: &[S]) -> String {
        create_composite_key(object_type, attributes)
    }

    pub fn read_write_set(&self) -> &ReadWriteSet {
        &self.rwset
    }

    pub fn into_read_write_set(self) -> ReadWriteSet {
        self.rwset
    }
}

impl std::fmt::Debug for InvocationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationContext")
            .field("function", &self.function())
            .field("parameters", &self.parameters().len())
            .field("reads", &self.rwset.reads.len())
            .field("writes", &self.rwset.writes.len())
            .finish()
    }
}

pub fn create_composite_key<S: AsRef<str>>(object_type: &str, attributes: &[S]) -> String {
    let mut key = String::with_capacity(
        2 + object_type.len() + attributes.iter().map(|a| a.as_ref().len() + 1).sum::<usize>(),
    );
    key.push(COMPOSITE_KEY_NAMESPACE);
    key.push_str(object_type);
    key.push(COMPOSITE_KEY_SEPARATOR);
    for attribute in attributes {
        key.push_str(attribute.as_ref());
        key.push(COMPOSITE_KEY_SEPARATOR);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FixedState(HashMap<String, Vec<u8>>);

    impl StateShim for FixedState {
        fn get_state(&self, key: &str) -> Option<Vec<u8>> {
            self.0.get(key).cloned()
        }
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_function_and_parameters() {
        let ctx = InvocationContext::new(args(&["transfer", "alice", "bob", "10"]), &EmptyState);

        assert_eq!(ctx.function(), "transfer");
        assert_eq!(ctx.parameters(), &["alice", "bob", "10"]);
        assert_eq!(ctx.args().len(), 4);
    }

    #[test]
    fn test_no_parameters() {
        let ctx = InvocationContext::new(args(&["init"]), &EmptyState);
        assert!(ctx.parameters().is_empty());
    }

    #[test]
    fn test_reads_recorded_with_hashes() {
        let mut state = HashMap::new();
        state.insert("alice".to_string(), b"100".to_vec());
        let shim = FixedState(state);
        let mut ctx = InvocationContext::new(args(&["get", "alice"]), &shim);

        assert_eq!(ctx.get_state("alice"), Some(b"100".to_vec()));
        assert_eq!(ctx.get_state("carol"), None);

        let rwset = ctx.into_read_write_set();
        assert_eq!(rwset.reads().len(), 2);
        assert_eq!(rwset.reads()[0].value_hash, MessageHash::digest(b"100"));
        assert_eq!(rwset.reads()[1].value_hash, MessageHash::digest(b""));
    }

    #[test]
    fn test_writes_buffered_not_visible_to_shim() {
        let shim = FixedState(HashMap::new());
        let mut ctx = InvocationContext::new(args(&["put", "k", "v"]), &shim);

        ctx.put_state("k", b"v");
        assert_eq!(ctx.get_state("k"), None);
        ctx.del_state("k");

        let rwset = ctx.read_write_set();
        assert_eq!(rwset.writes().len(), 2);
        assert_eq!(rwset.pending_write("k").unwrap().value, None);
    }

    #[test]
    fn test_to_proto_preserves_order() {
        let mut rwset = ReadWriteSet::new();
        rwset.record_read("a", Some(b"1"));
        rwset.record_read("b", None);
        rwset.record_write("c", b"3");
        rwset.record_delete("a");

        let proto = rwset.to_proto();
        let reads: Vec<_> = proto.reads().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(reads, vec!["a", "b"]);
        assert_eq!(proto.read_value_hashes.len(), 2);
        assert_eq!(proto.writes()[0].value, b"3");
        assert!(!proto.writes()[0].is_delete);
        assert!(proto.writes()[1].is_delete);
        assert!(proto.writes()[1].value.is_empty());
    }

    #[test]
    fn test_composite_key() {
        assert_eq!(
            create_composite_key("balance", &["alice"]),
            "\u{0}balance\u{0}alice\u{0}"
        );
        assert_eq!(
            create_composite_key("pair", &["a", "b"]),
            "\u{0}pair\u{0}a\u{0}b\u{0}"
        );
        assert_eq!(create_composite_key::<&str>("marker", &[]), "\u{0}marker\u{0}");
    }
}
