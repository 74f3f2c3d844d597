//! Read/write set recorded while business logic runs.

/// Read/write set plus one value hash per read, in read order.
#[derive(Clone, PartialEq, prost::Message)]
pub struct FpcKvSet {
    #[prost(message, optional, tag = "1")]
    pub rw_set: Option<KvRwSet>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub read_value_hashes: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct KvRwSet {
    #[prost(message, repeated, tag = "1")]
    pub reads: Vec<KvRead>,
    // tag 2 carries range query info in the ledger schema and is unused here
    #[prost(message, repeated, tag = "3")]
    pub writes: Vec<KvWrite>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct KvRead {
    #[prost(string, tag = "1")]
    pub key: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct KvWrite {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(bool, tag = "2")]
    pub is_delete: bool,
    #[prost(bytes = "vec", tag = "3")]
    pub value: Vec<u8>,
}

impl FpcKvSet {
    pub fn reads(&self) -> &[KvRead] {
        self.rw_set.as_ref().map(|s| s.reads.as_slice()).unwrap_or(&[])
    }

    pub fn writes(&self) -> &[KvWrite] {
        self.rw_set.as_ref().map(|s| s.writes.as_slice()).unwrap_or(&[])
    }
}
