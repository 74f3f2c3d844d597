//! Client → enclave messages.

use std::fmt;
use zeroize::Zeroize;

/// Outer request envelope as it travels over the wire.
///
/// The enclave hashes the exact bytes of this message to bind its response
/// to this particular request instance.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ChaincodeRequestMessage {
    /// AEAD ciphertext of a [`CleartextChaincodeRequest`]
    #[prost(bytes = "vec", tag = "1")]
    pub encrypted_request: Vec<u8>,
    /// ECIES ciphertext of a [`KeyTransportMessage`]
    #[prost(bytes = "vec", tag = "2")]
    pub encrypted_key_transport_message: Vec<u8>,
}

/// Per-call symmetric keys chosen by the client.
///
/// Never logged and wiped on drop.
#[derive(Clone, PartialEq, prost::Message)]
#[prost(skip_debug)]
pub struct KeyTransportMessage {
    #[prost(bytes = "vec", tag = "1")]
    pub request_encryption_key: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub response_encryption_key: Vec<u8>,
}

impl fmt::Debug for KeyTransportMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyTransportMessage")
            .field("request_encryption_key", &"<redacted>")
            .field("response_encryption_key", &"<redacted>")
            .finish()
    }
}

impl Drop for KeyTransportMessage {
    fn drop(&mut self) {
        self.request_encryption_key.zeroize();
        self.response_encryption_key.zeroize();
    }
}

/// Decrypted request body.
#[derive(Clone, PartialEq, prost::Message)]
pub struct CleartextChaincodeRequest {
    #[prost(message, optional, tag = "1")]
    pub input: Option<ChaincodeInput>,
}

impl CleartextChaincodeRequest {
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Self {
            input: Some(ChaincodeInput {
                args: args.into_iter().map(|a| a.as_ref().to_vec()).collect(),
            }),
        }
    }
}

/// Function name followed by its parameters.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ChaincodeInput {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub args: Vec<Vec<u8>>,
}
