//! Request decryption and argument extraction.

use crate::context::{InvocationContext, StateShim};
use crate::error::{EccError, EccResult};
use ecc_keys::SymmetricKey;
use ecc_types::CleartextChaincodeRequest;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Turns `encrypted_request` into an [`InvocationContext`].
pub struct RequestPipeline;

impl RequestPipeline {
    /// Decrypt, decode and validate the cleartext request.
    ///
    /// The decrypted bytes are wiped before this returns, on every path.
    pub fn open<'s>(
        encrypted_request: &[u8],
        request_key: &SymmetricKey,
        shim: &'s dyn StateShim,
    ) -> EccResult<InvocationContext<'s>> {
        let plaintext = Zeroizing::new(request_key.open(encrypted_request).map_err(|e| {
            warn!(error = %e, "Request decryption failed");
            EccError::RequestDecrypt
        })?);

        let request: CleartextChaincodeRequest = ecc_protocol::decode(&plaintext)
            .map_err(|e| EccError::RequestDecode(e.to_string()))?;

        let input = request.input.ok_or(EccError::EmptyArguments)?;
        if input.args.is_empty() {
            return Err(EccError::EmptyArguments);
        }

        let args = input
            .args
            .into_iter()
            .enumerate()
            .map(|(i, arg)| {
                String::from_utf8(arg)
                    .map_err(|_| EccError::RequestDecode(format!("argument {i} is not UTF-8")))
            })
            .collect::<EccResult<Vec<_>>>()?;

        debug!(function = %args[0], parameters = args.len() - 1, "Request opened");
        Ok(InvocationContext::new(args, shim))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EmptyState;
    use ecc_types::ChaincodeInput;

    fn seal(key: &SymmetricKey, request: &CleartextChaincodeRequest) -> Vec<u8> {
        key.seal(&ecc_protocol::encode(request).unwrap()).unwrap()
    }

    #[test]
    fn test_open_request() {
        let key = SymmetricKey::generate();
        let sealed = seal(&key, &CleartextChaincodeRequest::from_args(["get", "alice"]));

        let ctx = RequestPipeline::open(&sealed, &key, &EmptyState).unwrap();
        assert_eq!(ctx.function(), "get");
        assert_eq!(ctx.parameters(), &["alice"]);
    }

    #[test]
    fn test_wrong_key() {
        let sealed = seal(
            &SymmetricKey::generate(),
            &CleartextChaincodeRequest::from_args(["get"]),
        );

        let err = RequestPipeline::open(&sealed, &SymmetricKey::generate(), &EmptyState).unwrap_err();
        assert!(matches!(err, EccError::RequestDecrypt));
    }

    #[test]
    fn test_empty_arguments() {
        let key = SymmetricKey::generate();

        let no_input = seal(&key, &CleartextChaincodeRequest { input: None });
        assert!(matches!(
            RequestPipeline::open(&no_input, &key, &EmptyState),
            Err(EccError::EmptyArguments)
        ));

        let no_args = seal(
            &key,
            &CleartextChaincodeRequest {
                input: Some(ChaincodeInput { args: Vec::new() }),
            },
        );
        assert!(matches!(
            RequestPipeline::open(&no_args, &key, &EmptyState),
            Err(EccError::EmptyArguments)
        ));
    }

    #[test]
    fn test_non_utf8_argument() {
        let key = SymmetricKey::generate();
        let sealed = seal(
            &key,
            &CleartextChaincodeRequest {
                input: Some(ChaincodeInput {
                    args: vec![b"put".to_vec(), vec![0xff, 0xfe]],
                }),
            },
        );

        assert!(matches!(
            RequestPipeline::open(&sealed, &key, &EmptyState),
            Err(EccError::RequestDecode(_))
        ));
    }

    #[test]
    fn test_undecodable_plaintext() {
        let key = SymmetricKey::generate();
        let sealed = key.seal(&[0x0a, 0xff]).unwrap();

        assert!(matches!(
            RequestPipeline::open(&sealed, &key, &EmptyState),
            Err(EccError::RequestDecode(_))
        ));
    }
}
