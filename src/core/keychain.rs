//! Keychain storage for the Hugging Face token.
//!
//! Uses the system keychain (macOS Keychain, Linux Secret Service, Windows
//! Credential Manager) so the token never sits in shell history.

use crate::{Error, ErrorCode, Result};
use keyring::Entry;
use serde_json::Value;

const SERVICE_NAME: &str = "podscribe";

fn keyring_error(e: keyring::Error) -> Error {
    Error::new(
        ErrorCode::InternalUnexpected,
        format!("Keychain error: {}", e),
        Value::Null,
    )
}

/// Stores a named secret in the keychain.
pub fn store(name: &str, value: &str) -> Result<()> {
    let entry = Entry::new(SERVICE_NAME, name).map_err(keyring_error)?;
    entry.set_password(value).map_err(keyring_error)?;
    Ok(())
}

/// Retrieves a named secret from the keychain.
///
/// Returns `None` if the entry doesn't exist.
pub fn get(name: &str) -> Result<Option<String>> {
    let entry = Entry::new(SERVICE_NAME, name).map_err(keyring_error)?;

    match entry.get_password() {
        Ok(value) => Ok(Some(value)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(keyring_error(e)),
    }
}

/// Deletes a named secret from the keychain.
pub fn delete(name: &str) -> Result<()> {
    let entry = Entry::new(SERVICE_NAME, name).map_err(keyring_error)?;

    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
        Err(e) => Err(keyring_error(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: These tests require keychain access and may prompt for permissions
    // Run manually with: cargo test keychain -- --ignored

    #[test]
    #[ignore]
    fn test_store_and_get() {
        let name = "test_hf_token";
        let value = "hf_testvalue123";

        store(name, value).unwrap();
        let retrieved = get(name).unwrap();
        assert_eq!(retrieved, Some(value.to_string()));

        delete(name).unwrap();
        let after_delete = get(name).unwrap();
        assert_eq!(after_delete, None);
    }
}
