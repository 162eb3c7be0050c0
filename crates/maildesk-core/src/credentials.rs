//! API token storage in the system keyring.
//!
//! Uses the platform's native credential store:
//! - Linux: Secret Service (GNOME Keyring, `KWallet`)
//! - macOS: Keychain
//! - Windows: Credential Manager

use keyring::Entry;
use tracing::{debug, warn};

/// Service name used for keyring entries.
const SERVICE_NAME: &str = "maildesk";

/// Credential type identifier for the backend bearer token.
const API_TOKEN_CREDENTIAL: &str = "api_token";

/// Error type for credential operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Failed to access keyring.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// The token to store is blank.
    #[error("API token must not be empty")]
    EmptyToken,
}

/// Result type for credential operations.
pub type CredentialResult<T> = std::result::Result<T, CredentialError>;

/// Keyring entry key for a backend, so tokens for different servers do not
/// collide.
fn credential_key(base_url: &str) -> String {
    format!(
        "{SERVICE_NAME}_{API_TOKEN_CREDENTIAL}_{}",
        base_url.trim_end_matches('/')
    )
}

/// Stores the API token for a backend.
///
/// # Errors
///
/// Returns an error if the token is blank or the keyring operation fails.
pub fn store_api_token(base_url: &str, token: &str) -> CredentialResult<()> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CredentialError::EmptyToken);
    }
    let entry = Entry::new(SERVICE_NAME, &credential_key(base_url))?;
    entry.set_password(token)?;
    debug!("Stored API token for {base_url}");
    Ok(())
}

/// Retrieves the API token for a backend.
///
/// # Errors
///
/// Returns an error if the keyring operation fails.
pub fn get_api_token(base_url: &str) -> CredentialResult<Option<String>> {
    let entry = Entry::new(SERVICE_NAME, &credential_key(base_url))?;
    match entry.get_password() {
        Ok(token) => Ok(Some(token)),
        Err(keyring::Error::NoEntry) => {
            debug!("No API token found for {base_url}");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Deletes the API token for a backend.
///
/// # Errors
///
/// Returns an error if the keyring operation fails (except for missing entries).
pub fn delete_api_token(base_url: &str) -> CredentialResult<()> {
    let entry = Entry::new(SERVICE_NAME, &credential_key(base_url))?;
    match entry.delete_credential() {
        Ok(()) => {
            debug!("Deleted API token for {base_url}");
            Ok(())
        }
        Err(keyring::Error::NoEntry) => {
            debug!("No API token to delete for {base_url}");
            Ok(())
        }
        Err(e) => {
            warn!("Failed to delete API token: {e}");
            Err(e.into())
        }
    }
}
