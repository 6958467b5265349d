//! OAuth2 authentication for the Gmail API

use google_gmail1::{hyper_rustls, hyper_util, yup_oauth2, Gmail};
use std::path::Path;

use crate::error::{MailError, Result};

/// Read-only scope; sent mail is only ever read
pub const READONLY_SCOPES: &[&str] = &["https://www.googleapis.com/auth/gmail.readonly"];

/// Type alias for Gmail Hub to simplify type signatures
pub type GmailHub =
    Gmail<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>>;

/// Initialize the Gmail API hub with OAuth2
///
/// Uses the installed-app flow (a browser opens on first run) and persists
/// tokens to `token_cache_path`, so later runs refresh silently.
///
/// # Arguments
/// * `credentials_path` - Path to the OAuth2 client secret JSON file
/// * `token_cache_path` - Path where access and refresh tokens are cached
pub async fn initialize_gmail_hub(
    credentials_path: &Path,
    token_cache_path: &Path,
) -> Result<GmailHub> {
    let secret = yup_oauth2::read_application_secret(credentials_path)
        .await
        .map_err(|e| {
            MailError::AuthError(format!(
                "Failed to read credentials from {:?}: {}",
                credentials_path, e
            ))
        })?;

    if let Some(parent) = token_cache_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let auth = yup_oauth2::InstalledFlowAuthenticator::builder(
        secret,
        yup_oauth2::InstalledFlowReturnMethod::HTTPRedirect,
    )
    .persist_tokens_to_disk(token_cache_path)
    .build()
    .await
    .map_err(|e| MailError::AuthError(format!("Failed to build authenticator: {}", e)))?;

    // Obtain the token up front so an expired grant fails here, not mid-fetch
    auth.token(READONLY_SCOPES)
        .await
        .map_err(|e| MailError::AuthError(format!("Failed to obtain token: {}", e)))?;

    let client = hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
        .build(
            hyper_rustls::HttpsConnectorBuilder::new()
                .with_native_roots()
                .map_err(|e| MailError::AuthError(format!("Failed to load TLS roots: {}", e)))?
                .https_or_http()
                .enable_http1()
                .build(),
        );

    Ok(Gmail::new(client, auth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scopes_are_read_only() {
        assert_eq!(READONLY_SCOPES.len(), 1);
        assert!(READONLY_SCOPES[0].ends_with("gmail.readonly"));
    }

    #[tokio::test]
    async fn test_missing_credentials_is_auth_error() {
        let dir = TempDir::new().unwrap();
        let result = initialize_gmail_hub(
            &dir.path().join("missing-credentials.json"),
            &dir.path().join("token.json"),
        )
        .await;

        match result {
            Err(MailError::AuthError(message)) => {
                assert!(message.contains("Failed to read credentials"))
            }
            Err(other) => panic!("expected AuthError, got {}", other),
            Ok(_) => panic!("expected AuthError, got a hub"),
        }
    }
}
