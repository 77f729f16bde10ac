//! In-memory vendor API key storage.
//!
//! ```rust
//! use pprovider::{ProviderId, SecureCredentialManager};
//!
//! let credentials = SecureCredentialManager::new();
//! credentials.set_api_key(ProviderId::Gemini, "AIza-test").expect("key should store");
//!
//! assert!(credentials.has_credentials(ProviderId::Gemini).expect("lock"));
//! assert!(!credentials.has_credentials(ProviderId::OpenAi).expect("lock"));
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::{ProviderError, ProviderId};

#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // Zero bytes keep the buffer valid UTF-8.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

#[derive(Default)]
pub struct SecureCredentialManager {
    credentials: Mutex<HashMap<ProviderId, SecretString>>,
}

impl SecureCredentialManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every vendor key found through `lookup`; blank values count as absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ProviderError> {
        let manager = Self::new();
        for provider in ProviderId::ALL {
            if let Some(value) = lookup(provider.credential_env_var())
                && !value.trim().is_empty()
            {
                manager.set_api_key(provider, value)?;
            }
        }
        Ok(manager)
    }

    pub fn set_api_key(
        &self,
        provider: ProviderId,
        api_key: impl Into<String>,
    ) -> Result<(), ProviderError> {
        let api_key = SecretString::new(api_key.into().trim());
        if api_key.is_blank() {
            return Err(ProviderError::authentication("api key must not be empty"));
        }

        self.credentials_mut()?.insert(provider, api_key);
        Ok(())
    }

    pub fn has_credentials(&self, provider: ProviderId) -> Result<bool, ProviderError> {
        Ok(self.credentials_ref()?.contains_key(&provider))
    }

    pub fn with_api_key<R>(
        &self,
        provider: ProviderId,
        f: impl FnOnce(&str) -> R,
    ) -> Result<Option<R>, ProviderError> {
        let credentials = self.credentials_ref()?;
        Ok(credentials.get(&provider).map(|secret| f(secret.expose())))
    }

    pub fn clear(&self, provider: ProviderId) -> Result<bool, ProviderError> {
        Ok(self.credentials_mut()?.remove(&provider).is_some())
    }

    pub(crate) fn require_api_key(&self, provider: ProviderId) -> Result<String, ProviderError> {
        self.with_api_key(provider, str::to_string)?.ok_or_else(|| {
            ProviderError::authentication(format!("no {provider} credentials configured"))
        })
    }

    fn credentials_ref(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<ProviderId, SecretString>>, ProviderError> {
        self.credentials
            .lock()
            .map_err(|_| ProviderError::other("credential manager lock poisoned"))
    }

    fn credentials_mut(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<ProviderId, SecretString>>, ProviderError> {
        self.credentials
            .lock()
            .map_err(|_| ProviderError::other("credential manager lock poisoned"))
    }
}
