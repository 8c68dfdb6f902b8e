//! Authenticated pagination cursors.
//!
//! A page token is the base64 (standard alphabet) encoding of a 12-byte
//! nonce followed by the AES-256-GCM sealing of a JSON [`PageInfo`]. Tokens are
//! opaque to clients: any tampering, truncation or key mismatch fails with the
//! same [`PageTokenError::Invalid`].

use std::fmt;

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::error::PageTokenError;

/// Length of the AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

const NONCE_LEN: usize = 12;

/// The state carried between pages of one listing.
///
/// `request_key`, `filter` and `order` are fixed for the whole listing;
/// `end_cursor` is the offset of the next page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PageInfo {
    pub request_key: String,
    pub end_cursor: u64,
    pub filter: String,
    pub order: String,
}

impl PageInfo {
    /// Creates the page info for the first page of a listing.
    pub fn first_page(
        request_key: impl Into<String>,
        filter: impl Into<String>,
        order: impl Into<String>,
    ) -> Self {
        Self {
            request_key: request_key.into(),
            end_cursor: 0,
            filter: filter.into(),
            order: order.into(),
        }
    }
}

/// Encodes and decodes page tokens under one process-wide key.
///
/// The key never changes after construction; share the paginator behind an
/// `Arc`.
#[derive(Clone)]
pub struct Paginator {
    key: [u8; KEY_LEN],
}

impl fmt::Debug for Paginator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator").finish_non_exhaustive()
    }
}

impl Paginator {
    /// Creates a paginator from a 32-byte key.
    pub fn new(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Creates a paginator from a key slice, rejecting keys of the wrong length.
    pub fn from_slice(key: &[u8]) -> Result<Self, PageTokenError> {
        let key: [u8; KEY_LEN] = key
            .try_into()
            .map_err(|_| PageTokenError::InvalidKeyLength { len: key.len() })?;
        Ok(Self::new(key))
    }

    /// Creates a paginator with a random key from the OS CSPRNG.
    ///
    /// Tokens issued by this paginator become invalid when the process exits.
    pub fn random() -> Self {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        Self::new(key)
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key))
    }

    /// Seals `page_info` advanced by `page_size` into a token.
    pub fn encode(&self, page_info: &PageInfo, page_size: u64) -> Result<String, PageTokenError> {
        let next = PageInfo {
            end_cursor: page_info.end_cursor.saturating_add(page_size),
            ..page_info.clone()
        };
        let plaintext = serde_json::to_vec(&next).map_err(|_| PageTokenError::Seal)?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher()
            .encrypt(nonce, plaintext.as_ref())
            .map_err(|_| PageTokenError::Seal)?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(combined))
    }

    /// Opens a token. An empty token yields the default page info.
    pub fn decode(&self, token: &str) -> Result<PageInfo, PageTokenError> {
        if token.is_empty() {
            return Ok(PageInfo::default());
        }

        let combined = STANDARD
            .decode(token)
            .map_err(|_| PageTokenError::Invalid)?;
        if combined.len() <= NONCE_LEN {
            return Err(PageTokenError::Invalid);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let plaintext = self
            .cipher()
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| PageTokenError::Invalid)?;

        serde_json::from_slice(&plaintext).map_err(|_| PageTokenError::Invalid)
    }
}

/// Options for a list call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Number of rows to return. Callers resolve the default before building options.
    pub page_size: u32,
    /// State decoded from the request's page token.
    pub page_info: PageInfo,
}

impl ListOptions {
    pub fn new(page_size: u32, page_info: PageInfo) -> Self {
        Self {
            page_size,
            page_info,
        }
    }

    /// Offset of the first row of this page.
    pub fn offset(&self) -> u64 {
        self.page_info.end_cursor
    }

    /// Returns the token for the following page, if one should be issued.
    ///
    /// A token is issued only when the page came back full.
    pub fn next_page_token(
        &self,
        paginator: &Paginator,
        returned: usize,
    ) -> Result<Option<String>, PageTokenError> {
        if self.page_size == 0 || returned != self.page_size as usize {
            return Ok(None);
        }
        paginator
            .encode(&self.page_info, u64::from(self.page_size))
            .map(Some)
    }
}
