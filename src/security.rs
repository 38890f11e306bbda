// WS-Security UsernameToken PasswordDigest material (OASIS username token
// profile 1.0). Every outbound request draws a fresh bundle: 16 random nonce
// bytes, a created timestamp, and SHA-1(nonce || created || SHA-1(password)).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use sha1::{Digest, Sha1};
use uuid::Uuid;

pub const NONCE_LEN: usize = 16;
pub const DIGEST_LEN: usize = 20;

// The created string must render byte-for-byte identically in the digest and
// in the envelope, so it is formatted exactly once per bundle.
const CREATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// Keep the password out of debug output and logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

// Single-use authentication material for one outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityBundle {
    // Base64 of the 16 raw nonce bytes
    pub nonce: String,
    pub created: String,
    // Base64 of the 20-byte password digest
    pub digest: String,
    // WS-Addressing message id, fresh per request
    pub message_id: String,
}

pub struct WsSecurity {
    credentials: Credentials,
}

impl WsSecurity {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    pub fn bundle(&self) -> SecurityBundle {
        self.bundle_at(Utc::now())
    }

    // Explicit timestamp entry point so tests can pin the created string.
    pub fn bundle_at(&self, now: DateTime<Utc>) -> SecurityBundle {
        let nonce = generate_nonce();
        let created = format_created(now);
        let digest = compute_digest(self.credentials.password(), &nonce, &created);
        SecurityBundle {
            nonce: BASE64.encode(nonce),
            created,
            digest: BASE64.encode(digest),
            message_id: generate_message_id(),
        }
    }
}

pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

pub fn format_created(now: DateTime<Utc>) -> String {
    now.format(CREATED_FORMAT).to_string()
}

// SHA-1(nonce || created-utf8 || SHA-1(password-utf8)). The concatenation
// order is contractual; the server rejects any permutation.
pub fn compute_digest(password: &str, nonce: &[u8], created: &str) -> [u8; DIGEST_LEN] {
    let password_hash = Sha1::digest(password.as_bytes());
    let mut hasher = Sha1::new();
    hasher.update(nonce);
    hasher.update(created.as_bytes());
    hasher.update(password_hash);
    hasher.finalize().into()
}

pub fn generate_message_id() -> String {
    format!("uuid:{}", Uuid::new_v4())
}
