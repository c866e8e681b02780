// Copyright 2026 The Passgate Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Data structures shared by the registration and authentication flows.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::base64url_encode;
use crate::error::Error;

/// Display name assigned to a credential at registration time. Users can
/// rename the credential later through the store.
pub const DEFAULT_CREDENTIAL_NAME: &str = "Security key";

/// COSE algorithm identifiers accepted by this relying party.
///
/// The supported set is fixed by policy: ECDSA over P-256 with SHA-256 and
/// RSA PKCS#1 v1.5 with SHA-256. Everything else is rejected at
/// registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum CoseAlgorithm {
    /// ECDSA with P-256 and SHA-256 (COSE -7).
    Es256,
    /// RSA PKCS#1 v1.5 with SHA-256 (COSE -257).
    Rs256,
}

impl CoseAlgorithm {
    /// Returns the numeric COSE identifier.
    pub const fn id(self) -> i32 {
        match self {
            CoseAlgorithm::Es256 => -7,
            CoseAlgorithm::Rs256 => -257,
        }
    }
}

impl From<CoseAlgorithm> for i32 {
    fn from(algorithm: CoseAlgorithm) -> i32 {
        algorithm.id()
    }
}

impl TryFrom<i32> for CoseAlgorithm {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -7 => Ok(CoseAlgorithm::Es256),
            -257 => Ok(CoseAlgorithm::Rs256),
            other => Err(Error::UnsupportedAlgorithm(other)),
        }
    }
}

/// One registered authenticator for one user.
///
/// The public key is immutable once stored; `display_name` and
/// `last_used_at` are the only fields expected to change over a
/// credential's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// PEM-encoded public key ("PUBLIC KEY" document).
    pub public_key: String,

    /// COSE algorithm the key was registered with.
    pub algorithm: CoseAlgorithm,

    /// Transport hints reported by the client ("usb", "nfc", "internal").
    /// Informational only.
    pub transports: Vec<String>,

    /// Human-readable label, mutable.
    pub display_name: String,

    /// Creation timestamp (Unix seconds), set once.
    pub added_at: u64,

    /// Updated on every authentication attempt against a known credential.
    pub last_used_at: u64,
}

impl CredentialRecord {
    /// Creates a record for a freshly registered credential.
    pub fn new(public_key: String, algorithm: CoseAlgorithm, transports: Vec<String>) -> Self {
        Self {
            public_key,
            algorithm,
            transports,
            display_name: DEFAULT_CREDENTIAL_NAME.to_string(),
            added_at: now_secs(),
            last_used_at: 0,
        }
    }
}

/// A user's credential set, keyed by the standard-base64 credential id.
///
/// The map key gives per-user uniqueness of credential ids by construction.
pub type CredentialMap = BTreeMap<String, CredentialRecord>;

/// The user a ceremony is running for.
///
/// Owned by the surrounding application's user store; this crate only needs
/// the names to build ceremony options and to address the credential store.
#[derive(Debug, Clone)]
pub struct UserIdentity {
    /// Account identifier, also the credential-store key.
    pub username: String,

    /// Human-readable display name.
    pub display_name: String,
}

impl UserIdentity {
    pub fn new(username: &str, display_name: &str) -> Self {
        Self {
            username: username.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

/// Outcome of a protocol validation step.
///
/// Validation never raises: malformed or semantically invalid ceremony
/// responses produce `valid = false` with one of the fixed reason strings,
/// and the caller decides how to present the rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    /// Whether every check passed.
    pub valid: bool,

    /// The first failing reason, empty on success.
    pub error: String,
}

impl Validation {
    pub(crate) fn ok() -> Self {
        Self {
            valid: true,
            error: String::new(),
        }
    }

    pub(crate) fn fail(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: reason.into(),
        }
    }
}

/// Information about the relying party (RP).
#[derive(Serialize, Debug)]
pub struct RelyingParty {
    /// Human-readable name of the relying party.
    pub name: String,

    /// Unique identifier for the relying party (typically the domain).
    pub id: String,
}

/// Information about the user account, as sent to the browser.
#[derive(Clone, Serialize, Debug)]
pub struct UserInfo {
    /// Unique identifier for the user account (base64url-encoded).
    pub id: String,

    /// Username or account identifier.
    pub name: String,

    /// Human-readable display name for the user.
    #[serde(rename = "displayName")]
    pub display_name: String,
}

impl From<&UserIdentity> for UserInfo {
    fn from(user: &UserIdentity) -> Self {
        Self {
            id: base64url_encode(user.username.as_bytes()),
            name: user.username.clone(),
            display_name: user.display_name.clone(),
        }
    }
}

/// A public key credential parameter specifying an acceptable algorithm.
#[derive(Serialize, Debug)]
pub struct PubKeyCredParam {
    /// COSE algorithm identifier.
    pub alg: CoseAlgorithm,

    /// Credential type (always "public-key").
    #[serde(rename = "type")]
    pub type_: String,
}

/// Authenticator selection criteria for registration.
#[derive(Serialize, Debug)]
pub struct AuthenticatorSelection {
    /// User verification requirement.
    #[serde(rename = "userVerification")]
    pub user_verification: UserVerificationRequirement,
}

/// User verification requirement for ceremony options.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserVerificationRequirement {
    /// User verification is required.
    Required,
    /// User verification is preferred but not required.
    Preferred,
    /// User verification should not be performed.
    Discouraged,
}

/// A credential descriptor for exclusion during registration.
///
/// Used to prevent re-registration of existing credentials.
#[derive(Serialize, Debug)]
pub struct ExcludeCredential {
    /// The credential id (storage encoding).
    pub id: String,

    /// Credential type (always "public-key").
    #[serde(rename = "type")]
    pub type_: String,
}

/// A credential that is allowed for authentication.
#[derive(Serialize, Debug)]
pub struct AllowCredential {
    /// The credential id (storage encoding).
    pub id: String,

    /// Credential type (always "public-key").
    #[serde(rename = "type")]
    pub type_: String,

    /// Transport hints stored at registration time.
    pub transports: Vec<String>,
}

/// Current Unix time in seconds.
pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
