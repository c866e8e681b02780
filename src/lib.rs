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

//! Passgate - a WebAuthn/FIDO2 relying-party core for Rust
//!
//! Passgate implements the server side of the WebAuthn protocol: it builds
//! the option structures handed to the browser `navigator.credentials` API,
//! validates the registration and authentication responses coming back, and
//! verifies assertion signatures against stored public keys. Everything
//! around the protocol - HTTP handlers, sessions, persistence - stays in the
//! calling application and plugs in through two small traits.
//!
//! # Features
//!
//! - Registration and authentication ceremony handling (ES256 and RS256)
//! - Structured validation outcomes with stable, testable error strings
//! - Pluggable credential storage via the [`CredentialStore`] trait
//! - Pluggable signature verification via the [`SignatureVerifier`] trait,
//!   with a PEM/SPKI implementation backed by `aws-lc-rs`
//! - Credential usage bookkeeping (`added_at` / `last_used_at` timestamps)
//!
//! # Example
//!
//! ```rust
//! use passgate::{
//!     AuthenticationFlow, MemoryCredentialStore, PemVerifier, RegistrationFlow, UserIdentity,
//! };
//!
//! let store = MemoryCredentialStore::new();
//! let user = UserIdentity::new("alice", "Alice Smith");
//!
//! // Registration: send the options to the browser, keep the challenge for
//! // the validation step.
//! let registration = RegistrationFlow::new(&store);
//! let options = registration.registration_options(&user, "backup.example.com");
//! # assert_eq!(options.timeout, 60_000);
//!
//! // Later: validate the browser response against the issued challenge.
//! // let outcome = registration.validate_registration(
//! //     &response, "backup.example.com", "backup.example.com", &options.challenge,
//! // );
//!
//! // Authentication works the same way, with a verifier for the signatures.
//! let authentication = AuthenticationFlow::new(&store, PemVerifier);
//! let options = authentication.authentication_options(&user, "backup.example.com");
//! # assert!(options.allow_credentials.is_empty());
//! ```
//!
//! # Ceremony lifecycle
//!
//! Every ceremony is bound to a single challenge: issued with the options,
//! compared exactly once during validation, then discarded by the caller
//! whatever the outcome. Challenges carry no server-side state in this crate;
//! the application keeps them in its session layer.
//!
//! # Security considerations
//!
//! - Always validate responses against the exact origin you serve from;
//!   origins are compared as plain strings, no normalization happens.
//! - Discard a challenge after one comparison attempt to prevent replay.
//! - Stored public keys are not secret, but credential ids should be treated
//!   as sensitive identifiers.

mod authentication;
mod challenge;
mod client_data;
mod error;
mod registration;
mod store;
mod types;
mod verifier;

#[cfg(test)]
mod tests;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;

// Re-export public types
pub use authentication::{
    AssertionResponse, AuthenticationFlow, AuthenticationOptions, AuthenticationResponse,
    MISSING_AUTHENTICATOR_DATA, MISSING_CLIENT_DATA_JSON, MISSING_ID, MISSING_RESPONSE,
    MISSING_SIGNATURE,
};
pub use challenge::ChallengeGenerator;
pub use client_data::{
    INVALID_CLIENT_DATA, INVALID_CLIENT_DATA_CHALLENGE, INVALID_CLIENT_DATA_TYPE,
    INVALID_DATA_ORIGIN,
};
pub use error::{Error, Result};
pub use registration::{
    AttestationResponse, RegistrationFlow, RegistrationOptions, RegistrationResponse,
    INVALID_RELYING_PARTY, MISSING_PUBLIC_KEY,
};
pub use store::{CredentialStore, MemoryCredentialStore};
pub use types::*;
pub use verifier::{public_key_to_pem, PemVerifier, SignatureVerifier};

/// Challenge length in bytes before encoding.
pub const CHALLENGE_SIZE: usize = 32;

/// Timeout handed to the browser with every ceremony, in milliseconds.
pub const CEREMONY_TIMEOUT_MS: u64 = 60_000;

/// Relying-party display name included in registration options.
pub const RP_DISPLAY_NAME: &str = "Passgate";

/// Encodes binary data as base64url (without padding).
///
/// This is the encoding used for all binary payloads crossing the browser
/// boundary, per the WebAuthn convention.
#[inline] pub fn base64url_encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decodes a base64url-encoded string (without padding).
///
/// # Errors
///
/// Returns an error if the input is not valid base64url.
#[inline] pub fn base64url_decode(s: &str) -> Result<Vec<u8>> {
    Ok(URL_SAFE_NO_PAD.decode(s)?)
}

/// Encodes binary data as standard base64 (with padding).
///
/// This is the encoding used for stored values: credential ids and the
/// base64 body of PEM documents.
#[inline] pub fn base64_encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes a standard base64 string.
///
/// # Errors
///
/// Returns an error if the input is not valid base64.
#[inline] pub fn base64_decode(s: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(s)?)
}

/// Re-encodes a wire credential id (base64url) into its storage form
/// (standard base64).
///
/// Credential ids arrive base64url-encoded from the browser and are stored
/// under their standard-base64 encoding, which keys the per-user credential
/// map.
///
/// # Errors
///
/// Returns an error if the input is not valid base64url.
pub fn recode_credential_id(wire_id: &str) -> Result<String> {
    Ok(base64_encode(&base64url_decode(wire_id)?))
}
