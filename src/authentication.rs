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

//! Authentication ceremony handling.

use aws_lc_rs::digest;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::challenge::ChallengeGenerator;
use crate::store::CredentialStore;
use crate::types::*;
use crate::verifier::SignatureVerifier;
use crate::{base64url_decode, recode_credential_id, CEREMONY_TIMEOUT_MS};

// Structural validation reasons, one per required response field. Checks
// run in the order the constants are declared and the first missing field
// is reported.

/// Response has no `id` member.
pub const MISSING_ID: &str = "Missing id property";

/// Response has no `response` member.
pub const MISSING_RESPONSE: &str = "Missing response property";

/// Assertion has no `clientDataJSON` member.
pub const MISSING_CLIENT_DATA_JSON: &str = "Missing clientDataJSON property";

/// Assertion has no `authenticatorData` member.
pub const MISSING_AUTHENTICATOR_DATA: &str = "Missing authenticatorData property";

/// Assertion has no `signature` member.
pub const MISSING_SIGNATURE: &str = "Missing signature property";

/// Options sent to the browser to begin authentication.
#[derive(Serialize, Debug)]
pub struct AuthenticationOptions {
    /// The challenge value (standard-base64-encoded).
    pub challenge: String,

    /// Timeout for the operation in milliseconds.
    pub timeout: u64,

    /// The relying party identifier.
    #[serde(rename = "rpId")]
    pub rp_id: String,

    /// Credentials allowed for this authentication, with their stored
    /// transport hints.
    #[serde(rename = "allowCredentials")]
    pub allow_credentials: Vec<AllowCredential>,

    /// User verification requirement.
    #[serde(rename = "userVerification")]
    pub user_verification: UserVerificationRequirement,

    /// Information about the user.
    pub user: UserInfo,
}

/// Authentication response posted by the browser.
///
/// All fields are optional at the serde layer so that
/// [`AuthenticationFlow::validate_response`] can report exactly which one a
/// malformed request is missing.
#[derive(Deserialize, Debug, Clone)]
pub struct AuthenticationResponse {
    /// Credential id used for the assertion (base64url-encoded).
    pub id: Option<String>,

    /// Authenticator assertion output.
    pub response: Option<AssertionResponse>,
}

/// The `response` member of an authentication response. All binary payloads
/// are base64url-encoded without padding.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct AssertionResponse {
    /// Raw client data JSON bytes.
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: Option<String>,

    /// Raw authenticator data.
    #[serde(rename = "authenticatorData")]
    pub authenticator_data: Option<String>,

    /// Signature over `authenticatorData || sha256(clientDataJSON)`.
    pub signature: Option<String>,

    /// User handle for discoverable credentials, unused by the core.
    #[serde(rename = "userHandle")]
    pub user_handle: Option<String>,
}

/// Handles authentication: option building, structural validation, and
/// cryptographic verification of assertions.
pub struct AuthenticationFlow<S, V> {
    store: S,
    verifier: V,
}

impl<S: CredentialStore, V: SignatureVerifier> AuthenticationFlow<S, V> {
    pub fn new(store: S, verifier: V) -> Self {
        Self { store, verifier }
    }

    /// Builds the options for an authentication ceremony, listing all of
    /// the user's registered credentials.
    pub fn authentication_options(
        &self,
        user: &UserIdentity,
        origin: &str,
    ) -> AuthenticationOptions {
        let allow_credentials = self
            .store
            .user_credentials(&user.username)
            .iter()
            .map(|(id, record)| AllowCredential {
                id: id.clone(),
                type_: "public-key".to_string(),
                transports: record.transports.clone(),
            })
            .collect();

        AuthenticationOptions {
            challenge: ChallengeGenerator::generate(),
            timeout: CEREMONY_TIMEOUT_MS,
            rp_id: origin.to_string(),
            allow_credentials,
            user_verification: UserVerificationRequirement::Discouraged,
            user: UserInfo::from(user),
        }
    }

    /// Checks that the response carries every field the assertion needs.
    ///
    /// Purely structural, no cryptography. Checks run in a fixed order and
    /// the first missing field is reported.
    pub fn validate_response(&self, response: &AuthenticationResponse) -> Validation {
        if response.id.is_none() {
            return Validation::fail(MISSING_ID);
        }
        let Some(assertion) = &response.response else {
            return Validation::fail(MISSING_RESPONSE);
        };
        if assertion.client_data_json.is_none() {
            return Validation::fail(MISSING_CLIENT_DATA_JSON);
        }
        if assertion.authenticator_data.is_none() {
            return Validation::fail(MISSING_AUTHENTICATOR_DATA);
        }
        if assertion.signature.is_none() {
            return Validation::fail(MISSING_SIGNATURE);
        }
        Validation::ok()
    }

    /// Verifies an assertion against the user's stored credentials.
    ///
    /// Expects a response that already passed
    /// [`validate_response`](Self::validate_response). The signed data is
    /// the authenticator data followed by the SHA-256 of the client data
    /// JSON. An unknown credential id fails authentication without touching
    /// the store; for a known credential, `last_used_at` is updated and
    /// persisted whether or not the signature verifies.
    ///
    /// Every failure - undecodable fields, unknown credential, bad
    /// signature - collapses to `false`.
    pub fn authenticate(
        &self,
        response: &AuthenticationResponse,
        org_id: &str,
        username: &str,
    ) -> bool {
        let (Some(id), Some(assertion)) = (&response.id, &response.response) else {
            return false;
        };
        let Ok(client_data) = base64url_decode(assertion.client_data_json.as_deref().unwrap_or(""))
        else {
            return false;
        };
        let Ok(authenticator_data) =
            base64url_decode(assertion.authenticator_data.as_deref().unwrap_or(""))
        else {
            return false;
        };
        let Ok(signature) = base64url_decode(assertion.signature.as_deref().unwrap_or("")) else {
            return false;
        };

        let client_data_hash = digest::digest(&digest::SHA256, &client_data);
        let mut signed_data = authenticator_data;
        signed_data.extend_from_slice(client_data_hash.as_ref());

        let Ok(credential_id) = recode_credential_id(id) else {
            return false;
        };

        let mut credentials = self.store.user_credentials(username);
        let verified = {
            let Some(record) = credentials.get_mut(&credential_id) else {
                warn!("authentication for {username} presented an unknown credential");
                return false;
            };
            let verified = self
                .verifier
                .verify(&record.public_key, &signature, &signed_data);
            record.last_used_at = now_secs();
            verified
        };

        if !self.store.put_user_credentials(org_id, username, credentials) {
            warn!("credential store rejected usage update for {username}");
        }

        verified
    }
}
