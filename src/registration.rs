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

//! Registration ceremony handling.

use aws_lc_rs::{constant_time, digest};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::challenge::ChallengeGenerator;
use crate::client_data;
use crate::store::CredentialStore;
use crate::types::*;
use crate::verifier::public_key_to_pem;
use crate::{recode_credential_id, CEREMONY_TIMEOUT_MS, RP_DISPLAY_NAME};

/// Relying-party hash in the authenticator data is absent, too short, or
/// does not match SHA-256 of the relying-party id.
pub const INVALID_RELYING_PARTY: &str = "Invalid relying party identifier property";

/// Registration response carries no extracted public key.
pub const MISSING_PUBLIC_KEY: &str = "Missing public key property";

const RP_ID_HASH_LEN: usize = 32;

/// Options sent to the browser to begin credential registration.
#[derive(Serialize, Debug)]
pub struct RegistrationOptions {
    /// Information about the relying party.
    pub rp: RelyingParty,

    /// Information about the user.
    pub user: UserInfo,

    /// The challenge value (standard-base64-encoded).
    pub challenge: String,

    /// Acceptable public key algorithms, in preference order.
    #[serde(rename = "pubKeyCredParams")]
    pub pub_key_cred_params: Vec<PubKeyCredParam>,

    /// Timeout for the operation in milliseconds.
    pub timeout: u64,

    /// Already-registered credentials the authenticator must not register
    /// again.
    #[serde(rename = "excludeCredentials")]
    pub exclude_credentials: Vec<ExcludeCredential>,

    /// Authenticator selection criteria.
    #[serde(rename = "authenticatorSelection")]
    pub authenticator_selection: AuthenticatorSelection,
}

/// Registration response posted by the browser.
///
/// The client-side script pre-processes the raw WebAuthn result: it decodes
/// `clientDataJSON` into an object and extracts the public key, algorithm,
/// transports, and authenticator data from the attestation object before
/// posting. Field names follow the WebAuthn wire format.
#[derive(Deserialize, Debug, Clone)]
pub struct RegistrationResponse {
    /// Credential id chosen by the authenticator (base64url-encoded).
    #[serde(default)]
    pub id: String,

    /// Same id as raw base64url, unused by the core but part of the wire
    /// shape.
    #[serde(rename = "rawId", default)]
    pub raw_id: String,

    /// Authenticator attestation output.
    #[serde(default)]
    pub response: AttestationResponse,
}

/// The `response` member of a registration response.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct AttestationResponse {
    /// The parsed client data object. Kept as a JSON value so validation
    /// can report a malformed shape instead of failing deserialization.
    #[serde(rename = "clientDataJSON", default)]
    pub client_data_json: serde_json::Value,

    /// CBOR attestation object (base64url-encoded). The core does not parse
    /// it; the extracted fields below are used instead.
    #[serde(rename = "attestationObject", default)]
    pub attestation_object: String,

    /// SubjectPublicKeyInfo DER of the new public key, as a byte sequence.
    #[serde(rename = "publicKey", default)]
    pub public_key: Option<Vec<u8>>,

    /// COSE algorithm identifier of the new key.
    #[serde(rename = "publicKeyAlgorithm", default)]
    pub public_key_algorithm: i32,

    /// Transport hints reported by the authenticator.
    #[serde(default)]
    pub transports: Vec<String>,

    /// Raw authenticator data, as a byte sequence. The first 32 bytes are
    /// the relying-party id hash.
    #[serde(rename = "authData", default)]
    pub auth_data: Vec<u8>,
}

/// Handles credential registration: option building, response validation,
/// and credential creation.
pub struct RegistrationFlow<S> {
    store: S,
}

impl<S: CredentialStore> RegistrationFlow<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Builds the options for a registration ceremony.
    ///
    /// Stateless: the caller persists the returned challenge and hands it
    /// back to [`validate_registration`](Self::validate_registration) when
    /// the browser responds.
    pub fn registration_options(&self, user: &UserIdentity, origin: &str) -> RegistrationOptions {
        let exclude_credentials = self
            .store
            .user_credentials(&user.username)
            .keys()
            .map(|id| ExcludeCredential {
                id: id.clone(),
                type_: "public-key".to_string(),
            })
            .collect();

        RegistrationOptions {
            rp: RelyingParty {
                name: RP_DISPLAY_NAME.to_string(),
                id: origin.to_string(),
            },
            user: UserInfo::from(user),
            challenge: ChallengeGenerator::generate(),
            pub_key_cred_params: vec![
                PubKeyCredParam {
                    alg: CoseAlgorithm::Es256,
                    type_: "public-key".to_string(),
                },
                PubKeyCredParam {
                    alg: CoseAlgorithm::Rs256,
                    type_: "public-key".to_string(),
                },
            ],
            timeout: CEREMONY_TIMEOUT_MS,
            exclude_credentials,
            authenticator_selection: AuthenticatorSelection {
                user_verification: UserVerificationRequirement::Discouraged,
            },
        }
    }

    /// Validates a registration response against the issued challenge and
    /// the relying-party identifiers.
    ///
    /// Checks run in a fixed order and stop at the first failure; the
    /// returned [`Validation`] carries the corresponding reason string.
    /// Whatever the outcome, the caller must discard `expected_challenge`
    /// after this call.
    pub fn validate_registration(
        &self,
        response: &RegistrationResponse,
        origin: &str,
        rp_id: &str,
        expected_challenge: &str,
    ) -> Validation {
        if let Some(reason) = client_data::verify_creation_data(
            &response.response.client_data_json,
            expected_challenge,
            origin,
        ) {
            return Validation::fail(reason);
        }

        let auth_data = &response.response.auth_data;
        if auth_data.len() < RP_ID_HASH_LEN {
            return Validation::fail(INVALID_RELYING_PARTY);
        }
        let rp_hash = digest::digest(&digest::SHA256, rp_id.as_bytes());
        if constant_time::verify_slices_are_equal(&auth_data[..RP_ID_HASH_LEN], rp_hash.as_ref())
            .is_err()
        {
            return Validation::fail(INVALID_RELYING_PARTY);
        }

        if response.response.public_key.is_none() {
            return Validation::fail(MISSING_PUBLIC_KEY);
        }

        Validation::ok()
    }

    /// Stores the credential carried by a validated registration response.
    ///
    /// The extracted SubjectPublicKeyInfo bytes are wrapped into a PEM
    /// document and recorded together with the algorithm, transports, and
    /// creation timestamp under the storage encoding of the credential id.
    ///
    /// Returns the new credential id, or `None` when the algorithm is
    /// unsupported, the id does not decode, or the store rejects the write.
    /// `None` is a failure; there is no valid empty credential id.
    pub fn create_credential(
        &self,
        org_id: &str,
        user_id: &str,
        response: &RegistrationResponse,
    ) -> Option<String> {
        let algorithm = match CoseAlgorithm::try_from(response.response.public_key_algorithm) {
            Ok(algorithm) => algorithm,
            Err(err) => {
                warn!("registration for {user_id} rejected: {err}");
                return None;
            }
        };
        let public_key = response.response.public_key.as_deref()?;

        let credential_id = match recode_credential_id(&response.id) {
            Ok(id) if !id.is_empty() => id,
            _ => {
                warn!("registration for {user_id} rejected: undecodable credential id");
                return None;
            }
        };

        let record = CredentialRecord::new(
            public_key_to_pem(public_key),
            algorithm,
            response.response.transports.clone(),
        );

        let mut credentials = self.store.user_credentials(user_id);
        credentials.insert(credential_id.clone(), record);
        if !self.store.put_user_credentials(org_id, user_id, credentials) {
            warn!("credential store rejected write for {user_id}");
            return None;
        }

        Some(credential_id)
    }
}
