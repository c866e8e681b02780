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

use aws_lc_rs::digest;
use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::rsa::KeySize;
use aws_lc_rs::signature::{
    EcdsaKeyPair, KeyPair, RsaKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING, RSA_PKCS1_SHA256,
};
use serde_json::json;

use crate::*;

/// SubjectPublicKeyInfo prefix for an uncompressed P-256 public key.
const P256_SPKI_PREFIX: &[u8] = &[
    0x30, 0x59, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x08,
    0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, 0x03, 0x42, 0x00,
];

/// AlgorithmIdentifier for rsaEncryption with NULL parameters.
const RSA_ALGORITHM_ID: &[u8] = &[
    0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01, 0x05, 0x00,
];

/// Generates a fresh P-256 key pair for signing test assertions.
pub fn es256_keypair() -> EcdsaKeyPair {
    let rng = SystemRandom::new();
    let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, &rng).unwrap();
    EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, pkcs8.as_ref()).unwrap()
}

/// SubjectPublicKeyInfo DER for a P-256 key pair.
pub fn es256_spki(key_pair: &EcdsaKeyPair) -> Vec<u8> {
    let mut spki = P256_SPKI_PREFIX.to_vec();
    spki.extend_from_slice(key_pair.public_key().as_ref());
    spki
}

/// Signs a message with an ES256 key, returning the ASN.1 DER signature.
pub fn es256_sign(key_pair: &EcdsaKeyPair, message: &[u8]) -> Vec<u8> {
    let rng = SystemRandom::new();
    key_pair.sign(&rng, message).unwrap().as_ref().to_vec()
}

/// Generates a fresh RSA-2048 key pair.
pub fn rs256_keypair() -> RsaKeyPair {
    RsaKeyPair::generate(KeySize::Rsa2048).unwrap()
}

/// SubjectPublicKeyInfo DER for an RSA key pair, built by wrapping the
/// RSAPublicKey structure in an rsaEncryption AlgorithmIdentifier.
pub fn rs256_spki(key_pair: &RsaKeyPair) -> Vec<u8> {
    let mut bit_string = vec![0x00];
    bit_string.extend_from_slice(key_pair.public_key().as_ref());

    let mut body = RSA_ALGORITHM_ID.to_vec();
    body.extend_from_slice(&der_element(0x03, &bit_string));
    der_element(0x30, &body)
}

/// Signs a message with an RS256 key (PKCS#1 v1.5, SHA-256).
pub fn rs256_sign(key_pair: &RsaKeyPair, message: &[u8]) -> Vec<u8> {
    let rng = SystemRandom::new();
    let mut signature = vec![0u8; key_pair.public_modulus_len()];
    key_pair
        .sign(&RSA_PKCS1_SHA256, &rng, message, &mut signature)
        .unwrap();
    signature
}

/// Emits one DER element with the given tag around the content bytes.
pub fn der_element(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = content.len();
    if len < 0x80 {
        out.push(len as u8);
    } else if len < 0x100 {
        out.push(0x81);
        out.push(len as u8);
    } else {
        out.push(0x82);
        out.push((len >> 8) as u8);
        out.push(len as u8);
    }
    out.extend_from_slice(content);
    out
}

/// Client data object for a registration ceremony, as the browser-side
/// script posts it: already parsed, with the challenge string's bytes
/// base64url-encoded.
pub fn creation_client_data(challenge: &str, origin: &str) -> serde_json::Value {
    json!({
        "type": "webauthn.create",
        "challenge": base64url_encode(challenge.as_bytes()),
        "origin": origin,
        "crossOrigin": false
    })
}

/// Authenticator data whose leading 32 bytes are the relying-party id hash.
pub fn auth_data_for(rp_id: &str) -> Vec<u8> {
    let mut auth_data = digest::digest(&digest::SHA256, rp_id.as_bytes())
        .as_ref()
        .to_vec();
    auth_data.push(0x45); // flags: UP=1, AT=1
    auth_data.extend_from_slice(&[0, 0, 0, 0]); // counter
    auth_data
}

/// A complete, well-formed registration response. Built through the JSON
/// wire shape so the serde field names stay covered.
pub fn registration_response(
    credential_id: &[u8],
    challenge: &str,
    origin: &str,
    rp_id: &str,
    algorithm: i32,
    public_key: &[u8],
) -> RegistrationResponse {
    serde_json::from_value(json!({
        "id": base64url_encode(credential_id),
        "rawId": base64url_encode(credential_id),
        "response": {
            "clientDataJSON": creation_client_data(challenge, origin),
            "attestationObject": "",
            "publicKey": public_key,
            "publicKeyAlgorithm": algorithm,
            "transports": ["usb"],
            "authData": auth_data_for(rp_id),
        }
    }))
    .unwrap()
}

/// A complete authentication response whose signature is produced by the
/// given closure over the exact signed-data buffer.
pub fn assertion_response(
    credential_id: &[u8],
    challenge: &str,
    origin: &str,
    rp_id: &str,
    sign: impl FnOnce(&[u8]) -> Vec<u8>,
) -> AuthenticationResponse {
    let client_data = serde_json::to_vec(&json!({
        "type": "webauthn.get",
        "challenge": base64url_encode(challenge.as_bytes()),
        "origin": origin,
        "crossOrigin": false
    }))
    .unwrap();
    let auth_data = auth_data_for(rp_id);

    let mut signed_data = auth_data.clone();
    signed_data.extend_from_slice(digest::digest(&digest::SHA256, &client_data).as_ref());
    let signature = sign(&signed_data);

    serde_json::from_value(json!({
        "id": base64url_encode(credential_id),
        "response": {
            "clientDataJSON": base64url_encode(&client_data),
            "authenticatorData": base64url_encode(&auth_data),
            "signature": base64url_encode(&signature),
        }
    }))
    .unwrap()
}

/// Seeds a store with one credential and returns its storage id.
pub fn seed_credential(
    store: &MemoryCredentialStore,
    username: &str,
    credential_id: &[u8],
    public_key_pem: String,
    algorithm: CoseAlgorithm,
) -> String {
    let storage_id = base64_encode(credential_id);
    let mut credentials = CredentialMap::new();
    credentials.insert(
        storage_id.clone(),
        CredentialRecord::new(public_key_pem, algorithm, vec!["usb".to_string()]),
    );
    assert!(store.put_user_credentials("", username, credentials));
    storage_id
}

/// Store whose writes always fail, for exercising persistence-failure
/// paths.
pub struct FailingStore;

impl CredentialStore for FailingStore {
    fn user_credentials(&self, _user_id: &str) -> CredentialMap {
        CredentialMap::new()
    }

    fn put_user_credentials(
        &self,
        _org_id: &str,
        _user_id: &str,
        _credentials: CredentialMap,
    ) -> bool {
        false
    }
}
