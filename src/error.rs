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

//! Error types for Passgate operations.
//!
//! These cover hard failures: malformed encodings and key material,
//! unsupported algorithms, failed verification. Protocol validation outcomes
//! are not errors; they are reported through [`crate::Validation`].

use thiserror::Error;

/// Errors that can occur while handling WebAuthn material.
#[derive(Debug, Error)]
pub enum Error {
    /// A base64 or base64url payload failed to decode.
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A PEM document is missing its markers or carries an empty body.
    #[error("malformed PEM document")]
    Pem,

    /// A DER structure could not be walked.
    #[error("malformed DER structure: {0}")]
    Der(&'static str),

    /// A COSE algorithm identifier outside the supported set.
    #[error("unsupported COSE algorithm: {0}")]
    UnsupportedAlgorithm(i32),

    /// Signature verification failed. No distinction is made between an
    /// invalid signature and a key mismatch.
    #[error("signature verification failed")]
    Verification,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
