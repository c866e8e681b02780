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

//! Ceremony challenge generation.

use aws_lc_rs::rand::{SecureRandom, SystemRandom};

use crate::{base64_encode, CHALLENGE_SIZE};

/// Produces the random challenge bound to each ceremony.
///
/// Challenges are [`CHALLENGE_SIZE`] bytes from the system CSPRNG,
/// standard-base64-encoded. They are not persisted here: the caller keeps
/// the issued value (typically in a session) and hands it back for exactly
/// one comparison when the ceremony completes.
pub struct ChallengeGenerator;

impl ChallengeGenerator {
    /// Returns a fresh challenge, standard-base64-encoded.
    ///
    /// # Panics
    ///
    /// Panics if the system CSPRNG fails. Running a ceremony with a
    /// predictable or empty challenge is never acceptable, so there is no
    /// fallback.
    pub fn generate() -> String {
        base64_encode(&Self::generate_bytes())
    }

    /// Returns the raw challenge bytes.
    pub fn generate_bytes() -> [u8; CHALLENGE_SIZE] {
        let rng = SystemRandom::new();
        let mut challenge = [0u8; CHALLENGE_SIZE];
        rng.fill(&mut challenge)
            .expect("failed to obtain entropy for challenge");
        challenge
    }
}
