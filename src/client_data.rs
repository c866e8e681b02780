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

//! Client-data checks for the registration ceremony.
//!
//! Registration responses carry the client data as an already-parsed JSON
//! object (the browser-side script decodes `clientDataJSON` before posting).
//! The checks here run in a fixed order and short-circuit on the first
//! failure; the reason strings are part of the crate's observable contract
//! and must not change.

use serde_json::Value;

use crate::base64url_decode;

/// Client data absent or not a JSON object.
pub const INVALID_CLIENT_DATA: &str = "Invalid client data property";

/// Client data `type` is not `webauthn.create`.
pub const INVALID_CLIENT_DATA_TYPE: &str = "Invalid client data type property";

/// Challenge missing, undecodable, mismatched, or expected-empty.
pub const INVALID_CLIENT_DATA_CHALLENGE: &str = "Invalid client data challenge property";

/// Origin missing or not equal to the expected origin.
pub const INVALID_DATA_ORIGIN: &str = "Invalid data origin property";

pub(crate) const TYPE_CREATE: &str = "webauthn.create";

/// Runs the registration client-data checks, returning the first failing
/// reason or `None` when everything passes.
///
/// An empty `expected_challenge` always fails the challenge check, even if
/// the response's own challenge is empty too; accepting the both-empty case
/// would open a replay bypass.
pub(crate) fn verify_creation_data(
    client_data: &Value,
    expected_challenge: &str,
    expected_origin: &str,
) -> Option<&'static str> {
    let Some(object) = client_data.as_object() else {
        return Some(INVALID_CLIENT_DATA);
    };

    match object.get("type").and_then(Value::as_str) {
        Some(TYPE_CREATE) => {}
        _ => return Some(INVALID_CLIENT_DATA_TYPE),
    }

    if expected_challenge.is_empty() {
        return Some(INVALID_CLIENT_DATA_CHALLENGE);
    }
    let challenge = object
        .get("challenge")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let Ok(decoded) = base64url_decode(challenge) else {
        return Some(INVALID_CLIENT_DATA_CHALLENGE);
    };
    if decoded != expected_challenge.as_bytes() {
        return Some(INVALID_CLIENT_DATA_CHALLENGE);
    }

    match object.get("origin").and_then(Value::as_str) {
        Some(origin) if origin == expected_origin => {}
        _ => return Some(INVALID_DATA_ORIGIN),
    }

    None
}
