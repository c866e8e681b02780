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

//! Credential storage contract and the in-memory reference adapter.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::types::CredentialMap;

/// Persistence contract for per-user credential sets.
///
/// The flows read a user's whole credential map, modify it, and write it
/// back. Adapters must serialize the read-modify-write per user (a lock or
/// an atomic swap on the stored document) so concurrent authentications for
/// the same user do not lose updates. The `org_id` parameter scopes writes
/// in multi-tenant deployments; single-tenant adapters may ignore it.
pub trait CredentialStore {
    /// Returns the user's credential map, empty if the user has none.
    fn user_credentials(&self, user_id: &str) -> CredentialMap;

    /// Replaces the user's credential map. Returns `false` when the write
    /// was rejected; callers treat that as failure of the whole operation.
    fn put_user_credentials(
        &self,
        org_id: &str,
        user_id: &str,
        credentials: CredentialMap,
    ) -> bool;
}

impl<S: CredentialStore + ?Sized> CredentialStore for &S {
    fn user_credentials(&self, user_id: &str) -> CredentialMap {
        (**self).user_credentials(user_id)
    }

    fn put_user_credentials(
        &self,
        org_id: &str,
        user_id: &str,
        credentials: CredentialMap,
    ) -> bool {
        (**self).put_user_credentials(org_id, user_id, credentials)
    }
}

impl<S: CredentialStore + ?Sized> CredentialStore for Arc<S> {
    fn user_credentials(&self, user_id: &str) -> CredentialMap {
        (**self).user_credentials(user_id)
    }

    fn put_user_credentials(
        &self,
        org_id: &str,
        user_id: &str,
        credentials: CredentialMap,
    ) -> bool {
        (**self).put_user_credentials(org_id, user_id, credentials)
    }
}

/// In-memory credential store.
///
/// Single-tenant: the organization id is accepted for contract
/// compatibility and ignored. The mutex serializes all access, which also
/// covers the per-user write-serialization requirement.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: Mutex<HashMap<String, CredentialMap>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn user_credentials(&self, user_id: &str) -> CredentialMap {
        self.users
            .lock()
            .map(|users| users.get(user_id).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn put_user_credentials(
        &self,
        _org_id: &str,
        user_id: &str,
        credentials: CredentialMap,
    ) -> bool {
        match self.users.lock() {
            Ok(mut users) => {
                users.insert(user_id.to_string(), credentials);
                true
            }
            Err(_) => false,
        }
    }
}
