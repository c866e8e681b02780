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

use std::sync::Arc;

use crate::{
    CoseAlgorithm, CredentialMap, CredentialRecord, CredentialStore, MemoryCredentialStore,
};

fn record() -> CredentialRecord {
    CredentialRecord::new("pem".to_string(), CoseAlgorithm::Es256, vec![])
}

#[test]
fn test_unknown_user_has_no_credentials() {
    let store = MemoryCredentialStore::new();
    assert!(store.user_credentials("nobody").is_empty());
}

#[test]
fn test_put_then_get() {
    let store = MemoryCredentialStore::new();
    let mut credentials = CredentialMap::new();
    credentials.insert("id1".to_string(), record());

    assert!(store.put_user_credentials("org1", "alice", credentials));

    let read_back = store.user_credentials("alice");
    assert_eq!(read_back.len(), 1);
    assert!(read_back.contains_key("id1"));
}

#[test]
fn test_users_are_isolated() {
    let store = MemoryCredentialStore::new();
    let mut credentials = CredentialMap::new();
    credentials.insert("id1".to_string(), record());
    assert!(store.put_user_credentials("org1", "alice", credentials));

    assert!(store.user_credentials("bob").is_empty());
}

#[test]
fn test_put_replaces_whole_map() {
    let store = MemoryCredentialStore::new();
    let mut first = CredentialMap::new();
    first.insert("id1".to_string(), record());
    assert!(store.put_user_credentials("org1", "alice", first));

    let mut second = CredentialMap::new();
    second.insert("id2".to_string(), record());
    assert!(store.put_user_credentials("org1", "alice", second));

    let read_back = store.user_credentials("alice");
    assert_eq!(read_back.len(), 1);
    assert!(read_back.contains_key("id2"));
}

#[test]
fn test_new_record_defaults() {
    let record = record();
    assert_eq!(record.display_name, "Security key");
    assert!(record.added_at > 0);
    assert_eq!(record.last_used_at, 0);
}

#[test]
fn test_store_usable_through_arc() {
    let store = Arc::new(MemoryCredentialStore::new());
    let mut credentials = CredentialMap::new();
    credentials.insert("id1".to_string(), record());

    // Blanket impl lets shared handles satisfy the trait.
    assert!(store.put_user_credentials("org1", "alice", credentials));
    assert_eq!(store.user_credentials("alice").len(), 1);
}

#[test]
fn test_record_serde_roundtrip() {
    let record = record();
    let json = serde_json::to_string(&record).unwrap();
    let decoded: CredentialRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.algorithm, CoseAlgorithm::Es256);
    assert_eq!(decoded.display_name, record.display_name);
}

#[test]
fn test_algorithm_serializes_as_cose_number() {
    let json = serde_json::to_string(&CoseAlgorithm::Es256).unwrap();
    assert_eq!(json, "-7");
    let json = serde_json::to_string(&CoseAlgorithm::Rs256).unwrap();
    assert_eq!(json, "-257");
}

#[test]
fn test_algorithm_rejects_unsupported_numbers() {
    assert!(serde_json::from_str::<CoseAlgorithm>("-8").is_err());
    assert!(CoseAlgorithm::try_from(0).is_err());
    assert_eq!(CoseAlgorithm::try_from(-7).unwrap(), CoseAlgorithm::Es256);
    assert_eq!(CoseAlgorithm::try_from(-257).unwrap(), CoseAlgorithm::Rs256);
}
