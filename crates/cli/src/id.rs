// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use cardsync_core::EntityKind;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Generate a record ID from its kind, title, and timestamp.
/// Format: {kind}-{hash} where hash is first 8 hex chars of SHA256(title + timestamp)
pub fn generate_id(kind: EntityKind, title: &str, created_at: &DateTime<Utc>) -> String {
    let input = format!("{}{}", title, created_at.to_rfc3339());
    let hash = Sha256::digest(input.as_bytes());
    let short_hash = hex::encode(&hash[..4]);
    format!("{}-{}", kind, short_hash)
}

/// Generate an ID not rejected by `exists`, appending an incrementing suffix on collision.
pub fn generate_unique_id<F>(
    kind: EntityKind,
    title: &str,
    created_at: &DateTime<Utc>,
    exists: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let base_id = generate_id(kind, title, created_at);

    if !exists(&base_id) {
        return base_id;
    }

    let mut suffix = 2;
    loop {
        let id = format!("{}-{}", base_id, suffix);
        if !exists(&id) {
            return id;
        }
        suffix += 1;
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
