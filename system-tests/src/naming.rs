// system-tests/src/naming.rs
// ============================================================================
// Module: Resource Naming
// Description: Random names for resources created by acceptance runs.
// Purpose: Keep concurrent runs against one account from colliding.
// Dependencies: rand
// ============================================================================

//! ## Overview
//! Acceptance runs create real policies; names get a random suffix so that
//! leftovers are easy to spot and parallel runs do not collide.

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Length of the random suffix.
const SUFFIX_LEN: usize = 10;

/// Returns `prefix` followed by a lower-case random suffix.
#[must_use]
pub fn random_resource_name(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect();
    format!("{prefix}-{suffix}")
}
