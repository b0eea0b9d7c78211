use rand::RngExt;

use crate::domain::types::{CODE_MAX, CODE_MIN};

/// Generate a one-time code, uniformly distributed over `1000..=9999`.
///
/// No uniqueness guarantee across callers: two concurrent requests may draw
/// the same value. The security margin is the short TTL of the stored code,
/// not the size of the code space.
pub fn generate_code() -> u32 {
    let mut rng = rand::rng();
    rng.random_range(CODE_MIN..=CODE_MAX)
}
