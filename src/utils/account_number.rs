//! Account number generation

use rand::Rng;

/// Generate a random numeric account number of the given length.
///
/// The output space is `10^length`, so collisions are improbable but not
/// impossible; callers must treat the store's uniqueness constraint as the
/// arbiter and retry on conflict (see `AccountManager::open_account`).
pub fn generate(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10)))
        .collect()
}
