use rand::Rng;

use crate::names;

/// Seconds since the unix epoch.
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Milliseconds since the unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// An opaque numeric token: the decimal form of a fresh 128-bit ULID.
pub fn new_token() -> String {
    ulid::Ulid::new().0.to_string()
}

/// Five random lowercase letters followed by three random digits, e.g. `qwert123`.
pub fn random_player_name() -> String {
    let mut rng = rand::thread_rng();
    let mut name: String = (0..names::PLAYER_NAME_LETTERS)
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect();
    name.extend((0..names::PLAYER_NAME_DIGITS).map(|_| rng.gen_range(b'0'..=b'9') as char));
    name
}
