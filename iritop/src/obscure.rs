//! Address obscuring, for screenshots and screen sharing.
//!
//! Letters and digits after the first `:` are replaced with others of the
//! same class. The replacement depends only on the salt, the address and the
//! character position, so a masked address stays stable from frame to frame.

use std::collections::hash_map::{DefaultHasher, RandomState};
use std::hash::{BuildHasher, Hash, Hasher};

/// A salt that differs between runs of the program.
pub fn session_salt() -> u64 {
    RandomState::new().hash_one(std::process::id())
}

pub fn obscure_address(address: &str, salt: u64) -> String {
    let keep = address.find(':').unwrap_or(0);
    let (head, tail) = address.split_at(keep);

    let mut out = String::with_capacity(address.len());
    out.push_str(head);
    for (i, c) in tail.chars().enumerate() {
        let mut hasher = DefaultHasher::new();
        (salt, address, i).hash(&mut hasher);
        out.push(scramble(c, hasher.finish()));
    }
    out
}

fn scramble(c: char, entropy: u64) -> char {
    let (base, span) = match c {
        'A'..='Z' => (b'A', 26),
        'a'..='z' => (b'a', 26),
        '0'..='9' => (b'0', 10),
        _ => return c,
    };
    char::from(base + (entropy % span) as u8)
}
