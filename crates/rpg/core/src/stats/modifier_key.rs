//! Stable identities for modifiers written into the host's attribute model.
//!
//! The host keeps attribute modifiers in a list keyed by identity. Recomputing
//! stats must replace the previous modifier rather than stack a new one, so
//! the key is derived deterministically from the actor and the modifier kind.

use std::fmt;

use sha2::{Digest, Sha256};

/// Host-side modifier the core owns per actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    MovementSpeed,
}

impl ModifierKind {
    const fn tag(self) -> &'static [u8] {
        match self {
            Self::MovementSpeed => b"rpg:movement_speed",
        }
    }
}

/// 128-bit key = first 16 bytes of SHA-256(actor ‖ kind tag).
///
/// Same inputs always give the same key, across restarts and processes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModifierKey([u8; 16]);

impl ModifierKey {
    pub fn derive(actor: crate::ActorId, kind: ModifierKind) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(actor.to_le_bytes());
        hasher.update(kind.tag());
        let digest = hasher.finalize();

        let mut key = [0u8; 16];
        key.copy_from_slice(&digest[..16]);
        Self(key)
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ModifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModifierKey({self})")
    }
}
