use sha2::{Digest, Sha256};

///
/// CodeHandle
///
/// Content address of an uploaded code blob (SHA-256 of its bytes). The same
/// bytes always produce the same handle.
///

#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CodeHandle(pub [u8; 32]);

super::impl_fixed_bytes!(CodeHandle, 32);

impl CodeHandle {
    /// Compute the handle the chain assigns to `bytes`.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_is_content_addressed() {
        assert_eq!(CodeHandle::of(b"pod"), CodeHandle::of(b"pod"));
        assert_ne!(CodeHandle::of(b"pod"), CodeHandle::of(b"cloud"));
    }
}
