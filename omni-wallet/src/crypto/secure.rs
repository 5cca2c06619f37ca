//! Secret byte buffers with a wipe-on-release contract

use std::fmt;

use zeroize::Zeroize;

/// An owned byte buffer that is zero-filled before its memory is released.
///
/// Every component that holds secret material stores it in a `SecureBytes`.
/// The buffer is wiped with a deterministic zero-fill both by [`wipe`] and
/// when the value is dropped, so erasure is exactly testable rather than
/// probabilistic. Values are only moved or explicitly cloned, never copied
/// implicitly.
///
/// [`wipe`]: SecureBytes::wipe
pub struct SecureBytes {
    bytes: Vec<u8>,
}

impl SecureBytes {
    /// Take ownership of `bytes`; the buffer will be wiped on release.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Copy `bytes` into a new owned buffer.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Get the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the buffer length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Overwrite every byte with zero without releasing the buffer.
    ///
    /// The same fill runs on drop; calling it earlier lets an owner release
    /// key material at a chosen point in its lifetime.
    pub fn wipe(&mut self) {
        self.bytes.as_mut_slice().zeroize();
    }
}

impl Clone for SecureBytes {
    /// Explicit deep copy; the clone owns and wipes its own buffer.
    fn clone(&self) -> Self {
        Self::from_slice(&self.bytes)
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        self.bytes.as_mut_slice().zeroize();
    }
}

impl fmt::Debug for SecureBytes {
    /// Never prints the contents.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureBytes({} bytes)", self.bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wipe_zero_fills_every_byte() {
        let mut secret = SecureBytes::from_slice(&[0xabu8; 32]);
        secret.wipe();

        assert_eq!(secret.len(), 32);
        assert!(secret.as_slice().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = SecureBytes::from_slice(&[0x11u8; 16]);
        let copy = original.clone();
        original.wipe();

        assert!(original.as_slice().iter().all(|b| *b == 0));
        assert_eq!(copy.as_slice(), &[0x11u8; 16]);
    }

    #[test]
    fn test_debug_redacts_contents() {
        let secret = SecureBytes::from_slice(&[0x42u8; 8]);
        assert_eq!(format!("{:?}", secret), "SecureBytes(8 bytes)");
    }
}
