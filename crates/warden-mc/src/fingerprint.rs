//! State fingerprints and the identity hasher for fingerprint-keyed maps.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A fingerprint is a 64-bit hash identifying a state.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Digest a state through the general-purpose hash.
    ///
    /// `AHasher::default()` uses fixed keys, so equal values fingerprint
    /// identically across runs of the same build. Collisions are possible
    /// but negligible for state spaces up to ~10^8; the store reports any
    /// it happens to observe.
    pub fn of<T: Hash + ?Sized>(value: &T) -> Self {
        let mut hasher = ahash::AHasher::default();
        value.hash(&mut hasher);
        Fingerprint(hasher.finish())
    }

    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn from_u64(v: u64) -> Self {
        Fingerprint(v)
    }
}

impl Hash for Fingerprint {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0);
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:016x})", self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Identity hasher for Fingerprint: the value IS already a hash,
/// so we just pass it through without re-hashing.
#[derive(Default)]
pub struct FingerprintHasher(u64);

impl Hasher for FingerprintHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        // Shouldn't be called for Fingerprint, but handle gracefully
        for &b in bytes {
            self.0 = self.0.wrapping_mul(31).wrapping_add(b as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }
}

/// BuildHasher that produces FingerprintHasher instances.
#[derive(Default, Clone)]
pub struct FingerprintBuildHasher;

impl std::hash::BuildHasher for FingerprintBuildHasher {
    type Hasher = FingerprintHasher;

    #[inline]
    fn build_hasher(&self) -> FingerprintHasher {
        FingerprintHasher(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_equal_values_equal_fingerprints() {
        assert_eq!(Fingerprint::of(&(1u8, 2u8)), Fingerprint::of(&(1u8, 2u8)));
        assert_ne!(Fingerprint::of(&(1u8, 2u8)), Fingerprint::of(&(1u8, 3u8)));
    }

    #[test]
    fn test_display_is_hex() {
        let fp = Fingerprint::from_u64(0xab);
        assert_eq!(fp.to_string(), "00000000000000ab");
    }

    #[test]
    fn test_identity_hasher_passthrough() {
        let mut map: HashMap<Fingerprint, u32, FingerprintBuildHasher> = HashMap::default();
        let fp = Fingerprint::of(&42u64);
        map.insert(fp, 7);
        assert_eq!(map.get(&fp), Some(&7));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_roundtrip_u64() {
        let fp = Fingerprint::from_u64(0xdead_beef_cafe_f00d);
        assert_eq!(Fingerprint::from_u64(fp.as_u64()), fp);
    }
}
