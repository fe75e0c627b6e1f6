mod branch;
mod computed;

#[cfg(feature = "blake3")]
mod blake3;

use sha2::{Digest, Sha256, Sha512};

#[cfg(feature = "blake3")]
pub use self::blake3::Blake3;
pub use branch::encode_children;
pub use computed::ComputedNode;

impl Hasher for Sha256 {
    fn hash(&self, data: &[u8]) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().to_vec()
    }
}

impl Hasher for Sha512 {
    fn hash(&self, data: &[u8]) -> Vec<u8> {
        let mut hasher = Sha512::new();
        hasher.update(data);
        hasher.finalize().to_vec()
    }
}

pub type Sum = u64;

/// Hash function used to combine two children into their parent.
///
/// Every call must start from a fresh state: the tree calls `hash` once per
/// merge and never expects anything to carry over between calls. Keyed
/// functions keep their key in `self`.
///
/// No domain separation is added between leaves and internal nodes. Callers
/// who need it must bake it into their leaf hashes or into the hasher.
pub trait Hasher {
    fn hash(&self, data: &[u8]) -> Vec<u8>;
}

impl<H: Hasher + ?Sized> Hasher for &H {
    fn hash(&self, data: &[u8]) -> Vec<u8> {
        (**self).hash(data)
    }
}
