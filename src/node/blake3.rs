use super::Hasher;

/// BLAKE3 hasher, optionally keyed.
#[derive(Clone, Debug, Default)]
pub struct Blake3 {
    key: Option<[u8; 32]>,
}

impl Blake3 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyed(key: [u8; 32]) -> Self {
        Self { key: Some(key) }
    }
}

impl Hasher for Blake3 {
    fn hash(&self, data: &[u8]) -> Vec<u8> {
        let mut hasher = match &self.key {
            Some(key) => blake3::Hasher::new_keyed(key),
            None => blake3::Hasher::new(),
        };
        hasher.update(data);
        hasher.finalize().as_bytes().to_vec()
    }
}
