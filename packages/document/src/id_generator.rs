use crc32fast::Hasher;

/// Derive a short, stable seed from a session id using CRC32
pub fn get_session_seed(session_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(session_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for component items within a session
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Session ID (CRC32)
    count: u32,   // Sequential counter
}

impl IdGenerator {
    pub fn new(session_id: &str) -> Self {
        Self {
            seed: get_session_seed(session_id),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID for a component of the given type
    pub fn new_id(&mut self, component_type: &str) -> String {
        self.count += 1;
        format!("{}-{}-{}", component_type, self.seed, self.count)
    }

    /// Get session ID seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("dropzone")
    }
}
