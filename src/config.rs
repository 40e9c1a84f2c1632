use crate::field::Modulus;

/// Reserved batch key holding the quorum record.
pub const DEFAULT_QUORUM_KEY: &str = "keys";

/// Parameters shared by ingestion and recovery of every batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Prime defining the working field.
    pub modulus: Modulus,
    /// Top-level key of the quorum record; never treated as a share label.
    pub quorum_key: String,
}

impl Config {
    pub fn new(modulus: Modulus, quorum_key: impl Into<String>) -> Self {
        Self {
            modulus,
            quorum_key: quorum_key.into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Modulus::DEFAULT, DEFAULT_QUORUM_KEY)
    }
}
