// OAEP Labels
// Versioned context labels bound into every ciphertext

/// Label written by the current format version.
pub const LABEL_V1: &[u8] = b"Encoded by rsa-files(v1) RSA";

/// Every label this build knows how to decrypt, newest first.
pub const KNOWN_LABELS: &[&[u8]] = &[LABEL_V1];

/// Which label encryption binds, and which labels decryption accepts.
///
/// Decryption tries `current` first, then each accepted label in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelPolicy {
    current: Vec<u8>,
    accepted: Vec<Vec<u8>>,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self::with_current(LABEL_V1)
    }
}

impl LabelPolicy {
    /// Encrypt under `label`, still accepting every known label on decrypt.
    pub fn with_current(label: impl Into<Vec<u8>>) -> Self {
        Self {
            current: label.into(),
            accepted: KNOWN_LABELS.iter().map(|l| l.to_vec()).collect(),
        }
    }

    /// Encrypt and decrypt under `label` only.
    pub fn strict(label: impl Into<Vec<u8>>) -> Self {
        Self {
            current: label.into(),
            accepted: Vec::new(),
        }
    }

    /// Also accept `label` when decrypting.
    pub fn accept(mut self, label: impl Into<Vec<u8>>) -> Self {
        self.accepted.push(label.into());
        self
    }

    pub fn current(&self) -> &[u8] {
        &self.current
    }

    /// Labels to try on decrypt, without duplicates.
    pub fn decrypt_labels(&self) -> impl Iterator<Item = &[u8]> {
        let mut seen: Vec<&[u8]> = Vec::with_capacity(self.accepted.len() + 1);
        std::iter::once(self.current.as_slice())
            .chain(self.accepted.iter().map(Vec::as_slice))
            .filter(move |label| {
                if seen.contains(label) {
                    false
                } else {
                    seen.push(*label);
                    true
                }
            })
    }
}
