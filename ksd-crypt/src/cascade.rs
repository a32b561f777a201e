use crate::error::{AttemptError, Result};
use aes::cipher::{BlockDecryptMut, KeyIvInit, block_padding::Pkcs7};
use base64::Engine;

type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// An AES-128-CBC key and initialization vector pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyCandidate {
    pub key: [u8; 16],
    pub iv: [u8; 16],
}

/// All key candidates in their fixed fallback order.
pub const CANDIDATES: [KeyCandidate; 3] = [
    KeyCandidate {
        key: *b"AmSmZVcH93UQUezi",
        iv: *b"ReBKWW8cqdjPEnF6",
    },
    KeyCandidate {
        key: *b"8056483646328763",
        iv: *b"6852612370185273",
    },
    KeyCandidate {
        key: *b"sWODXX04QRTkHdlZ",
        iv: *b"8pwhapJeC4hrS9hO",
    },
];

impl KeyCandidate {
    /// Decode, decrypt and unpad one base64 encoded line.
    pub fn attempt(&self, line: &str) -> Result<String> {
        let mut data = base64::engine::general_purpose::STANDARD
            .decode(line.trim())
            .map_err(|x| AttemptError::Base64(x.to_string()))?;

        let plain = Aes128CbcDec::new((&self.key).into(), (&self.iv).into())
            .decrypt_padded_mut::<Pkcs7>(&mut data)
            .map_err(|_| AttemptError::Padding)?;

        String::from_utf8(plain.to_vec()).map_err(|_| AttemptError::Utf8)
    }
}

/// Index into [`CANDIDATES`] hinted by a file extension.
///
/// The extension may be given with or without its leading dot.
pub fn preferred_index(ext: &str) -> usize {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();

    match ext.as_str() {
        "txt" => 1,
        "txt1" => 0,
        // txt2, txt3 and anything unknown
        _ => 2,
    }
}

/// Key candidate hinted by a file extension.
pub fn preferred(ext: &str) -> &'static KeyCandidate {
    &CANDIDATES[preferred_index(ext)]
}

/// Candidates in the order they should be tried for `ext`.
///
/// The hinted candidate comes first, followed by the others in their global
/// order. No candidate is yielded twice.
pub fn cascade(ext: &str) -> impl Iterator<Item = &'static KeyCandidate> {
    let first = preferred_index(ext);

    std::iter::once(&CANDIDATES[first]).chain(
        CANDIDATES
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != first)
            .map(|(_, x)| x),
    )
}

/// Try every candidate for `ext` in cascade order, returning the first success.
pub fn decrypt(line: &str, ext: &str) -> Option<String> {
    cascade(ext).find_map(|candidate| candidate.attempt(line).ok())
}
