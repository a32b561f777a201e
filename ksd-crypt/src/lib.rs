//! Decryption of line-encrypted subtitle files.
//!
//! Each content line of an encrypted file is base64 encoded AES-128-CBC
//! ciphertext (pkcs7 padded). The file extension hints which of the three
//! [`KeyCandidate`]s was used, but the hint is not reliable, so a failed
//! attempt falls back through the remaining candidates in a fixed order.
//! A line that no candidate recovers is passed through unchanged and counted.
//!
//! Sequence numbers and timing lines are never touched.
//!
//! ```
//! let srt = "1\n00:00:01,000 --> 00:00:02,000\nHello\n";
//! let output = ksd_crypt::decrypt_text(srt, ".txt");
//!
//! assert!(!output.encrypted);
//! assert_eq!(output.text, srt);
//! ```

mod cascade;
mod decrypter;
mod error;
mod line;

pub use cascade::{CANDIDATES, KeyCandidate, cascade, decrypt, preferred, preferred_index};
pub use decrypter::{
    DecryptedText, Decrypter, LineOutcome, SAMPLE_LINES, decrypt_line, decrypt_text, is_encrypted,
};
pub use error::{AttemptError, Result};
pub use line::{LineKind, MIN_ENCRYPTED_LEN, classify, looks_encrypted};
