/// Lines shorter than this (after trimming) are never treated as ciphertext.
pub const MIN_ENCRYPTED_LEN: usize = 10;

/// How a subtitle line is treated by the decrypter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// Sequence counter or timing range, always passed through.
    Structural,
    Content,
}

pub fn classify(line: &str) -> LineKind {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        LineKind::Blank
    } else if trimmed.bytes().all(|x| x.is_ascii_digit()) || trimmed.contains("-->") {
        LineKind::Structural
    } else {
        LineKind::Content
    }
}

/// Whether a content line looks like base64 ciphertext.
///
/// Short plaintext made only of base64-safe characters (`HelloWorld2024`)
/// also matches. Such lines fail every candidate and are passed through.
pub fn looks_encrypted(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() > MIN_ENCRYPTED_LEN && trimmed.bytes().all(is_base64_byte)
}

fn is_base64_byte(x: u8) -> bool {
    x.is_ascii_alphanumeric() || matches!(x, b'+' | b'/' | b'=')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(""), LineKind::Blank);
        assert_eq!(classify("   \r"), LineKind::Blank);
        assert_eq!(classify("12"), LineKind::Structural);
        assert_eq!(classify("123456789012345"), LineKind::Structural);
        assert_eq!(
            classify("00:00:01,000 --> 00:00:02,500"),
            LineKind::Structural
        );
        assert_eq!(classify("Hello there"), LineKind::Content);
        assert_eq!(classify("1."), LineKind::Content);
    }

    #[test]
    fn test_looks_encrypted() {
        assert!(looks_encrypted("pUh0DYEA7DnsnsMyB3N8Lg=="));
        assert!(looks_encrypted("  pUh0DYEA7DnsnsMyB3N8Lg==\r\n"));
        assert!(!looks_encrypted("short=="));
        assert!(!looks_encrypted("Hello there, friend"));
        assert!(!looks_encrypted("안녕하세요안녕하세요안녕하세요"));
        // tolerated false positive
        assert!(looks_encrypted("HelloWorld2024"));
    }
}
