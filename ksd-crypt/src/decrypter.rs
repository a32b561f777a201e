use crate::{
    cascade,
    line::{self, LineKind},
};
use std::borrow::Cow;

/// Number of content lines sampled to decide if a file is encrypted.
pub const SAMPLE_LINES: usize = 10;

/// Result of running a single line through the cascade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank, structural or plaintext content line.
    Passthrough,
    Decrypted(String),
    /// Looked encrypted but no candidate recovered it.
    Unrecovered,
}

pub fn decrypt_line(line: &str, ext: &str) -> LineOutcome {
    match line::classify(line) {
        LineKind::Blank | LineKind::Structural => LineOutcome::Passthrough,
        LineKind::Content if !line::looks_encrypted(line) => LineOutcome::Passthrough,
        LineKind::Content => match cascade::decrypt(line, ext) {
            Some(x) => LineOutcome::Decrypted(x),
            None => LineOutcome::Unrecovered,
        },
    }
}

/// Per-file line decrypter which keeps count of unrecovered lines.
#[derive(Debug)]
pub struct Decrypter {
    ext: String,
    unrecovered: usize,
}

impl Decrypter {
    pub fn new(ext: &str) -> Self {
        Self {
            ext: ext.to_owned(),
            unrecovered: 0,
        }
    }

    /// Decrypt one line. Lines that can't be recovered are returned unchanged.
    pub fn decrypt<'a>(&mut self, line: &'a str) -> Cow<'a, str> {
        match decrypt_line(line, &self.ext) {
            LineOutcome::Passthrough => Cow::Borrowed(line),
            LineOutcome::Decrypted(x) => Cow::Owned(x),
            LineOutcome::Unrecovered => {
                self.unrecovered += 1;
                Cow::Borrowed(line)
            }
        }
    }

    pub fn unrecovered(&self) -> usize {
        self.unrecovered
    }
}

/// Decrypted file contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecryptedText {
    pub text: String,
    /// False when the input was judged to be plaintext and copied as is.
    pub encrypted: bool,
    pub unrecovered: usize,
}

/// Sample the first [`SAMPLE_LINES`] content lines and report whether at least
/// half of them look encrypted.
pub fn is_encrypted(text: &str) -> bool {
    let mut sampled = 0;
    let mut encrypted = 0;

    for line in text
        .lines()
        .filter(|x| line::classify(x) == LineKind::Content)
        .take(SAMPLE_LINES)
    {
        sampled += 1;

        if line::looks_encrypted(line) {
            encrypted += 1;
        }
    }

    sampled > 0 && encrypted * 2 >= sampled
}

/// Decrypt a whole subtitle file.
///
/// Plaintext input is returned byte for byte. Otherwise every line goes
/// through [`Decrypter::decrypt`] and is written back with its original
/// terminator (`\n`, `\r\n` or none for the last line).
pub fn decrypt_text(text: &str, ext: &str) -> DecryptedText {
    if !is_encrypted(text) {
        return DecryptedText {
            text: text.to_owned(),
            encrypted: false,
            unrecovered: 0,
        };
    }

    let mut decrypter = Decrypter::new(ext);
    let mut output = String::with_capacity(text.len());

    for chunk in text.split_inclusive('\n') {
        let (line, terminator) = split_terminator(chunk);
        output.push_str(&decrypter.decrypt(line));
        output.push_str(terminator);
    }

    DecryptedText {
        text: output,
        encrypted: true,
        unrecovered: decrypter.unrecovered(),
    }
}

fn split_terminator(chunk: &str) -> (&str, &str) {
    if let Some(line) = chunk.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = chunk.strip_suffix('\n') {
        (line, "\n")
    } else {
        (chunk, "")
    }
}
