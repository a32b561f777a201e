use aes::cipher::{BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use base64::Engine;
use ksd_crypt::{CANDIDATES, Decrypter, KeyCandidate, LineOutcome};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

const EXTENSIONS: [&str; 6] = [".txt", ".txt1", ".txt2", ".txt3", ".srt", ".vtt"];

const LINES: [&str; 4] = [
    "Hello there.",
    "I told you, we can't go back now!",
    "안녕하세요, 오랜만이에요.",
    "<i>[door creaks]</i>",
];

fn encrypt(candidate: &KeyCandidate, text: &str) -> String {
    let len = text.len();
    let mut buf = vec![0u8; (len / 16 + 1) * 16];
    buf[..len].copy_from_slice(text.as_bytes());

    let data = Aes128CbcEnc::new((&candidate.key).into(), (&candidate.iv).into())
        .encrypt_padded_mut::<Pkcs7>(&mut buf, len)
        .unwrap();
    base64::engine::general_purpose::STANDARD.encode(data)
}

#[test]
fn every_candidate_under_every_hint() {
    for candidate in &CANDIDATES {
        for text in LINES {
            let line = encrypt(candidate, text);

            for ext in EXTENSIONS {
                assert_eq!(
                    ksd_crypt::decrypt_line(&line, ext),
                    LineOutcome::Decrypted(text.to_owned()),
                    "candidate {:?} ext {}",
                    candidate.key,
                    ext
                );
            }
        }
    }
}

#[test]
fn hint_only_changes_first_attempt() {
    let line = encrypt(&CANDIDATES[1], "Where are you going?");

    // .txt hints candidate 2, so the first attempt succeeds
    assert_eq!(ksd_crypt::preferred(".txt"), &CANDIDATES[1]);
    assert_eq!(
        ksd_crypt::preferred(".txt").attempt(&line).as_deref(),
        Ok("Where are you going?")
    );

    // .txt1 hints candidate 1, which fails and falls back to candidate 2
    assert!(ksd_crypt::preferred(".txt1").attempt(&line).is_err());
    assert_eq!(
        ksd_crypt::decrypt(&line, ".txt1").as_deref(),
        Some("Where are you going?")
    );
}

#[test]
fn structural_lines_unchanged() {
    let lines = [
        "1",
        "42",
        "0000000000001234",
        "00:00:01,000 --> 00:00:03,200",
        "00:00:01.000 --> 00:00:03.200 align:start",
    ];

    for ext in EXTENSIONS {
        let mut decrypter = Decrypter::new(ext);

        for line in lines {
            assert_eq!(decrypter.decrypt(line), line);
        }

        assert_eq!(decrypter.unrecovered(), 0);
    }
}

fn encrypted_srt(candidate: &KeyCandidate) -> (String, String) {
    let mut plain = String::new();
    let mut encrypted = String::new();

    for (i, text) in LINES.iter().enumerate() {
        let header = format!("{}\n00:00:0{},000 --> 00:00:0{},500\n", i + 1, i, i);
        plain.push_str(&header);
        plain.push_str(text);
        plain.push_str("\n\n");
        encrypted.push_str(&header);
        encrypted.push_str(&encrypt(candidate, text));
        encrypted.push_str("\n\n");
    }

    (plain, encrypted)
}

#[test]
fn decrypts_whole_file() {
    let (plain, encrypted) = encrypted_srt(&CANDIDATES[2]);
    let output = ksd_crypt::decrypt_text(&encrypted, ".txt1");

    assert!(output.encrypted);
    assert_eq!(output.unrecovered, 0);
    assert_eq!(output.text, plain);
}

#[test]
fn decrypts_file_with_mixed_candidates() {
    let text = format!(
        "1\n00:00:01,000 --> 00:00:02,000\n{}\n{}\n",
        encrypt(&CANDIDATES[0], LINES[0]),
        encrypt(&CANDIDATES[1], LINES[1])
    );
    let output = ksd_crypt::decrypt_text(&text, ".txt2");

    assert_eq!(
        output.text,
        format!(
            "1\n00:00:01,000 --> 00:00:02,000\n{}\n{}\n",
            LINES[0], LINES[1]
        )
    );
}

#[test]
fn plaintext_file_is_idempotent() {
    let (plain, encrypted) = encrypted_srt(&CANDIDATES[0]);
    let first = ksd_crypt::decrypt_text(&encrypted, ".txt1");
    let second = ksd_crypt::decrypt_text(&first.text, ".txt1");

    assert!(!second.encrypted);
    assert_eq!(second.text, plain);
    assert_eq!(second.text, first.text);
}

#[test]
fn unrecovered_lines_pass_through() {
    let text = "1\n00:00:01,000 --> 00:00:02,000\nQUJDREVGR0hJSktMTU5PUA==\nQUJDREVGR0hJSktMTU5PUA==";
    let output = ksd_crypt::decrypt_text(text, ".txt");

    assert!(output.encrypted);
    assert_eq!(output.unrecovered, 2);
    assert_eq!(output.text, text);
}

#[test]
fn keeps_crlf_line_endings() {
    let (plain, encrypted) = encrypted_srt(&CANDIDATES[1]);
    let output = ksd_crypt::decrypt_text(&encrypted.replace('\n', "\r\n"), ".txt");

    assert!(output.encrypted);
    assert_eq!(output.text, plain.replace('\n', "\r\n"));
}
