use regex::Regex;
use std::{collections::BTreeSet, sync::LazyLock};

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).unwrap());
static NON_SLUG_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());
static LIST_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,.|\s]+").unwrap());

/// Replace characters which are not allowed in file names with `-`.
pub fn sanitize(name: &str) -> String {
    UNSAFE_FILENAME_CHARS.replace_all(name, "-").into_owned()
}

/// Title as used inside watch page urls. The site ignores this segment, so
/// titles without any ascii alphanumerics fall back to `a`.
pub fn slug(title: &str) -> String {
    let slug = NON_SLUG_CHARS.replace_all(title, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        "a".to_owned()
    } else {
        slug.to_owned()
    }
}

/// Split `en,hi` / `en.hi` / `en hi` style lists.
pub fn split_list(s: &str) -> Vec<String> {
    LIST_SEPARATORS
        .split(s.trim())
        .filter(|x| !x.is_empty())
        .map(|x| x.to_owned())
        .collect()
}

/// Parse episode numbers like `1,2 5`.
pub fn parse_episodes(s: &str) -> Result<BTreeSet<u32>, String> {
    s.split(|x: char| x == ',' || x.is_whitespace())
        .filter(|x| !x.is_empty())
        .map(|x| {
            x.parse::<u32>()
                .map_err(|_| format!("{} is not a valid episode number.", x))
        })
        .collect()
}
