/// Lithuanian letters that are dropped from identifiers, as inclusive ranges.
///
/// Letters are removed outright rather than folded to their base letter; ids
/// already persisted depend on this. Note that `Ž` (U+017D) is not in the set
/// while `ž` is, so uppercase `Ž` survives as `ž` after lowercasing.
const STRIPPED_RANGES: [(char, char); 8] = [
    ('\u{0104}', '\u{0105}'),
    ('\u{010C}', '\u{010D}'),
    ('\u{0116}', '\u{0119}'),
    ('\u{012E}', '\u{012F}'),
    ('\u{0160}', '\u{0161}'),
    ('\u{016A}', '\u{016B}'),
    ('\u{0172}', '\u{0173}'),
    ('\u{017E}', '\u{017F}'),
];

fn is_stripped(ch: char) -> bool {
    ch == ' '
        || STRIPPED_RANGES
            .iter()
            .any(|&(lo, hi)| (lo..=hi).contains(&ch))
}

/// Maps a display name to its identifier: spaces and the designated accented
/// letters removed, remainder lowercased.
///
/// Apply once, at record creation. The result is not guaranteed to be stable
/// under a second application.
pub fn normalize(name: &str) -> String {
    let kept: String = name.chars().filter(|&ch| !is_stripped(ch)).collect();
    kept.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn strips_accents_and_spaces() {
        assert_eq!(normalize("Šis Yra Pavadinimas"), "isyrapavadinimas");
        assert_eq!(normalize("Ąžuolas ėglė"), "uolasgl");
    }

    #[test]
    fn only_ascii_space_is_removed() {
        assert_eq!(normalize("a\tb"), "a\tb");
        assert_eq!(normalize("  Vilnius  "), "vilnius");
    }

    #[test]
    fn stable_on_plain_input() {
        let once = normalize("Kernave Mounds");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn uppercase_z_caron_is_not_stripped() {
        let once = normalize("Žalgiris");
        assert_eq!(once, "žalgiris");
        assert_eq!(normalize(&once), "algiris");
    }

    #[test]
    fn empty_name_gives_empty_id() {
        assert_eq!(normalize(""), "");
    }
}
