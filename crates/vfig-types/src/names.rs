//! Name transforms applied before a catalog name is used as a directory
//! segment or stored as a figure name.
//!
//! Every transform is total and works on `char`s, never on bytes:
//! - [`strip_trailing_dots`] drops trailing `.` (not allowed on NTFS)
//! - [`strip_accents`] decomposes and keeps only ASCII
//! - [`remove_soft_characters`] drops space, `-`, `.` and `'`
//! - [`truncate`] hard-cuts to `n` characters

use unicode_normalization::UnicodeNormalization;

/// Maximum length of a figure name, in characters.
pub const NAME_MAX_LENGTH: usize = 10;

/// Characters that carry little meaning in a figure name and are dropped
/// first when squeezing a long name into [`NAME_MAX_LENGTH`].
const SOFT_CHARS: &[char] = &[' ', '-', '.', '\''];

/// Remove every trailing `.`.
pub fn strip_trailing_dots(s: &str) -> String {
    s.trim_end_matches('.').to_string()
}

/// Decompose to NFD and keep only ASCII characters, so `é` becomes `e` and
/// characters with no ASCII base are dropped.
pub fn strip_accents(s: &str) -> String {
    s.nfd().filter(char::is_ascii).collect()
}

/// Remove space, hyphen, period and apostrophe.
pub fn remove_soft_characters(s: &str) -> String {
    s.chars().filter(|c| !SOFT_CHARS.contains(c)).collect()
}

/// Keep at most `n` characters. No ellipsis.
pub fn truncate(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Make a user-chosen name safe to use as one directory segment.
///
/// Dropping non-ASCII characters can expose dots that were not trailing
/// before (`"a.日"`), so trailing dots are stripped on both sides.
pub fn sanitize_for_filesystem(s: &str) -> String {
    strip_trailing_dots(&strip_accents(&strip_trailing_dots(s)))
}

/// Derive a figure name that fits [`NAME_MAX_LENGTH`] from a catalog
/// display name, for names chosen without user input.
pub fn derive_short_name(s: &str) -> String {
    truncate(&remove_soft_characters(s), NAME_MAX_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn trailing_dots_only() {
        assert_eq!(strip_trailing_dots("Mr. Game & Watch..."), "Mr. Game & Watch");
        assert_eq!(strip_trailing_dots("..."), "");
        assert_eq!(strip_trailing_dots("a.b"), "a.b");
    }

    #[test]
    fn accents_are_stripped() {
        assert_eq!(strip_accents("Pokémon"), "Pokemon");
        assert_eq!(strip_accents("Ça ira"), "Ca ira");
        assert_eq!(strip_accents("マリオ"), "");
    }

    #[test]
    fn soft_characters_are_removed() {
        assert_eq!(remove_soft_characters("Bowser Jr."), "BowserJr");
        assert_eq!(remove_soft_characters("King K. Rool"), "KingKRool");
        assert_eq!(remove_soft_characters("Mii's - Gunner"), "MiisGunner");
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ab", 3), "ab");
        assert_eq!(truncate("ééé", 2), "éé");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn short_name_examples() {
        assert_eq!(derive_short_name("Mario"), "Mario");
        assert_eq!(derive_short_name("Bowser Jr."), "BowserJr");
        assert_eq!(derive_short_name("Mr. Game & Watch"), "MrGame&Wat");
        assert_eq!(derive_short_name("Toon Link - The Wind Waker"), "ToonLinkTh");
    }

    #[test]
    fn filesystem_examples() {
        assert_eq!(sanitize_for_filesystem("Pokémon Trainer."), "Pokemon Trainer");
        assert_eq!(sanitize_for_filesystem("a.日"), "a");
        assert_eq!(sanitize_for_filesystem("Isabelle"), "Isabelle");
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(s in any::<String>()) {
            let once = sanitize_for_filesystem(&s);
            prop_assert_eq!(sanitize_for_filesystem(&once), once);
        }

        #[test]
        fn sanitize_yields_ascii_without_trailing_dot(s in any::<String>()) {
            let out = sanitize_for_filesystem(&s);
            prop_assert!(out.is_ascii());
            prop_assert!(!out.ends_with('.'));
        }

        #[test]
        fn short_name_fits(s in any::<String>()) {
            prop_assert!(derive_short_name(&s).chars().count() <= NAME_MAX_LENGTH);
        }
    }
}
