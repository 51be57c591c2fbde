use std::sync::OnceLock;

use regex::Regex;

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is a valid regex")
    })
}

/// Derive a URL slug from a title.
///
/// Lower-cases ASCII letters, folds accented Latin letters to their ASCII
/// base ("Café" becomes "cafe"), keeps ASCII digits, turns whitespace, `-`
/// and `_` into a single `-`, and drops everything else. The result may be
/// empty when the title has no Latin letters or digits at all.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    let mut buf = [0u8; 4];
    for c in title.chars().flat_map(char::to_lowercase) {
        let folded = if c.is_ascii_alphanumeric() {
            Some(&*c.encode_utf8(&mut buf))
        } else {
            fold_latin(c)
        };

        match folded {
            Some(text) => {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push_str(text);
            }
            None if c.is_whitespace() || c == '-' || c == '_' => pending_dash = true,
            None => {}
        }
    }

    slug
}

/// ASCII spelling of a lower-case Latin letter with diacritics.
fn fold_latin(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}

/// Lower-case ASCII alphanumerics separated by single dashes.
pub fn is_valid_slug(slug: &str) -> bool {
    slug_pattern().is_match(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("  Rust  --  Notes__2024 "), "rust-notes-2024");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("C++ Guide"), "c-guide");
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("what's new?"), "whats-new");
    }

    #[test]
    fn test_slugify_folds_accented_latin() {
        assert_eq!(slugify("Café Crème"), "cafe-creme");
        assert_eq!(slugify("Straße"), "strasse");
        assert_eq!(slugify("Łódź Ærø"), "lodz-aero");
        assert_eq!(slugify("ÉCOLE"), "ecole");
        assert!(is_valid_slug(&slugify("Ça va? Über 50°")));
    }

    #[test]
    fn test_slugify_non_ascii() {
        assert_eq!(slugify("Ծրագրավորում"), "");
        assert_eq!(slugify("Ծրագրեր 2024"), "2024");
    }

    #[test]
    fn test_slugify_output_is_valid() {
        for title in ["A  B", "-lead", "trail-", "x_y", "Mixed CASE 42"] {
            assert!(is_valid_slug(&slugify(title)), "{}", title);
        }
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("intro"));
        assert!(is_valid_slug("part-2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Intro"));
        assert!(!is_valid_slug("a--b"));
        assert!(!is_valid_slug("-a"));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug("a b"));
    }
}
