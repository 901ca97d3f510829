//! URL slug derivation and uniqueness suffixing.

use crate::errors::AppError;

/// Width of the `slideshows.slug` column.
pub const MAX_SLUG_LEN: usize = 30;

/// Lowercase ASCII slug: Latin diacritics are folded, everything else that is
/// not a letter or digit collapses into single `-` separators.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_sep = false;

    for ch in title.chars() {
        let mut buf = [0u8; 4];
        let folded: &str = if ch.is_ascii_alphanumeric() {
            ch.encode_utf8(&mut buf)
        } else {
            fold(ch)
        };
        if folded.is_empty() {
            pending_sep = !slug.is_empty();
            continue;
        }
        for c in folded.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_sep {
                    slug.push('-');
                    pending_sep = false;
                }
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_sep = !slug.is_empty();
            }
        }
    }

    truncate(&slug, MAX_SLUG_LEN)
}

/// The slug to try on `attempt`: the base itself first, then `base-1`, `base-2`, …
pub fn candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        return truncate(base, MAX_SLUG_LEN);
    }
    let suffix = format!("-{attempt}");
    let stem = truncate(base, MAX_SLUG_LEN.saturating_sub(suffix.len()));
    format!("{stem}{suffix}")
}

/// First candidate for `base` that `is_taken` rejects.
pub fn allocate(base: &str, is_taken: impl Fn(&str) -> bool) -> String {
    (0..)
        .map(|attempt| candidate(base, attempt))
        .find(|slug| !is_taken(slug))
        .unwrap_or_else(|| base.to_string())
}

/// Prefix shared by every candidate of `base` up to `base-9999`, used to
/// fetch the already-taken slugs in one query.
pub fn shared_prefix(base: &str) -> &str {
    let keep = MAX_SLUG_LEN - "-9999".len();
    if base.len() > keep { &base[..keep] } else { base }
}

/// Base slug for a new slideshow title, rejecting titles with nothing sluggable.
pub fn base_slug(title: &str) -> Result<String, AppError> {
    let base = slugify(title);
    if base.is_empty() {
        return Err(AppError::Validation(
            "Title must contain at least one Latin letter or digit to build the page address".to_string(),
        ));
    }
    Ok(base)
}

// Cut at a char boundary (slugs are ASCII) and drop a dangling separator.
fn truncate(slug: &str, max: usize) -> String {
    let cut = if slug.len() > max { &slug[..max] } else { slug };
    cut.trim_end_matches('-').to_string()
}

// Latin letters with diacritics map to their ASCII base; other scripts vanish.
fn fold(ch: char) -> &'static str {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => "a",
        'æ' | 'Æ' => "ae",
        'ç' | 'ć' | 'č' | 'Ç' | 'Ć' | 'Č' => "c",
        'ď' | 'đ' | 'Ď' | 'Đ' | 'ð' | 'Ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ė' | 'Ę' | 'Ě' => "e",
        'ğ' | 'Ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' | 'Į' | 'İ' => "i",
        'ł' | 'Ł' => "l",
        'ñ' | 'ń' | 'ň' | 'Ñ' | 'Ń' | 'Ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ő' => "o",
        'œ' | 'Œ' => "oe",
        'ř' | 'Ř' => "r",
        'ś' | 'š' | 'ş' | 'Ś' | 'Š' | 'Ş' => "s",
        'ß' => "ss",
        'ť' | 'ţ' | 'Ť' | 'Ţ' => "t",
        'þ' | 'Þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' | 'Ů' | 'Ű' | 'Ų' => "u",
        'ý' | 'ÿ' | 'Ý' | 'Ÿ' => "y",
        'ź' | 'ż' | 'ž' | 'Ź' | 'Ż' | 'Ž' => "z",
        c if c.is_ascii() => "-",
        _ => "",
    }
}
