use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Accent-stripped lowercase key for ordering country names.
/// Only ever used to compare; two names with equal keys stay distinct.
pub fn sort_key(name: &str) -> String {
    name.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Sort display names by key, breaking ties on the original text.
pub fn sort_countries<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| {
        let (a, b) = (a.as_ref(), b.as_ref());
        sort_key(a).cmp(&sort_key(b)).then_with(|| a.cmp(b))
    });
}
