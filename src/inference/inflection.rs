//! Singular and plural forms of table names.
//!
//! Table names are usually nouns, sometimes plural (`books`) and sometimes
//! not (`book`). The `inflector` crate handles regular English; a short list
//! of irregular nouns common in schemas is checked first.

use inflector::Inflector;

/// `(singular, plural)` pairs the inflector gets wrong or misses.
static IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("status", "statuses"),
    ("address", "addresses"),
    ("analysis", "analyses"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("medium", "media"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
    ("leaf", "leaves"),
    ("half", "halves"),
];

/// Plural of a lower-case noun.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    match IRREGULAR.iter().find(|(s, p)| *s == word || *p == word) {
        Some((_, plural)) => plural.to_string(),
        None => word.to_plural(),
    }
}

/// Singular of a lower-case noun.
pub fn singularize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    match IRREGULAR.iter().find(|(s, p)| *s == word || *p == word) {
        Some((singular, _)) => singular.to_string(),
        None => word.to_singular(),
    }
}

/// The word, its plural and its singular, without duplicates.
pub fn name_variants(word: &str) -> Vec<String> {
    let mut variants = vec![word.to_string()];
    for variant in [pluralize(word), singularize(word)] {
        if !variant.is_empty() && !variants.contains(&variant) {
            variants.push(variant);
        }
    }
    variants
}
