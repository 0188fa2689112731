//! Output naming: contact name → unique, filesystem-safe basename.
//!
//! The set of names already taken is owned by the caller and passed in, so
//! resolution is a pure function of its arguments. The batch driver seeds the
//! set with names already present in the output directory, which makes
//! duplicate contacts and leftover files follow the same suffix rule.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Basename used when neither the name nor the fallback yields a slug.
pub const PLACEHOLDER_NAME: &str = "card";

static RE_DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_\s]+").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static RE_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").unwrap());

/// Normalise `value` to `[a-z0-9_]*`.
///
/// Lowercases, drops every other character, turns whitespace runs into a
/// single `_`, collapses repeated `_` and trims `_` from both ends.
pub fn slugify(value: &str) -> String {
    let lower = value.to_lowercase();
    let kept = RE_DISALLOWED.replace_all(&lower, "");
    let joined = RE_WHITESPACE.replace_all(kept.trim(), "_");
    let collapsed = RE_UNDERSCORES.replace_all(&joined, "_");
    collapsed.trim_matches('_').to_string()
}

/// Pick a basename for a card and reserve it in `taken`.
///
/// The slug of `name` is used when non-empty, else the slug of `fallback`
/// (the input file stem), else [`PLACEHOLDER_NAME`]. A slug already in
/// `taken` gets `-2`, `-3`, … using the smallest free suffix.
pub fn resolve_output_name(name: &str, fallback: &str, taken: &mut HashSet<String>) -> String {
    let base = [slugify(name), slugify(fallback)]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());

    let chosen = if taken.contains(&base) {
        (2u64..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_else(|| base.clone())
    } else {
        base
    };

    taken.insert(chosen.clone());
    chosen
}
