//! Product-name normalization for matching and prefix search.
//!
//! Policy:
//! - Unicode-aware lowercasing.
//! - NFD decomposition, then drop non-spacing combining marks so accented
//!   Latin letters collapse to their base letter.
//! - `ñ` maps to `n`.
//! - Whitespace runs (and literal `+`) become a single `+` separator, with
//!   no leading or trailing separator.
//!
//! The output is the matching key stored in `products.normalized_name`;
//! keep this logic single-sourced so the matcher and the store never drift.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a free-text product name into a `+`-joined token string.
///
/// Pure and total: never fails, never consults the process locale, and is
/// idempotent on already-normalized input.
/// `"Café Ñoño  Pro"` → `"cafe+nono+pro"`.
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;

    for ch in name.nfd() {
        if is_combining_mark(ch) {
            continue;
        }
        for lc in ch.to_lowercase() {
            let lc = if lc == 'ñ' { 'n' } else { lc };
            if lc.is_whitespace() || lc == '+' {
                pending_sep = true;
            } else {
                if pending_sep && !out.is_empty() {
                    out.push('+');
                }
                pending_sep = false;
                out.push(lc);
            }
        }
    }

    out
}
