// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Name normalization and keyword matching.
//!
//! Ministries, bands and special events are identified by name rather than
//! by a stable key. Every comparison goes through [`normalize_name`], which
//! folds diacritics and case so that "Áudio", "audio" and "AUDIO" are the
//! same ministry.
//!
//! ## Known brittleness
//!
//! Renaming a ministry or band silently changes which pass it takes part
//! in. A missing "Bandas" ministry disables band-role filling entirely and a
//! missing derived ministry disables its pass; neither is reported as an
//! error.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Name of the ministry whose roles are filled from the rotated band.
pub const BAND_MINISTRY_NAME: &str = "Bandas";

/// Ministries filled by the generic derived-role pass, in processing order.
pub const DERIVED_MINISTRY_NAMES: [&str; 3] = ["Multimídia", "Áudio", "Iluminação"];

/// Keyword identifying the band reserved for special events.
pub const SPECIAL_BAND_KEYWORD: &str = "eleve";

/// Keywords that mark a celebration as a special event.
pub const SPECIAL_EVENT_KEYWORDS: [&str; 4] = ["eleve", "30 semanas", "30-semanas", "30semana"];

/// Folds diacritics and case.
///
/// The value is decomposed (NFD), combining marks are dropped, and the
/// result is lowercased and trimmed.
#[must_use]
pub fn normalize_name(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Returns whether two names are equal after normalization.
#[must_use]
pub fn names_match(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

/// Returns whether `name` is the band ministry.
#[must_use]
pub fn is_band_ministry_name(name: &str) -> bool {
    names_match(name, BAND_MINISTRY_NAME)
}

/// Returns the position of `name` in [`DERIVED_MINISTRY_NAMES`], if any.
#[must_use]
pub fn derived_ministry_rank(name: &str) -> Option<usize> {
    let normalized: String = normalize_name(name);
    DERIVED_MINISTRY_NAMES
        .iter()
        .position(|candidate| normalize_name(candidate) == normalized)
}

/// Returns whether a band name designates the special-event band.
#[must_use]
pub fn is_special_band_name(name: &str) -> bool {
    normalize_name(name).contains(SPECIAL_BAND_KEYWORD)
}

/// Returns whether any of the given texts mentions a special-event keyword.
#[must_use]
pub fn mentions_special_event(texts: &[Option<&str>]) -> bool {
    texts.iter().flatten().any(|text| {
        let normalized: String = normalize_name(text);
        SPECIAL_EVENT_KEYWORDS
            .iter()
            .any(|keyword| normalized.contains(keyword))
    })
}
