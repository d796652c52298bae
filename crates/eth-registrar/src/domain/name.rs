//! # Name Normalization
//!
//! Canonicalization of user-supplied name labels before hashing.
//!
//! Two names that normalize identically always hash identically, so every
//! code path that derives a hash or checks a length goes through
//! [`normalize`] first. The mapping is the registrar's own fixed table of
//! visually-confusable characters; it is deliberately more stringent than
//! full nameprep.

use crate::errors::RegistrarError;

// Confusable characters folded to their canonical ASCII form.
const CONFUSABLE_A: &str = "áăǎâäȧạȁàảȃāąᶏẚåḁⱥã";
const CONFUSABLE_E: &str = "èéêëēěĕȅȩḙėẹẻęẽ";
const CONFUSABLE_I: &str = "íĭǐîïịȉìỉȋīįᶖɨĩḭ";
const CONFUSABLE_O: &str = "óŏǒôöȯọőȍòỏơȏꝋꝍⱺōǫøõ";
const CONFUSABLE_U: &str = "úŭǔûṷüṳụűȕùủưȗūųᶙůũṵ";
const CONFUSABLE_C: &str = "çćčĉċ";
const CONFUSABLE_S: &str = "śšşŝșṡṣʂᵴꞩᶊȿ";

/// Folds one lowercased character to its canonical form, or None when the
/// character is not allowed in a name.
fn fold(c: char) -> Option<char> {
    match c {
        'a'..='z' | '0'..='9' | '-' | '_' => Some(c),
        _ if CONFUSABLE_A.contains(c) => Some('a'),
        _ if CONFUSABLE_E.contains(c) => Some('e'),
        _ if CONFUSABLE_I.contains(c) => Some('i'),
        _ if CONFUSABLE_O.contains(c) => Some('o'),
        _ if CONFUSABLE_U.contains(c) => Some('u'),
        _ if CONFUSABLE_C.contains(c) => Some('c'),
        _ if CONFUSABLE_S.contains(c) => Some('s'),
        _ => None,
    }
}

/// Normalizes a name label to its canonical form.
///
/// Case-folds, then maps confusable characters to ASCII. Fails with
/// [`RegistrarError::InvalidName`] if any disallowed character remains or
/// the result is empty — both signal a name that can never be valid, as
/// opposed to one that is merely too short.
///
/// # Errors
///
/// [`RegistrarError::InvalidName`] on disallowed characters or an empty
/// result.
pub fn normalize(name: &str) -> Result<String, RegistrarError> {
    let mut canonical = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        match fold(c) {
            Some(folded) => canonical.push(folded),
            None => {
                return Err(RegistrarError::InvalidName {
                    name: name.to_string(),
                })
            }
        }
    }
    if canonical.is_empty() {
        return Err(RegistrarError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(canonical)
}

/// Normalizes a name and enforces the registrar's minimum length.
///
/// # Errors
///
/// [`RegistrarError::InvalidName`] on disallowed characters, or
/// [`RegistrarError::TooShort`] when the normalized name has fewer than
/// `min_length` characters.
pub fn validate(name: &str, min_length: usize) -> Result<String, RegistrarError> {
    let canonical = normalize(name)?;
    let length = canonical.chars().count();
    if length < min_length {
        return Err(RegistrarError::TooShort {
            length,
            min: min_length,
        });
    }
    Ok(canonical)
}

// =============================================================================
// TESTS
// =============================================================================
