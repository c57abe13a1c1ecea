//! Invite codes: six-digit numeric tokens granting join access to an event.
//!
//! Randomness alone does not make a code unique (900 000 possible values), so
//! creation checks the current codes and retries on a unique-constraint
//! violation; see `Engine::create_event`.

use rand::Rng;

use crate::{EngineError, ResultEngine};

/// Attempts `create_event` makes before giving up on finding a free code.
pub(crate) const MAX_CODE_ATTEMPTS: usize = 8;

const CODE_LEN: usize = 6;

/// Draw a code in `100000..=999999` (no leading zero).
pub fn generate() -> String {
    rand::rng().random_range(100_000..1_000_000u32).to_string()
}

/// Normalise caller input.
///
/// Empty input is a validation error. Anything that is not six digits cannot
/// match an issued code and is reported as `NotFound`, the same answer an
/// unknown, cleared or expired code gets.
pub(crate) fn normalize(raw: &str) -> ResultEngine<String> {
    let code = raw.trim();
    if code.is_empty() {
        return Err(EngineError::ValidationFailed(
            "invite code is required".to_string(),
        ));
    }
    if code.len() != CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EngineError::NotFound("invite code".to_string()));
    }
    Ok(code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..1_000 {
            let code = generate();
            assert_eq!(code.len(), 6, "{code}");
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
            assert_ne!(code.as_bytes()[0], b'0');
        }
    }

    #[test]
    fn normalize_trims_and_rejects_garbage() {
        assert_eq!(normalize(" 482913 ").unwrap(), "482913");
        assert_eq!(
            normalize("  "),
            Err(EngineError::ValidationFailed(
                "invite code is required".to_string()
            ))
        );
        assert_eq!(
            normalize("12ab56"),
            Err(EngineError::NotFound("invite code".to_string()))
        );
        assert_eq!(
            normalize("1234567"),
            Err(EngineError::NotFound("invite code".to_string()))
        );
    }
}
