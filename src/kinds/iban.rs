use crate::kinds::{InputKind, digits_only};
use crate::pattern::Pattern;
use crate::register_kind;

pub const KIND_NAME: &str = "iban";

/// Country code and check digits that bank apps put in front of a pasted IBAN.
const IBAN_PREFIX: &str = "PT50";

#[derive(Clone, Debug, Default)]
pub struct IbanKind;

impl InputKind for IbanKind {
    fn name(&self) -> &'static str {
        KIND_NAME
    }

    fn normalize_paste(&self, text: &str, _pattern: &Pattern) -> String {
        digits_only(&strip_prefix(text))
    }
}

/// Remove the first case-insensitive occurrence of the prefix.
fn strip_prefix(text: &str) -> String {
    let lowered = text.to_ascii_lowercase();
    match lowered.find(&IBAN_PREFIX.to_ascii_lowercase()) {
        Some(idx) => {
            let mut stripped = String::with_capacity(text.len());
            stripped.push_str(&text[..idx]);
            stripped.push_str(&text[idx + IBAN_PREFIX.len()..]);
            stripped
        }
        None => text.to_string(),
    }
}

register_kind!(IbanKind, KIND_NAME);
