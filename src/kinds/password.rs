use crate::kinds::{InputKind, digits_only};
use crate::pattern::Pattern;
use crate::register_kind;

pub const KIND_NAME: &str = "password";

/// Numeric secret with an eye toggle for the masked rendering.
#[derive(Clone, Debug, Default)]
pub struct PasswordKind;

impl InputKind for PasswordKind {
    fn name(&self) -> &'static str {
        KIND_NAME
    }

    fn has_visibility_toggle(&self) -> bool {
        true
    }

    fn normalize_paste(&self, text: &str, _pattern: &Pattern) -> String {
        digits_only(text)
    }
}

register_kind!(PasswordKind, KIND_NAME);
