use crate::kinds::{InputKind, digits_only};
use crate::pattern::Pattern;
use crate::register_kind;

pub const KIND_NAME: &str = "text";

/// Plain numeric code.
#[derive(Clone, Debug, Default)]
pub struct TextKind;

impl InputKind for TextKind {
    fn name(&self) -> &'static str {
        KIND_NAME
    }

    fn normalize_paste(&self, text: &str, _pattern: &Pattern) -> String {
        digits_only(text)
    }
}

register_kind!(TextKind, KIND_NAME);
