use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::pattern::Pattern;

pub mod euro;
pub mod iban;
pub mod password;
pub mod text;

pub const DEFAULT_KIND: &str = text::KIND_NAME;

#[macro_export]
macro_rules! register_kind {
    ($type:ty, $name:expr) => {
        #[ctor::ctor] // runs at program startup
        fn register() {
            crate::kinds::register_kind($name, || Box::new(<$type>::default()));
        }
    };
}

/// Behavior that differs between the `type` values of a pin input.
pub trait InputKind: std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Two-part value (`integer.fraction`) with right-aligned integer cells.
    fn is_currency(&self) -> bool {
        false
    }

    /// Renders the eye marker that toggles `hidden`.
    fn has_visibility_toggle(&self) -> bool {
        false
    }

    /// Turn clipboard text into a value for this kind.
    fn normalize_paste(&self, text: &str, pattern: &Pattern) -> String;

    /// Conversion applied once to the initial value.
    fn normalize_initial(&self, value: &str, _pattern: &Pattern) -> String {
        value.to_string()
    }
}

pub static KIND_REGISTRY: Lazy<Mutex<HashMap<&'static str, fn() -> Box<dyn InputKind + Send>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

pub fn register_kind(name: &'static str, factory: fn() -> Box<dyn InputKind + Send>) {
    KIND_REGISTRY.lock().unwrap().insert(name, factory);
}

pub fn get_kind_by_name(name: &str) -> Option<Box<dyn InputKind + Send>> {
    KIND_REGISTRY.lock().unwrap().get(name).map(|f| f())
}

/// Look up a kind, falling back to plain text for names nobody registered.
pub fn kind_or_default(name: &str) -> Box<dyn InputKind + Send> {
    get_kind_by_name(name).unwrap_or_else(|| {
        tracing::warn!(kind = name, "unknown pin input type, using {DEFAULT_KIND}");
        Box::new(text::TextKind)
    })
}

pub(crate) fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}
