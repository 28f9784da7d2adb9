use crate::kinds::InputKind;
use crate::pattern::Pattern;
use crate::register_kind;

pub const KIND_NAME: &str = "euro";

/// Currency amount split into euros and cents around a single separator.
#[derive(Clone, Debug, Default)]
pub struct EuroKind;

impl InputKind for EuroKind {
    fn name(&self) -> &'static str {
        KIND_NAME
    }

    fn is_currency(&self) -> bool {
        true
    }

    fn normalize_paste(&self, text: &str, pattern: &Pattern) -> String {
        normalize_amount(text, pattern.integer_width(), pattern.fraction_width())
    }

    fn normalize_initial(&self, value: &str, pattern: &Pattern) -> String {
        normalize_amount(value, pattern.integer_width(), pattern.fraction_width())
    }
}

/// Convert free text into `"<euros>.<cents>"`.
///
/// A trailing separator followed by digits supplies the cents, cut and
/// zero-padded to `fraction_width`. The euros lose every separator and keep
/// only their last `integer_width` digits.
pub fn normalize_amount(text: &str, integer_width: usize, fraction_width: usize) -> String {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    let (euros, cents) = match split_trailing_cents(&cleaned) {
        Some((euros, digits)) => {
            let mut cents: String = digits.chars().take(fraction_width).collect();
            while cents.len() < fraction_width {
                cents.push('0');
            }
            (euros, cents)
        }
        None => (cleaned.as_str(), String::new()),
    };

    let euros: String = euros
        .chars()
        .filter(|c| !matches!(c, '.' | ',') && !c.is_whitespace())
        .collect();
    let euros = &euros[euros.len().saturating_sub(integer_width)..];

    format!("{euros}.{cents}")
}

/// Split `text` at a separator that is followed only by digits, at least one.
fn split_trailing_cents(text: &str) -> Option<(&str, &str)> {
    let digits_start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(idx, _)| idx)?;
    let separator_idx = digits_start.checked_sub(1)?;
    match text.as_bytes()[separator_idx] {
        b'.' | b',' => Some((&text[..separator_idx], &text[digits_start..])),
        _ => None,
    }
}

register_kind!(EuroKind, KIND_NAME);
