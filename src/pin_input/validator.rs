//! Keystroke filter for pin inputs.
//!
//! Rules run in a fixed order and the first one that matches decides the
//! key. A key the filter lets through still has to be applied by the text
//! field (`DefaultAction::Allow`).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::pattern::Pattern;
use crate::pin_input::projector::integer_len;
use crate::utils::TextField;
use crate::warning::READ_ONLY_WARNING;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyState {
    Idle,
    AcceptingDigit,
    AcceptingSeparator,
    Rejecting,
}

/// What happens to the key after the filter ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultAction {
    /// The text field applies its normal editing for the key.
    Allow,
    /// Consumed by the filter.
    Prevent,
    /// Not ours, the host handles it.
    Bubble,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    InvalidCharacter(char),
    ReadOnly,
}

impl Rejection {
    pub fn message(&self) -> String {
        match self {
            Rejection::InvalidCharacter(c) => format!("Character '{c}' is not valid"),
            Rejection::ReadOnly => READ_ONLY_WARNING.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyDecision {
    pub state: KeyState,
    pub default: DefaultAction,
    pub rejection: Option<Rejection>,
    pub focus_previous: bool,
}

impl KeyDecision {
    fn new(state: KeyState, default: DefaultAction) -> Self {
        Self {
            state,
            default,
            rejection: None,
            focus_previous: false,
        }
    }

    fn reject(rejection: Option<Rejection>) -> Self {
        Self {
            rejection,
            ..Self::new(KeyState::Rejecting, DefaultAction::Prevent)
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Rules<'a> {
    pub pattern: &'a Pattern,
    pub currency: bool,
    pub readonly: bool,
}

impl Rules<'_> {
    /// Room left in the zone the caret is in.
    fn has_capacity(&self, field: &TextField) -> bool {
        if self.currency {
            let ilen = integer_len(&field.value);
            if field.selection_start <= ilen {
                ilen < self.pattern.integer_width()
            } else {
                let cents = field.len() - ilen - 1;
                cents < self.pattern.fraction_width()
            }
        } else {
            field.len() < self.pattern.max_width()
        }
    }
}

pub fn evaluate_key(rules: &Rules, field: &mut TextField, key: KeyEvent) -> KeyDecision {
    let modifiers = KeyModifiers::ALT | KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::META;
    if key.modifiers.intersects(modifiers) {
        return KeyDecision::new(KeyState::Idle, DefaultAction::Bubble);
    }

    match key.code {
        KeyCode::BackTab => shift_tab(),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => shift_tab(),
        KeyCode::Tab => KeyDecision::new(KeyState::Idle, DefaultAction::Bubble),
        KeyCode::Char(c) => evaluate_char(rules, field, c),
        KeyCode::Backspace | KeyCode::Delete if rules.readonly => {
            KeyDecision::reject(Some(Rejection::ReadOnly))
        }
        KeyCode::Backspace => skip_separator(field, jump_before_separator),
        KeyCode::Delete => skip_separator(field, jump_after_separator),
        _ => KeyDecision::new(KeyState::Idle, DefaultAction::Allow),
    }
}

fn shift_tab() -> KeyDecision {
    KeyDecision {
        focus_previous: true,
        ..KeyDecision::new(KeyState::Idle, DefaultAction::Prevent)
    }
}

fn evaluate_char(rules: &Rules, field: &mut TextField, c: char) -> KeyDecision {
    if c.is_ascii_digit() {
        // Read-only wins over a full zone, so every digit attempt warns.
        if rules.readonly {
            return KeyDecision::reject(Some(Rejection::ReadOnly));
        }
        if rules.has_capacity(field) {
            return KeyDecision::new(KeyState::AcceptingDigit, DefaultAction::Allow);
        }
    }

    let separator = rules.currency && matches!(c, '.' | ',');
    if separator {
        if rules.readonly {
            return KeyDecision::reject(Some(Rejection::ReadOnly));
        }
        if field.value.contains('.') {
            field.set_caret(rules.pattern.integer_width() + 1);
        } else {
            let mut value = field.value.clone();
            value.push('.');
            field.set_value(value);
        }
        return KeyDecision::new(KeyState::AcceptingSeparator, DefaultAction::Prevent);
    }

    if field.len() < rules.pattern.max_width() {
        tracing::debug!(key = %c, "character rejected");
        KeyDecision::reject(Some(Rejection::InvalidCharacter(c)))
    } else {
        KeyDecision::reject(None)
    }
}

/// Deleting never removes the separator: the caret steps over it instead.
fn skip_separator(field: &mut TextField, jump: fn(&mut TextField) -> bool) -> KeyDecision {
    if field.is_collapsed() && jump(field) {
        KeyDecision::new(KeyState::Idle, DefaultAction::Prevent)
    } else {
        KeyDecision::new(KeyState::Idle, DefaultAction::Allow)
    }
}

fn jump_before_separator(field: &mut TextField) -> bool {
    let start = field.selection_start;
    if start > 0 && field.char_at(start - 1) == Some('.') {
        field.set_caret(start - 1);
        true
    } else {
        false
    }
}

fn jump_after_separator(field: &mut TextField) -> bool {
    let start = field.selection_start;
    if field.char_at(start) == Some('.') {
        field.set_caret(start + 1);
        true
    } else {
        false
    }
}

/// Keep only the characters a pin input value may contain.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect()
}

/// Typing a digit that leaves the caret at the last cell completes a plain code.
pub fn completes_code(rules: &Rules, field: &TextField, key: KeyEvent) -> bool {
    !rules.currency
        && matches!(key.code, KeyCode::Char(c) if c.is_ascii_digit())
        && field.selection_start == rules.pattern.max_width()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn at(value: &str, caret: usize) -> TextField {
        let mut field = TextField::from(value.to_string());
        field.set_caret(caret);
        field
    }

    fn rules(pattern: &Pattern, currency: bool) -> Rules<'_> {
        Rules {
            pattern,
            currency,
            readonly: false,
        }
    }

    #[test]
    fn modified_keys_bubble() {
        let pattern = Pattern::parse("####");
        let mut field = at("", 0);
        let decision = evaluate_key(
            &rules(&pattern, false),
            &mut field,
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL),
        );
        assert_eq!(decision.default, DefaultAction::Bubble);
        assert_eq!(decision.rejection, None);
    }

    #[test]
    fn shift_tab_asks_for_previous_focus() {
        let pattern = Pattern::parse("####");
        let mut field = at("", 0);
        for event in [
            key(KeyCode::BackTab),
            KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT),
        ] {
            let decision = evaluate_key(&rules(&pattern, false), &mut field, event);
            assert!(decision.focus_previous);
            assert_eq!(decision.default, DefaultAction::Prevent);
        }
        let decision = evaluate_key(&rules(&pattern, false), &mut field, key(KeyCode::Tab));
        assert!(!decision.focus_previous);
        assert_eq!(decision.default, DefaultAction::Bubble);
    }

    #[test]
    fn digits_accepted_until_full() {
        let pattern = Pattern::parse("####");
        let mut field = at("123", 3);
        let decision = evaluate_key(&rules(&pattern, false), &mut field, key(KeyCode::Char('4')));
        assert_eq!(decision.state, KeyState::AcceptingDigit);
        assert_eq!(decision.default, DefaultAction::Allow);

        let mut field = at("1234", 4);
        let decision = evaluate_key(&rules(&pattern, false), &mut field, key(KeyCode::Char('5')));
        assert_eq!(decision.state, KeyState::Rejecting);
        assert_eq!(decision.default, DefaultAction::Prevent);
        assert_eq!(decision.rejection, None);
        assert_eq!(field.value, "1234");
    }

    #[test]
    fn letters_are_rejected_with_a_message() {
        let pattern = Pattern::parse("####");
        let mut field = at("12", 2);
        let decision = evaluate_key(&rules(&pattern, false), &mut field, key(KeyCode::Char('x')));
        assert_eq!(decision.default, DefaultAction::Prevent);
        let message = decision.rejection.map(|r| r.message()).unwrap_or_default();
        assert!(message.contains("'x'"), "{message}");
        assert_eq!(field.value, "12");
    }

    #[test]
    fn currency_digit_capacity_depends_on_zone() {
        let pattern = Pattern::parse("##.##");
        let mut field = at("12.5", 1);
        let decision = evaluate_key(&rules(&pattern, true), &mut field, key(KeyCode::Char('3')));
        assert_eq!(decision.state, KeyState::Rejecting);

        let mut field = at("12.5", 4);
        let decision = evaluate_key(&rules(&pattern, true), &mut field, key(KeyCode::Char('3')));
        assert_eq!(decision.state, KeyState::AcceptingDigit);

        let mut field = at("12.50", 4);
        let decision = evaluate_key(&rules(&pattern, true), &mut field, key(KeyCode::Char('3')));
        assert_eq!(decision.state, KeyState::Rejecting);
    }

    #[test]
    fn first_separator_is_appended() {
        let pattern = Pattern::parse("####.##");
        let mut field = at("12", 2);
        let decision = evaluate_key(&rules(&pattern, true), &mut field, key(KeyCode::Char(',')));
        assert_eq!(decision.state, KeyState::AcceptingSeparator);
        assert_eq!(decision.default, DefaultAction::Prevent);
        assert_eq!(decision.rejection, None);
        assert_eq!(field.value, "12.");
    }

    #[test]
    fn second_separator_moves_caret_to_fraction() {
        let pattern = Pattern::parse("##.##");
        let mut field = at("12.5", 0);
        evaluate_key(&rules(&pattern, true), &mut field, key(KeyCode::Char('.')));
        assert_eq!(field.value, "12.5");
        assert_eq!(field.selection_start, 3);
    }

    #[test]
    fn separator_is_a_letter_outside_currency() {
        let pattern = Pattern::parse("####");
        let mut field = at("1", 1);
        let decision = evaluate_key(&rules(&pattern, false), &mut field, key(KeyCode::Char('.')));
        assert_eq!(decision.rejection, Some(Rejection::InvalidCharacter('.')));
    }

    #[test]
    fn backspace_jumps_over_separator() {
        let pattern = Pattern::parse("####.##");
        let mut field = at("12.5", 3);
        let decision = evaluate_key(&rules(&pattern, true), &mut field, key(KeyCode::Backspace));
        assert_eq!(decision.default, DefaultAction::Prevent);
        assert_eq!(field.value, "12.5");
        assert_eq!(field.selection_start, 2);
    }

    #[test]
    fn delete_jumps_over_separator() {
        let pattern = Pattern::parse("####.##");
        let mut field = at("12.5", 2);
        let decision = evaluate_key(&rules(&pattern, true), &mut field, key(KeyCode::Delete));
        assert_eq!(decision.default, DefaultAction::Prevent);
        assert_eq!(field.selection_start, 3);
    }

    #[test]
    fn backspace_elsewhere_is_left_to_the_field() {
        let pattern = Pattern::parse("####.##");
        let mut field = at("12.5", 2);
        let decision = evaluate_key(&rules(&pattern, true), &mut field, key(KeyCode::Backspace));
        assert_eq!(decision.default, DefaultAction::Allow);
    }

    #[test]
    fn read_only_blocks_editing_keys() {
        let pattern = Pattern::parse("####.##");
        let rules = Rules {
            pattern: &pattern,
            currency: true,
            readonly: true,
        };
        for code in [KeyCode::Char('1'), KeyCode::Char('.'), KeyCode::Backspace, KeyCode::Delete] {
            let mut field = at("12.5", 4);
            let decision = evaluate_key(&rules, &mut field, key(code));
            assert_eq!(decision.rejection, Some(Rejection::ReadOnly));
            assert_eq!(decision.default, DefaultAction::Prevent);
            assert_eq!(field.value, "12.5");
        }
        let mut field = at("1234.56", 4);
        let decision = evaluate_key(&rules, &mut field, key(KeyCode::Char('7')));
        assert_eq!(decision.rejection, Some(Rejection::ReadOnly));

        let mut field = at("12.5", 4);
        let decision = evaluate_key(&rules, &mut field, key(KeyCode::Left));
        assert_eq!(decision.default, DefaultAction::Allow);
    }

    #[test]
    fn sanitize_keeps_digits_and_separators() {
        assert_eq!(sanitize("1a2,3.4 b"), "12,3.4");
    }

    #[test]
    fn code_completes_when_last_digit_typed() {
        let pattern = Pattern::parse("####");
        let rules = rules(&pattern, false);
        assert!(completes_code(&rules, &at("1234", 4), key(KeyCode::Char('4'))));
        assert!(!completes_code(&rules, &at("1234", 3), key(KeyCode::Char('4'))));
        assert!(!completes_code(&rules, &at("1234", 4), key(KeyCode::Left)));
    }
}
