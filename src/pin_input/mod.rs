use std::time::Instant;

use crossterm::event::KeyEvent;

use crate::kinds::{DEFAULT_KIND, InputKind, kind_or_default};
use crate::pattern::Pattern;
use crate::utils::TextField;
use crate::warning::{READ_ONLY_WARNING, Warning};

pub mod projector;
pub mod render;
pub mod validator;

use projector::{Projection, cell_to_caret, project};
use validator::{DefaultAction, KeyState, Rules, completes_code, evaluate_key, sanitize};

/// Host-facing properties of a pin input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinInputConfig {
    pub value: String,
    pub kind: String,
    pub pattern: String,
    pub disabled: bool,
    pub hidden: bool,
    pub readonly: bool,
    pub error_message: Option<String>,
}

impl Default for PinInputConfig {
    fn default() -> Self {
        Self {
            value: String::new(),
            kind: DEFAULT_KIND.to_string(),
            pattern: "####".to_string(),
            disabled: false,
            hidden: false,
            readonly: false,
            error_message: None,
        }
    }
}

/// Requests a pin input makes to whoever owns focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinSignal {
    FocusNext(usize),
    FocusPrevious(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyOutcome {
    /// False when the key should be handled by the host.
    pub consumed: bool,
    pub signal: Option<PinSignal>,
}

/// Segmented numeric input: one cell per `#` of its pattern.
#[derive(Debug)]
pub struct PinInput {
    id: usize,
    kind: Box<dyn InputKind + Send>,
    pattern: Pattern,
    value: String,
    field: TextField,
    disabled: bool,
    hidden: bool,
    readonly: bool,
    focused: bool,
    error_message: Option<String>,
    warning: Warning,
    key_state: KeyState,
}

impl PinInput {
    pub fn new(id: usize, config: PinInputConfig) -> Self {
        let kind = kind_or_default(&config.kind);
        let pattern = Pattern::parse(&config.pattern);
        let value = sanitize(&kind.normalize_initial(&config.value, &pattern));
        Self {
            id,
            kind,
            pattern,
            field: TextField::from(value.clone()),
            value,
            disabled: config.disabled,
            hidden: config.hidden,
            readonly: config.readonly,
            focused: false,
            error_message: config.error_message,
            warning: Warning::default(),
            key_state: KeyState::Idle,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> &dyn InputKind {
        self.kind.as_ref()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn set_error_message(&mut self, message: Option<String>) {
        self.error_message = message;
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.message()
    }

    /// Text for the line under the cells. Errors win over warnings.
    pub fn message(&self) -> Option<&str> {
        self.error_message().or_else(|| self.warning())
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }

    pub fn toggle_hidden(&mut self) {
        self.hidden = !self.hidden;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Re-parse the mask, if it changed. A currency value is refitted to the
    /// new integer and fraction widths.
    pub fn set_pattern(&mut self, mask: &str) {
        if mask == self.pattern.source() {
            return;
        }
        self.pattern = Pattern::parse(mask);
        if self.kind.is_currency() {
            let value = self.kind.normalize_initial(&self.value, &self.pattern);
            self.set_value(value);
        }
    }

    /// Programmatic assignment. Clears the error message when the value changes.
    pub fn set_value(&mut self, value: impl Into<String>) {
        let value = sanitize(&value.into());
        self.field.set_value(value.clone());
        self.assign_value(value);
    }

    pub fn projection(&self) -> Projection {
        project(&self.pattern, self.kind.is_currency(), &self.field)
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> KeyOutcome {
        if self.disabled {
            return KeyOutcome {
                consumed: false,
                signal: None,
            };
        }

        let rules = Rules {
            pattern: &self.pattern,
            currency: self.kind.is_currency(),
            readonly: self.readonly,
        };
        let before = self.field.value.clone();
        let decision = evaluate_key(&rules, &mut self.field, key);
        self.key_state = decision.state;

        if let Some(rejection) = &decision.rejection {
            self.warning.show(rejection.message(), now);
        }

        let consumed = match decision.default {
            DefaultAction::Bubble => false,
            DefaultAction::Prevent => true,
            DefaultAction::Allow => self.field.apply_key(key),
        };
        if decision.state == KeyState::AcceptingDigit {
            self.warning.clear();
        }
        if self.field.value != before {
            self.commit_input();
        }

        let rules = Rules {
            pattern: &self.pattern,
            currency: self.kind.is_currency(),
            readonly: self.readonly,
        };
        let signal = if decision.focus_previous {
            Some(PinSignal::FocusPrevious(self.id))
        } else if completes_code(&rules, &self.field, key) {
            Some(PinSignal::FocusNext(self.id))
        } else {
            None
        };

        KeyOutcome { consumed, signal }
    }

    /// Replace the value with normalized clipboard text.
    pub fn handle_paste(&mut self, text: &str, now: Instant) -> Option<PinSignal> {
        if self.disabled {
            return None;
        }
        if self.readonly {
            self.warning.show(READ_ONLY_WARNING, now);
            return None;
        }

        let value = self.kind.normalize_paste(text, &self.pattern);
        tracing::info!(id = self.id, kind = self.kind.name(), %value, "paste accepted");
        self.set_value(value);
        self.field.set_caret(self.field.len());
        Some(PinSignal::FocusNext(self.id))
    }

    /// Put the caret in front of the clicked cell, or leave it for clicks
    /// elsewhere on the widget.
    pub fn click(&mut self, cell: Option<usize>) {
        if self.disabled {
            return;
        }
        if let Some(cell) = cell {
            let caret = cell_to_caret(&self.pattern, self.kind.is_currency(), &self.field, cell);
            self.field.set_caret(caret);
        }
    }

    /// Expire the warning. Returns true when the view changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.warning.tick(now)
    }

    /// Take what the field holds after an edit as the new value.
    fn commit_input(&mut self) {
        let value = sanitize(&self.field.value);
        if value != self.field.value {
            self.field.set_value(value.clone());
        }
        self.assign_value(value);
    }

    fn assign_value(&mut self, value: String) {
        if value != self.value {
            tracing::trace!(id = self.id, %value, "value changed");
            self.error_message = None;
            self.value = value;
        }
    }
}
