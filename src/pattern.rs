/// One rendered element of a pin input mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Digit,
    Separator(char),
    Space,
}

/// Parsed mask such as `####.##` or `#### #### ####`.
///
/// `#` is a digit slot, `.` or `,` the decimal separator (only the last one
/// counts), a space a visual gap. Anything else is dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
    integer_width: usize,
    fraction_width: usize,
}

impl Pattern {
    pub fn parse(mask: &str) -> Self {
        let separator_idx = mask.replace(',', ".").rfind('.');

        let mut tokens = Vec::with_capacity(mask.len());
        let mut integer_width = 0;
        let mut fraction_width = 0;
        for (idx, ch) in mask.char_indices() {
            match ch {
                '#' => {
                    tokens.push(Token::Digit);
                    match separator_idx {
                        Some(sep) if idx > sep => fraction_width += 1,
                        _ => integer_width += 1,
                    }
                }
                '.' | ',' if Some(idx) == separator_idx => tokens.push(Token::Separator(ch)),
                ' ' => tokens.push(Token::Space),
                _ => (),
            }
        }

        Self {
            source: mask.to_string(),
            tokens,
            integer_width,
            fraction_width,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn integer_width(&self) -> usize {
        self.integer_width
    }

    pub fn fraction_width(&self) -> usize {
        self.fraction_width
    }

    pub fn max_width(&self) -> usize {
        self.integer_width + self.fraction_width
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::parse("####")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_masks_have_no_fraction() {
        for k in 0..10 {
            let pattern = Pattern::parse(&"#".repeat(k));
            assert_eq!(pattern.max_width(), k);
            assert_eq!(pattern.integer_width(), k);
            assert_eq!(pattern.fraction_width(), 0);
        }
    }

    #[test]
    fn currency_mask_splits_at_separator() {
        let pattern = Pattern::parse("####.##");
        assert_eq!(pattern.integer_width(), 4);
        assert_eq!(pattern.fraction_width(), 2);
        assert_eq!(pattern.max_width(), 6);
    }

    #[test]
    fn comma_is_a_separator_too() {
        let pattern = Pattern::parse("###,##");
        assert_eq!((pattern.integer_width(), pattern.fraction_width()), (3, 2));
        assert_eq!(pattern.tokens()[3], Token::Separator(','));
    }

    #[test]
    fn only_last_separator_is_honored() {
        let pattern = Pattern::parse("#.##,#");
        assert_eq!((pattern.integer_width(), pattern.fraction_width()), (3, 1));
        let separators = pattern
            .tokens()
            .iter()
            .filter(|t| matches!(t, Token::Separator(_)))
            .count();
        assert_eq!(separators, 1);
    }

    #[test]
    fn spaces_render_and_unknown_characters_are_dropped() {
        let pattern = Pattern::parse("## x-##");
        assert_eq!(
            pattern.tokens(),
            &[Token::Digit, Token::Digit, Token::Space, Token::Digit, Token::Digit]
        );
        assert_eq!(pattern.max_width(), 4);
    }

    #[test]
    fn mask_without_slots_is_zero_width() {
        let pattern = Pattern::parse(".");
        assert_eq!(pattern.max_width(), 0);
        assert_eq!(Pattern::parse("").max_width(), 0);
    }
}
