use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, StatefulWidgetRef, Widget};

use crate::pattern::Token;
use crate::pin_input::PinInput;
use crate::pin_input::projector::CaretEdge;
use crate::pin_input::validator::KeyState;

const CELL_WIDTH: u16 = 5;
const CELL_HEIGHT: u16 = 3;
const GAP: u16 = 1;
const SPACE_WIDTH: u16 = 2;
const SEPARATOR_WIDTH: u16 = 2;
const EYE_WIDTH: u16 = 4;
const BULLET: char = '•';

/// Rows taken by the cells plus the message line.
pub const PIN_INPUT_HEIGHT: u16 = CELL_HEIGHT + 1;

/// Where the last render put things, for resolving mouse clicks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HitMap {
    pub area: Rect,
    pub cells: Vec<(Rect, usize)>,
    pub eye: Option<Rect>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    Cell(usize),
    Eye,
    Widget,
}

impl HitMap {
    pub fn hit(&self, column: u16, row: u16) -> Option<Hit> {
        let position = Position::new(column, row);
        if self.eye.is_some_and(|eye| eye.contains(position)) {
            return Some(Hit::Eye);
        }
        if let Some((_, idx)) = self.cells.iter().find(|(rect, _)| rect.contains(position)) {
            return Some(Hit::Cell(*idx));
        }
        self.area.contains(position).then_some(Hit::Widget)
    }
}

impl StatefulWidgetRef for &PinInput {
    type State = HitMap;
    fn render_ref(&self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        *state = HitMap {
            area,
            ..HitMap::default()
        };

        let projection = self.projection();
        let border = if self.error_message.is_some() {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else if self.focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let caret = if self.key_state == KeyState::Rejecting {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let text = if self.disabled {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        let mut x = area.x;
        let mut idx = 0;
        for token in self.pattern.tokens() {
            let width = match token {
                Token::Digit => CELL_WIDTH,
                Token::Separator(_) => SEPARATOR_WIDTH,
                Token::Space => SPACE_WIDTH,
            };
            if x + width > area.right() || area.height < CELL_HEIGHT {
                break;
            }
            match token {
                Token::Digit => {
                    let rect = Rect::new(x, area.y, CELL_WIDTH, CELL_HEIGHT);
                    let block = Block::bordered().border_style(border);
                    let inner = block.inner(rect);
                    block.render(rect, buf);

                    let shown = match projection.cell(idx) {
                        Some(_) if self.hidden => BULLET,
                        Some(c) => c,
                        None => ' ',
                    };
                    let mut style = text;
                    if self.focused && projection.is_selected(idx, &self.field) {
                        style = style.bg(Color::LightBlue).fg(Color::Black);
                    }
                    let (left, right) = if self.focused && projection.caret.cell == idx {
                        match projection.caret.edge {
                            CaretEdge::Left => ("▏", " "),
                            CaretEdge::Right => (" ", "▕"),
                        }
                    } else {
                        (" ", " ")
                    };
                    Line::from(vec![
                        Span::styled(left, caret),
                        Span::styled(shown.to_string(), style),
                        Span::styled(right, caret),
                    ])
                    .render(inner, buf);

                    state.cells.push((rect, idx));
                    idx += 1;
                }
                Token::Separator(c) => {
                    let rect = Rect::new(x, area.y + CELL_HEIGHT - 1, SEPARATOR_WIDTH, 1);
                    Span::styled(c.to_string(), text).render(rect, buf);
                }
                Token::Space => (),
            }
            x += width + GAP;
        }

        if self.kind.has_visibility_toggle() && x + EYE_WIDTH <= area.right() {
            let rect = Rect::new(x, area.y + 1, EYE_WIDTH, 1);
            let eye = if self.hidden { "[-]" } else { "[o]" };
            Span::raw(eye).blue().bold().render(rect, buf);
            state.eye = Some(rect);
        }

        if area.height >= PIN_INPUT_HEIGHT {
            if let Some(message) = self.message() {
                let rect = Rect::new(area.x, area.y + CELL_HEIGHT, area.width, 1);
                Span::raw(message).red().render(rect, buf);
            }
        }
    }
}
