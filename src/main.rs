use std::cell::RefCell;
use std::io::stdout;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::Parser;
use color_eyre::Result;
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::execute;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, FrameExt, Paragraph};
use ratatui::{DefaultTerminal, Frame};
mod focus;
mod kinds;
mod logging;
mod pattern;
mod pin_input;
mod utils;
mod warning;
pub use focus::FocusRing;
pub use pin_input::{PinInput, PinInputConfig, PinSignal};

use crate::pin_input::render::{Hit, HitMap, PIN_INPUT_HEIGHT};

/// Segmented PIN, code and amount inputs in the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Write tracing output to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Make every field read-only.
    #[arg(long)]
    readonly: bool,
    /// Start the code and PIN fields masked.
    #[arg(long)]
    hidden: bool,
    /// Initial amount, normalized into euros and cents.
    #[arg(long, default_value = "1.234,5")]
    euro: String,
    /// Number of 4-digit code segments.
    #[arg(long, default_value_t = 3)]
    segments: usize,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    logging::init(args.log_file.as_deref())?;
    ratatui::run(|terminal| App::new(&args).run(terminal))
}

const CODE_PATTERN: &str = "####";
const AMOUNT_PATTERN: &str = "######.##";
const AMOUNT_FINE_PATTERN: &str = "#####.###";
const PIN_PATTERN: &str = "####";
const IBAN_PATTERN: &str = "#### #### ########### ##";
const SEGMENT_WIDTH: u16 = 24;

struct App {
    inputs: Vec<PinInput>,
    hits: Vec<HitMap>,
    ring: FocusRing,
    segments: usize,
    finished_segments: Rc<RefCell<Vec<usize>>>,
}

impl App {
    fn new(args: &Args) -> Self {
        let field = |kind: &str, pattern: &str, value: &str, hidden: bool| PinInputConfig {
            value: value.to_string(),
            kind: kind.to_string(),
            pattern: pattern.to_string(),
            hidden,
            readonly: args.readonly,
            ..PinInputConfig::default()
        };

        let mut configs: Vec<PinInputConfig> = (0..args.segments)
            .map(|_| field("text", CODE_PATTERN, "", args.hidden))
            .collect();
        configs.push(field("euro", AMOUNT_PATTERN, &args.euro, false));
        configs.push(field("password", PIN_PATTERN, "", args.hidden));
        configs.push(field("iban", IBAN_PATTERN, "", false));

        let inputs: Vec<PinInput> = configs
            .into_iter()
            .enumerate()
            .map(|(id, config)| PinInput::new(id, config))
            .collect();

        let mut ring = FocusRing::new(inputs.iter().map(PinInput::id).collect());
        let finished_segments = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&finished_segments);
        let segments = args.segments;
        ring.on_focus_next(move |notice| {
            let mut finished = sink.borrow_mut();
            if notice.source < segments && !finished.contains(&notice.source) {
                finished.push(notice.source);
            }
        });

        let mut app = Self {
            hits: vec![HitMap::default(); inputs.len()],
            inputs,
            ring,
            segments,
            finished_segments,
        };
        app.ring.cycle();
        app.sync_focus();
        app
    }

    fn run(mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        let result = self.event_loop(terminal);
        execute!(stdout(), DisableMouseCapture, DisableBracketedPaste)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();
        loop {
            terminal.draw(|frame| self.render(frame))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if !event::poll(timeout)? {
                self.on_tick();
                last_tick = Instant::now();
                continue;
            }
            // Terminate the program if the user presses Esc or Ctrl+C and true is returned
            if self.event_handler()? {
                return Ok(());
            }
        }
    }

    /// Handles user input events.
    ///
    /// @returns Ok(true) if the user wants to quit the program.
    fn event_handler(&mut self) -> Result<bool> {
        match event::read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press => return Ok(self.on_key(k)),
            Event::Mouse(m) if m.kind == MouseEventKind::Down(MouseButton::Left) => {
                self.on_click(m.column, m.row);
            }
            Event::Paste(text) => self.on_paste(&text),
            _ => (),
        }
        Ok(false)
    }

    fn on_key(&mut self, k: KeyEvent) -> bool {
        if k.code == KeyCode::Esc
            || (k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL))
        {
            return true;
        }

        if k.code == KeyCode::F(6) {
            let amount = &mut self.inputs[self.segments];
            let mask = if amount.pattern().source() == AMOUNT_PATTERN {
                AMOUNT_FINE_PATTERN
            } else {
                AMOUNT_PATTERN
            };
            amount.set_pattern(mask);
            return false;
        }

        if let Some(input) = self.focused_input() {
            match k.code {
                KeyCode::F(2) if input.kind().has_visibility_toggle() => {
                    input.toggle_hidden();
                    return false;
                }
                KeyCode::F(3) => {
                    input.set_error_message(Some("Rejected by the server".to_string()));
                    return false;
                }
                KeyCode::F(4) => {
                    let readonly = !input.is_readonly();
                    input.set_readonly(readonly);
                    return false;
                }
                KeyCode::F(5) => {
                    let disabled = !input.is_disabled();
                    input.set_disabled(disabled);
                    return false;
                }
                _ => (),
            }
            let outcome = input.handle_key(k, Instant::now());
            if let Some(signal) = outcome.signal {
                self.dispatch(signal);
            }
            if outcome.consumed {
                return false;
            }
        }

        if k.code == KeyCode::Tab {
            self.ring.cycle();
            self.sync_focus();
        }
        false
    }

    fn on_click(&mut self, column: u16, row: u16) {
        let clicked = self
            .hits
            .iter()
            .enumerate()
            .find_map(|(idx, hits)| hits.hit(column, row).map(|hit| (idx, hit)));
        let Some((idx, hit)) = clicked else {
            self.ring.blur();
            self.sync_focus();
            return;
        };
        let input = &mut self.inputs[idx];
        if input.is_disabled() {
            return;
        }
        match hit {
            Hit::Eye => input.toggle_hidden(),
            Hit::Cell(cell) => input.click(Some(cell)),
            Hit::Widget => input.click(None),
        }
        self.ring.focus(input.id());
        self.sync_focus();
    }

    fn on_paste(&mut self, text: &str) {
        let signal = self
            .focused_input()
            .and_then(|input| input.handle_paste(text, Instant::now()));
        if let Some(signal) = signal {
            self.dispatch(signal);
        }
    }

    fn on_tick(&mut self) {
        let now = Instant::now();
        for input in self.inputs.iter_mut() {
            input.tick(now);
        }
    }

    fn dispatch(&mut self, signal: PinSignal) {
        match signal {
            PinSignal::FocusNext(id) => self.ring.focus_next(id),
            PinSignal::FocusPrevious(id) => self.ring.focus_previous(id),
        };
        self.sync_focus();
    }

    fn sync_focus(&mut self) {
        let focused = self.ring.focused();
        for input in self.inputs.iter_mut() {
            input.set_focused(focused == Some(input.id()));
        }
    }

    fn focused_input(&mut self) -> Option<&mut PinInput> {
        let id = self.ring.focused()?;
        self.inputs.iter_mut().find(|input| input.id() == id)
    }

    fn code(&self) -> String {
        self.inputs[..self.segments]
            .iter()
            .map(PinInput::value)
            .collect::<Vec<_>>()
            .join("-")
    }

    fn render(&mut self, frame: &mut Frame) {
        let section = Constraint::Length(PIN_INPUT_HEIGHT + 2);
        let vertical = Layout::vertical([section, section, section, section, Constraint::Fill(1)]);
        let [code, amount, pin, iban, status] = frame.area().layout(&vertical);

        self.render_code_group(frame, code);
        let n = self.segments;
        self.render_section(frame, amount, n, " Amount ");
        self.render_section(frame, pin, n + 1, " PIN ");
        self.render_section(frame, iban, n + 2, " IBAN ");
        self.render_status(frame, status);
    }

    fn render_code_group(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().title_top(Line::from(vec![
            " One-time code ".into(),
            "<tab/shift-tab> ".blue().bold(),
        ]));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let horizontal = Layout::horizontal(vec![Constraint::Length(SEGMENT_WIDTH); self.segments]);
        let areas = horizontal.split(inner);
        for (idx, segment) in areas.iter().enumerate() {
            frame.render_stateful_widget_ref(&self.inputs[idx], *segment, &mut self.hits[idx]);
        }
    }

    fn render_section(&mut self, frame: &mut Frame, area: Rect, idx: usize, title: &str) {
        let block = if self.inputs[idx].is_focused() {
            Block::bordered().title_top(title).cyan()
        } else {
            Block::bordered().title_top(title)
        };
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_stateful_widget_ref(&self.inputs[idx], inner, &mut self.hits[idx]);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let finished = self.finished_segments.borrow().len();
        let lines = vec![
            Line::from(vec![
                Span::raw("Code ").bold(),
                Span::styled(self.code(), Style::default().cyan()),
                Span::raw(format!("  ({finished}/{} segments done)", self.segments)),
            ]),
            Line::from(vec![
                Span::raw("Amount ").bold(),
                Span::styled(self.inputs[self.segments].value().to_string(), Style::default().cyan()),
            ]),
            Line::from(vec![
                " Quit ".into(),
                "<esc>".blue().bold(),
                " Show/hide PIN ".into(),
                "<F2>".blue().bold(),
                " Flag error ".into(),
                "<F3>".blue().bold(),
                " Lock ".into(),
                "<F4>".blue().bold(),
                " Disable ".into(),
                "<F5>".blue().bold(),
                " Cents/mills ".into(),
                "<F6>".blue().bold(),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).block(Block::bordered()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn app() -> App {
        App::new(&Args::parse_from(["pin-input"]))
    }

    #[test]
    fn clicks_on_a_disabled_input_leave_focus_alone() {
        let mut app = app();
        let amount = app.segments;
        assert_eq!(app.ring.focused(), Some(0));
        app.hits[amount] = HitMap {
            area: Rect::new(0, 10, 40, PIN_INPUT_HEIGHT),
            ..HitMap::default()
        };

        app.inputs[amount].set_disabled(true);
        app.on_click(1, 11);
        assert_eq!(app.ring.focused(), Some(0));

        app.inputs[amount].set_disabled(false);
        app.on_click(1, 11);
        assert_eq!(app.ring.focused(), Some(amount));
    }

    #[test]
    fn f5_and_f6_drive_the_host_controlled_properties() {
        let mut app = app();
        app.on_key(KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE));
        assert!(app.inputs[0].is_disabled());
        app.on_key(KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE));
        assert!(!app.inputs[0].is_disabled());

        let amount = app.segments;
        assert_eq!(app.inputs[amount].value(), "1234.50");
        app.on_key(KeyEvent::new(KeyCode::F(6), KeyModifiers::NONE));
        assert_eq!(app.inputs[amount].pattern().source(), AMOUNT_FINE_PATTERN);
        assert_eq!(app.inputs[amount].value(), "1234.500");
        app.on_key(KeyEvent::new(KeyCode::F(6), KeyModifiers::NONE));
        assert_eq!(app.inputs[amount].value(), "1234.50");
    }
}
