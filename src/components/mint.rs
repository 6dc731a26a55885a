//! Mint action: trigger hint, amount popup and the blocking loader.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;

use jetton_minter::domain::{
    amount::HumanAmount,
    mint::{DialogState, MintController, MintJob, MintOutcome, Skipped},
};

use super::{Component, centered_rect};
use crate::{action::Action, tui::Frame};

/// Everything needed to draw the mint action for one frame.
#[derive(Debug, Clone)]
pub struct MintView {
    pub visible: bool,
    pub dialog_visible: bool,
    pub loader_visible: bool,
    pub symbol: String,
    pub input: String,
}

/// Longest amount the field accepts, decimal point included.
pub const MAX_INPUT_LEN: usize = 78;

/// Text of the amount field. Digits and a single decimal point only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountInput {
    text: String,
}

impl AmountInput {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn set(&mut self, text: String) {
        self.text = text;
        self.text.truncate(MAX_INPUT_LEN);
    }

    /// Append one character. Returns whether the text changed.
    pub fn push(&mut self, c: char) -> bool {
        if self.text.len() >= MAX_INPUT_LEN {
            return false;
        }
        if c.is_ascii_digit() {
            if self.text == "0" {
                self.text.clear();
            }
            self.text.push(c);
            true
        } else if c == '.' && !self.text.contains('.') && self.text.len() + 2 <= MAX_INPUT_LEN {
            if self.text.is_empty() {
                self.text.push('0');
            }
            self.text.push(c);
            true
        } else {
            false
        }
    }

    /// Append every accepted character of `text`, stopping at the length cap.
    pub fn paste(&mut self, text: &str) -> bool {
        let mut changed = false;
        for c in text.trim().chars() {
            if self.text.len() >= MAX_INPUT_LEN {
                break;
            }
            changed |= self.push(c);
        }
        changed
    }

    pub fn pop(&mut self) -> bool {
        self.text.pop().is_some()
    }

    /// Empty or unparsable text is `None`.
    pub fn amount(&self) -> Option<HumanAmount> {
        self.text.parse::<HumanAmount>().ok()
    }
}

pub struct MintComponent {
    action_tx: UnboundedSender<Action>,
    controller: MintController,
    input: AmountInput,
}

impl MintComponent {
    pub fn new(controller: MintController, action_tx: UnboundedSender<Action>) -> Self {
        Self {
            action_tx,
            controller,
            input: AmountInput::default(),
        }
    }

    /// Whether keys should go to the popup rather than global bindings.
    pub fn is_capturing_input(&self) -> bool {
        self.controller.is_visible()
            && (self.controller.dialog_visible() || self.controller.loader_visible())
    }

    pub fn view(&self) -> MintView {
        MintView {
            visible: self.controller.is_visible(),
            dialog_visible: self.controller.dialog_visible(),
            loader_visible: self.controller.loader_visible(),
            symbol: self.controller.context().symbol,
            input: self.input.as_str().to_string(),
        }
    }

    pub fn begin_submit(&mut self) -> std::result::Result<MintJob, Skipped> {
        self.controller.begin_submit()
    }

    pub fn finish_submit(&mut self, outcome: MintOutcome) {
        self.controller.finish_submit(outcome);
        if self.controller.amount().is_none() {
            self.input.clear();
        }
    }

    /// Parses once per paste, however long the pasted text is.
    pub fn handle_paste(&mut self, text: &str) {
        if self.controller.dialog_visible() && self.input.paste(text) {
            self.sync_amount();
        }
    }

    fn handle_char(&mut self, c: char) {
        if self.input.push(c) {
            self.sync_amount();
        }
    }

    fn handle_backspace(&mut self) {
        if self.input.pop() {
            self.sync_amount();
        }
    }

    /// Mirror the text field into the controller.
    fn sync_amount(&mut self) {
        self.controller.set_amount(self.input.amount());
    }

    fn cancel(&mut self) {
        self.controller.close();
        let draft = self
            .controller
            .amount()
            .map(ToString::to_string)
            .unwrap_or_default();
        self.input.set(draft);
    }

    /// Static draw method for use in the main app draw loop.
    pub fn draw_static(f: &mut Frame, area: Rect, view: &MintView) {
        if !view.visible {
            return;
        }

        if view.loader_visible {
            Self::draw_loader(f, area);
        } else if view.dialog_visible {
            Self::draw_popup(f, area, &view.symbol, &view.input);
        }
    }

    /// One-line hint shown in the token panel when minting is available.
    pub fn trigger_line(view: &MintView) -> Option<Line<'static>> {
        if !view.visible {
            return None;
        }
        Some(Line::from(vec![
            Span::styled(
                "[m]",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Mint"),
        ]))
    }

    fn draw_loader(f: &mut Frame, area: Rect) {
        let rect = centered_rect(30, 5, area);
        f.render_widget(Clear, rect);
        let loader = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Minting...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))
            .centered(),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(loader, rect);
    }

    fn draw_popup(f: &mut Frame, area: Rect, symbol: &str, input: &str) {
        let rect = centered_rect(44, 11, area);
        f.render_widget(Clear, rect);

        let outer = Block::default()
            .title(format!(" Mint {} ", symbol))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = outer.inner(rect);
        f.render_widget(outer, rect);

        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

        let input_widget = Paragraph::new(Line::from(vec![
            Span::styled(input, Style::default().fg(Color::White)),
            Span::styled("_", Style::default().fg(Color::Cyan)),
        ]))
        .block(
            Block::default()
                .title(format!("Enter {} amount", symbol))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        f.render_widget(input_widget, chunks[0]);

        let submit = Paragraph::new(Line::from(Span::styled(
            "  [ Submit ]  ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )))
        .centered()
        .block(Block::default().borders(Borders::NONE));
        f.render_widget(submit, chunks[1]);

        let help = Paragraph::new(Line::from(Span::styled(
            "[Enter] Submit  [Esc] Cancel",
            Style::default().fg(Color::DarkGray),
        )))
        .centered();
        f.render_widget(help, chunks[2]);
    }
}

impl Component for MintComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if !self.controller.is_visible() || self.controller.loader_visible() {
            return Ok(());
        }

        match self.controller.dialog() {
            DialogState::Closed => {
                if key.code == KeyCode::Char('m') {
                    self.controller.open();
                }
            }
            DialogState::Open => match key.code {
                KeyCode::Esc => self.cancel(),
                KeyCode::Enter => {
                    self.action_tx.send(Action::SubmitMint)?;
                }
                KeyCode::Backspace => self.handle_backspace(),
                KeyCode::Char(c) => self.handle_char(c),
                _ => {}
            },
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        Self::draw_static(f, area, &self.view());
    }
}
