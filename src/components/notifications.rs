//! Toast notifications.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use jetton_minter::domain::notification::{Notification, Severity};

use super::Component;
use crate::tui::Frame;

/// Oldest toasts are dropped beyond this.
const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub ticks_left: u32,
}

pub struct NotificationsComponent {
    pub toasts: Vec<Toast>,
    ttl_ticks: u32,
}

impl NotificationsComponent {
    pub fn new(ttl_ticks: u32) -> Self {
        Self {
            toasts: Vec::new(),
            ttl_ticks: ttl_ticks.max(1),
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.toasts.push(Toast {
            notification,
            ticks_left: self.ttl_ticks,
        });
        if self.toasts.len() > MAX_TOASTS {
            self.toasts.remove(0);
        }
    }

    /// Age toasts by one tick and drop expired ones.
    pub fn tick(&mut self) {
        for toast in &mut self.toasts {
            toast.ticks_left = toast.ticks_left.saturating_sub(1);
        }
        self.toasts.retain(|t| t.ticks_left > 0);
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    fn color(severity: Severity) -> Color {
        match severity {
            Severity::Warning => Color::Yellow,
            Severity::Success => Color::Green,
            Severity::Error => Color::Red,
        }
    }

    /// Static draw method for use in the main app draw loop.
    pub fn draw_static(f: &mut Frame, area: Rect, toasts: &[Toast]) {
        let lines: Vec<Line> = toasts
            .iter()
            .rev()
            .map(|t| {
                let color = Self::color(t.notification.severity);
                Line::from(vec![
                    Span::styled(
                        format!("[{}] ", t.notification.severity),
                        Style::default().fg(color),
                    ),
                    Span::raw(t.notification.content.as_str()),
                ])
            })
            .collect();

        let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .title(" Notifications [x] dismiss ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(widget, area);
    }
}

impl Component for NotificationsComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('x') {
            self.clear();
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        Self::draw_static(f, area, &self.toasts);
    }
}
