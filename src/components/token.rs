//! Token overview panel.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use jetton_minter::domain::{amount::format_base_units, token::TokenContext};

use super::Component;
use crate::tui::Frame;

pub struct TokenComponent {
    pub context: TokenContext,
    pub testnet: bool,
}

impl TokenComponent {
    pub fn new(testnet: bool) -> Self {
        Self {
            context: TokenContext::default(),
            testnet,
        }
    }

    /// Static draw method for use in the main app draw loop.
    pub fn draw_static(
        f: &mut Frame,
        area: Rect,
        ctx: &TokenContext,
        testnet: bool,
        extra: Option<Line<'static>>,
    ) {
        let block = Block::default()
            .title(" Jetton ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let Some(master) = ctx.jetton_master else {
            let loading = Paragraph::new(Line::from(Span::styled(
                "Loading jetton details...",
                Style::default().fg(Color::DarkGray),
            )))
            .block(block);
            f.render_widget(loading, area);
            return;
        };

        let label = Style::default().fg(Color::DarkGray);
        let value = Style::default().fg(Color::White);
        let flag = |on: bool| {
            if on {
                Span::styled("yes", Style::default().fg(Color::Green))
            } else {
                Span::styled("no", Style::default().fg(Color::Red))
            }
        };

        let supply = supply_text(ctx);

        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    ctx.symbol.clone(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(ctx.name.clone().unwrap_or_default(), value),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Master:        ", label),
                Span::styled(master.to_friendly(true, testnet), value),
            ]),
            Line::from(vec![
                Span::styled("Total supply:  ", label),
                Span::styled(supply, Style::default().fg(Color::Green)),
            ]),
            Line::from(vec![
                Span::styled("Decimals:      ", label),
                Span::styled(
                    ctx.decimals.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
                    value,
                ),
            ]),
            Line::from(vec![
                Span::styled("Admin:         ", label),
                Span::styled(
                    ctx.admin_address
                        .map(|a| a.to_friendly(true, testnet))
                        .unwrap_or_else(|| "none".to_string()),
                    value,
                ),
            ]),
            Line::from(vec![Span::styled("Mintable:      ", label), flag(ctx.mintable)]),
            Line::from(vec![Span::styled("You are admin: ", label), flag(ctx.is_admin)]),
            Line::from(vec![Span::styled("Your wallet:   ", label), flag(ctx.is_my_wallet)]),
        ];

        if let Some(extra) = extra {
            lines.push(Line::from(""));
            lines.push(extra);
        }

        let panel = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(panel, area);
    }
}

impl Component for TokenComponent {
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<()> {
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        Self::draw_static(f, area, &self.context, self.testnet, None);
    }
}

/// Total supply in token units, or `-` until it is loaded.
fn supply_text(ctx: &TokenContext) -> String {
    match (&ctx.total_supply, ctx.decimals) {
        (Some(supply), Some(decimals)) => {
            format!("{} {}", format_base_units(supply, decimals), ctx.symbol)
        }
        _ => "-".to_string(),
    }
}
