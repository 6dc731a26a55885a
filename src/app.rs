use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use jetton_minter::{
    config::Config,
    domain::{
        mint::{JettonStore, MintController, MintOutcome},
        notification::{Notification, Notifier},
        token::{Address, TokenContext},
    },
    infra::{
        deployer::BridgeDeployer, rpc::TonClient, store::TonJettonStore, wallet::BridgeWallet,
    },
};

use crate::{
    action::Action,
    cli::Args,
    components::{
        Component,
        mint::{MintComponent, MintView},
        notifications::{NotificationsComponent, Toast},
        token::TokenComponent,
    },
    tui::{Event, Frame, Tui},
};

/// How long a toast stays on screen.
const TOAST_SECS: f64 = 6.0;

/// Routes notifications into the action loop.
pub struct ActionNotifier {
    action_tx: UnboundedSender<Action>,
}

impl ActionNotifier {
    pub fn new(action_tx: UnboundedSender<Action>) -> Self {
        Self { action_tx }
    }
}

impl Notifier for ActionNotifier {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.action_tx.send(Action::Notify(notification)) {
            warn!("Dropped notification: {}", e);
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub should_suspend: bool,
    pub config: Config,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
    pub tui: Tui,
    pub store: TonJettonStore,
    pub token_component: TokenComponent,
    pub mint_component: MintComponent,
    pub notifications_component: NotificationsComponent,
    pub status_message: String,
}

impl App {
    pub fn new(args: &Args) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let config = Config::load(&args.network, args.api_url.as_deref())?;

        let jetton: Address = args.jetton.parse()?;
        let owner = args.owner.as_deref().map(str::parse::<Address>).transpose()?;
        let wallet = BridgeWallet::from_args(args.wallet.as_deref(), args.session.as_deref())?;
        if !wallet.is_connected() {
            info!("No wallet session given, minting is unavailable");
        }

        let client = TonClient::new(config.clone());
        let store = TonJettonStore::new(client.clone(), jetton, wallet.address(), owner);
        let deployer = BridgeDeployer::new(client, &config.bridge.url, config.mint.clone());
        let notifier = ActionNotifier::new(action_tx.clone());

        let controller = MintController::new(
            Arc::new(store.clone()),
            Arc::new(wallet),
            Arc::new(deployer),
            Arc::new(notifier),
        );
        let mint_component = MintComponent::new(controller, action_tx.clone());
        let token_component = TokenComponent::new(config.is_testnet());
        let notifications_component =
            NotificationsComponent::new((TOAST_SECS * args.tick_rate).ceil() as u32);

        let tui = Tui::new()?
            .tick_rate(args.tick_rate)
            .frame_rate(args.frame_rate);

        Ok(Self {
            should_quit: false,
            should_suspend: false,
            config,
            action_tx,
            action_rx,
            tui,
            store,
            token_component,
            mint_component,
            notifications_component,
            status_message: "Ready".to_string(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;

        match self.store.load().await {
            Ok(()) => {
                self.status_message = format!("Loaded jetton from {}", self.config.network.name);
            }
            Err(e) => {
                info!("Failed to load jetton: {}", e);
                self.status_message = format!("Failed to load jetton: {}", e);
            }
        }

        loop {
            // Handle events
            match self.tui.next().await {
                Some(event) => self.handle_event(event)?,
                None => {
                    warn!("Terminal event stream closed");
                    self.should_quit = true;
                }
            }

            // Handle actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.handle_action(action)?;
            }

            if self.should_suspend {
                self.tui.suspend()?;
                self.should_suspend = false;
                self.tui.resume()?;
            }

            if self.should_quit {
                break;
            }
        }

        self.tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Tick => {
                self.action_tx.send(Action::Tick)?;
            }
            Event::Render => {
                self.draw_ui()?;
            }
            Event::Key(key_event) => {
                self.handle_key_event(key_event)?;
            }
            Event::Resize(w, h) => {
                self.action_tx.send(Action::Resize(w, h))?;
            }
            Event::Init => {
                info!("Application initialized");
            }
            Event::Paste(text) => {
                self.mint_component.handle_paste(&text);
            }
            Event::Error => {
                self.action_tx
                    .send(Action::Error("Terminal input error".to_string()))?;
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.action_tx.send(Action::Quit)?,
                KeyCode::Char('z') => self.action_tx.send(Action::Suspend)?,
                _ => {}
            }
            return Ok(());
        }

        // The popup and loader own the keyboard while shown.
        if self.mint_component.is_capturing_input() {
            return self.mint_component.handle_key_event(key);
        }

        match key.code {
            KeyCode::Char('q') => self.action_tx.send(Action::Quit)?,
            KeyCode::Char('r') => self.action_tx.send(Action::Refresh)?,
            KeyCode::Char('x') => self.notifications_component.handle_key_event(key)?,
            _ => self.mint_component.handle_key_event(key)?,
        }
        Ok(())
    }

    fn handle_action(&mut self, action: Action) -> Result<()> {
        if action != Action::Tick {
            debug!("{action:?}");
        }

        match action {
            Action::Tick => {
                self.notifications_component.tick();
            }
            Action::Resize(w, h) => {
                self.tui.resize(Rect::new(0, 0, w, h))?;
            }
            Action::Suspend => {
                self.should_suspend = true;
            }
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Error(message) => {
                self.status_message = format!("Error: {}", message);
            }
            Action::Refresh => {
                self.store.refresh();
                self.status_message = "Refreshing jetton details...".to_string();
            }
            Action::SubmitMint => match self.mint_component.begin_submit() {
                Ok(job) => {
                    self.status_message = format!("Minting {} base units...", job.base_units());
                    let action_tx = self.action_tx.clone();
                    tokio::spawn(async move {
                        let outcome = job.run().await;
                        if let Err(e) = action_tx.send(Action::MintSettled(outcome)) {
                            warn!("Mint settled after shutdown: {}", e);
                        }
                    });
                }
                Err(skipped) => {
                    debug!("Mint submit skipped: {}", skipped);
                }
            },
            Action::MintSettled(outcome) => {
                self.status_message = match &outcome {
                    MintOutcome::Minted { .. } => "Mint confirmed".to_string(),
                    MintOutcome::Rejected(_) | MintOutcome::Aborted(_) => "Mint failed".to_string(),
                };
                self.mint_component.finish_submit(outcome);
            }
            Action::Notify(notification) => {
                self.notifications_component.push(notification);
            }
        }
        Ok(())
    }

    fn draw_ui(&mut self) -> Result<()> {
        self.token_component.context = self.store.context();
        let context = self.token_component.context.clone();
        let testnet = self.token_component.testnet;
        let mint_view = self.mint_component.view();
        let toasts = self.notifications_component.toasts.clone();
        let status_message = self.status_message.clone();
        let network = self.config.network.name.clone();

        self.tui.draw(|f| {
            Self::draw(f, &context, testnet, &mint_view, &toasts, &status_message, &network);
        })?;
        Ok(())
    }

    fn draw(
        f: &mut Frame,
        context: &TokenContext,
        testnet: bool,
        mint_view: &MintView,
        toasts: &[Toast],
        status_message: &str,
        network: &str,
    ) {
        let area = f.area();
        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(7),
            Constraint::Length(3),
        ])
        .split(area);

        Self::draw_header(f, chunks[0], network);
        TokenComponent::draw_static(
            f,
            chunks[1],
            context,
            testnet,
            MintComponent::trigger_line(mint_view),
        );
        NotificationsComponent::draw_static(f, chunks[2], toasts);
        Self::draw_status(f, chunks[3], status_message);

        // Overlays last so they cover the panels.
        MintComponent::draw_static(f, area, mint_view);
    }

    fn draw_header(f: &mut Frame, area: Rect, network: &str) {
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                "Jetton Minter",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format!("[{}]", network), Style::default().fg(Color::Yellow)),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(header, area);
    }

    fn draw_status(f: &mut Frame, area: Rect, status_message: &str) {
        let status = Paragraph::new(Line::from(vec![
            Span::styled(status_message, Style::default().fg(Color::Green)),
            Span::raw("  "),
            Span::styled(
                "[r] Refresh  [x] Dismiss  [q] Quit",
                Style::default().fg(Color::DarkGray),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(status, area);
    }
}
