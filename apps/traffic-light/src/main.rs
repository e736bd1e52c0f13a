//! Traffic-light display.
//!
//! Shows a three-lamp signal with a countdown. The cycle runs locally on a
//! 100ms ticker and follows `STATE:` overrides from the serial device. On
//! startup the app auto-detects the device port (or takes it as the first
//! CLI argument), connects at 115200 baud and sends `REQ\n` to ask the
//! firmware for its current state.

use actor_runtime::{actor_debug, spawn_ticker, Actor, ChannelManager, TickerHandle};
use core_types::{LightColor, UserAction};
use eframe::egui;
use futures_channel::mpsc;
use link_actors::{detect, LinkActor, PortActor};
use panels::{LightDurations, Panel, TrafficPanel};
use protocol::{LinkState, PortInfo, SerialSettings, UiCommand, UiEvent};

const BAUD_RATE: u32 = 115200;
const GREETING: &[u8] = b"REQ\n";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let port_override = std::env::args().nth(1);
    let app = TrafficApp::new(rt, port_override);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([260.0, 480.0])
            .with_title("Traffic Light"),
        ..Default::default()
    };
    eframe::run_native(
        "Traffic Light",
        native_options,
        Box::new(move |_cc| Box::new(app)),
    )?;
    Ok(())
}

struct TrafficApp {
    rt: tokio::runtime::Runtime,
    manager: ChannelManager,
    event_rx: mpsc::Receiver<UiEvent>,

    // The ticker sends on tick_tx; a stored clone keeps the channel open
    // across ticker restarts.
    tick_tx: mpsc::Sender<()>,
    tick_rx: mpsc::Receiver<()>,
    ticker: Option<TickerHandle>,

    durations: LightDurations,
    panel: TrafficPanel,
    link_state: LinkState,
    status: Option<String>,
}

impl TrafficApp {
    fn new(rt: tokio::runtime::Runtime, port_override: Option<String>) -> Self {
        let (mut manager, handles) = ChannelManager::new();
        let event_rx = manager.take_event_receiver();

        let link = LinkActor::new(manager.port_sender(), handles.event_tx.clone());
        let port = PortActor::new(manager.link_sender(), handles.event_tx.clone());
        rt.spawn(link.run(handles.link_rx, handles.event_tx.clone()));
        rt.spawn(port.run(handles.port_rx, handles.event_tx));

        let (tick_tx, tick_rx) = mpsc::channel(32);
        let durations = LightDurations::default();

        let mut app = Self {
            rt,
            manager,
            event_rx,
            tick_tx,
            tick_rx,
            ticker: None,
            durations,
            panel: TrafficPanel::new(durations),
            link_state: LinkState::Disconnected,
            status: None,
        };
        app.connect_on_startup(port_override);
        app
    }

    /// Resolve the device port and open it. An explicit CLI argument wins;
    /// otherwise the first port matching a USB adapter hint is used.
    fn connect_on_startup(&mut self, port_override: Option<String>) {
        let port = match port_override {
            Some(name) => Some(PortInfo::new(name, None, None)),
            None => match detect::list_ports() {
                Ok(ports) => detect::auto_detect(&ports).cloned(),
                Err(e) => {
                    self.status = Some(e.to_string());
                    return;
                }
            },
        };

        let Some(port) = port else {
            self.status = Some("Serial port not found".to_string());
            return;
        };

        self.send(UiCommand::Connect {
            port,
            settings: SerialSettings::new_8n1(BAUD_RATE),
            greeting: Some(GREETING.to_vec()),
        });
    }

    fn send(&mut self, cmd: UiCommand) {
        if let Err(message) = self.manager.send_command(cmd) {
            self.status = Some(message);
        }
    }

    fn drain_events(&mut self) {
        loop {
            match self.event_rx.try_next() {
                Ok(Some(event)) => self.on_event(event),
                Ok(None) | Err(_) => break,
            }
        }
        while let Ok(Some(())) = self.tick_rx.try_next() {
            self.panel.on_tick();
        }
    }

    fn on_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::StateChanged { state } => {
                self.link_state = state;
                if state == LinkState::Connected {
                    // The firmware answers REQ with a STATE line; start the
                    // local cycle meanwhile so the display is live at once.
                    self.status = None;
                    self.panel.start();
                }
            }
            UiEvent::LineReceived { line } => {
                if !self.panel.on_line(&line) {
                    actor_debug!(
                        "traffic-light: unparsed line at {}us: {:?}",
                        line.timestamp_us,
                        line.text
                    );
                }
            }
            UiEvent::Error { message } => {
                self.status = Some(message);
            }
            // No port picker in this app.
            UiEvent::PortsListed { .. } => {}
        }
    }

    /// Keep the ticker task in lockstep with the panel's running flag,
    /// whichever side changed it (buttons, hardware override, reset).
    fn sync_ticker(&mut self) {
        if self.panel.running() {
            if self.ticker.is_none() {
                let _guard = self.rt.enter();
                self.ticker = Some(spawn_ticker(
                    self.tick_tx.clone(),
                    self.durations.tick_interval_ms,
                ));
            }
        } else if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    fn draw_signal(&self, ui: &mut egui::Ui) {
        let desired = egui::vec2(110.0, 300.0);
        let (rect, _response) = ui.allocate_exact_size(desired, egui::Sense::hover());
        let painter = ui.painter();

        painter.rect_filled(rect, egui::Rounding::same(14.0), egui::Color32::from_rgb(35, 35, 35));

        let radius = 38.0;
        let x = rect.center().x;
        let ys = [
            rect.top() + rect.height() / 6.0,
            rect.top() + rect.height() / 2.0,
            rect.top() + rect.height() * 5.0 / 6.0,
        ];

        for (color, y) in LightColor::ALL.into_iter().zip(ys) {
            let center = egui::pos2(x, y);
            let lit = self.panel.lamp_is_lit(color);
            painter.circle_filled(center, radius, lamp_fill(color, lit));
            if lit {
                painter.circle_stroke(
                    center,
                    radius - 4.0,
                    egui::Stroke::new(3.0, egui::Color32::from_white_alpha(90)),
                );
            }
        }
    }
}

/// Lamp colors; inactive lamps are the same hue strongly darkened.
fn lamp_fill(color: LightColor, lit: bool) -> egui::Color32 {
    let (r, g, b) = match color {
        LightColor::Green => (46, 204, 113),
        LightColor::Yellow => (241, 196, 15),
        LightColor::Red => (231, 76, 60),
    };
    if lit {
        egui::Color32::from_rgb(r, g, b)
    } else {
        egui::Color32::from_rgb(r / 5, g / 5, b / 5)
    }
}

impl eframe::App for TrafficApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.sync_ticker();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                // The headline doubles as the error display, as long as the
                // link is not up.
                let headline = match &self.status {
                    Some(message) => message.clone(),
                    None => self.panel.countdown_label(),
                };
                ui.label(egui::RichText::new(headline).size(24.0).strong());
                ui.add_space(8.0);

                self.draw_signal(ui);
                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    // Center the button row by hand; egui has no h-center
                    // for horizontal groups.
                    ui.add_space(30.0);
                    let toggle_text = if self.panel.running() { "Stop" } else { "Start" };
                    if ui.button(toggle_text).clicked() {
                        self.status = None;
                        self.panel.on_user_action(UserAction::ToggleRunning);
                    }
                    if ui.button("Reset").clicked() {
                        self.status = None;
                        self.panel.on_user_action(UserAction::Reset);
                    }
                });
                ui.add_space(8.0);

                ui.label(self.link_state.status_text());
            });
        });

        self.sync_ticker();

        // Repaint at the tick period so the countdown stays smooth.
        ctx.request_repaint_after(std::time::Duration::from_millis(50));
    }
}
