//! Room temperature readout.
//!
//! A single window with a port picker and one big label showing the latest
//! `TEMP:` reading from the serial device. The egui shell only dispatches
//! into the panel and the actor system; all telemetry logic lives in the
//! library crates.

use actor_runtime::{actor_debug, Actor, ChannelManager};
use eframe::egui;
use futures_channel::mpsc;
use link_actors::{LinkActor, PortActor};
use panels::{Panel, TemperaturePanel};
use protocol::{LinkState, SerialSettings, UiCommand, UiEvent};

/// The temperature firmware talks at 9600 baud, 8N1.
const BAUD_RATE: u32 = 9600;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let app = RoomTempApp::new(rt);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 240.0])
            .with_title("Room Temperature"),
        ..Default::default()
    };
    eframe::run_native(
        "Room Temperature",
        native_options,
        Box::new(move |_cc| Box::new(app)),
    )?;
    Ok(())
}

struct RoomTempApp {
    // The runtime must outlive the actors spawned on it.
    _rt: tokio::runtime::Runtime,
    manager: ChannelManager,
    event_rx: mpsc::Receiver<UiEvent>,

    panel: TemperaturePanel,
    link_state: LinkState,
    ports: Vec<protocol::PortInfo>,
    selected_port: usize,
    status: Option<String>,
}

impl RoomTempApp {
    fn new(rt: tokio::runtime::Runtime) -> Self {
        let (mut manager, handles) = ChannelManager::new();
        let event_rx = manager.take_event_receiver();

        let link = LinkActor::new(manager.port_sender(), handles.event_tx.clone());
        let port = PortActor::new(manager.link_sender(), handles.event_tx.clone());
        rt.spawn(link.run(handles.link_rx, handles.event_tx.clone()));
        rt.spawn(port.run(handles.port_rx, handles.event_tx));

        let mut app = Self {
            _rt: rt,
            manager,
            event_rx,
            panel: TemperaturePanel::new(),
            link_state: LinkState::Disconnected,
            ports: Vec::new(),
            selected_port: 0,
            status: None,
        };
        app.send(UiCommand::RefreshPorts);
        app
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
    }

    fn on_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::StateChanged { state } => {
                self.link_state = state;
                if state == LinkState::Disconnected {
                    // Back to the placeholder; the last reading is stale.
                    self.panel.clear();
                }
            }
            UiEvent::PortsListed { ports } => {
                self.ports = ports;
                if self.selected_port >= self.ports.len() {
                    self.selected_port = 0;
                }
            }
            UiEvent::LineReceived { line } => {
                if !self.panel.on_line(&line) {
                    actor_debug!(
                        "room-temp: unparsed line at {}us: {:?}",
                        line.timestamp_us,
                        line.text
                    );
                }
            }
            UiEvent::Error { message } => {
                self.status = Some(message);
            }
        }
    }

    fn connect_selected(&mut self) {
        let Some(port) = self.ports.get(self.selected_port).cloned() else {
            self.status = Some("No serial port selected".into());
            return;
        };
        self.status = None;
        self.send(UiCommand::Connect {
            port,
            settings: SerialSettings::new_8n1(BAUD_RATE),
            greeting: None,
        });
    }
}

impl eframe::App for RoomTempApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            let idle = self.link_state == LinkState::Disconnected;

            ui.horizontal(|ui| {
                // Port selection is frozen while a session is active.
                ui.add_enabled_ui(idle, |ui| {
                    let selected_text = self
                        .ports
                        .get(self.selected_port)
                        .map(|p| p.display_label())
                        .unwrap_or_else(|| "No ports found".to_string());
                    egui::ComboBox::from_id_source("port_picker")
                        .width(200.0)
                        .selected_text(selected_text)
                        .show_ui(ui, |ui| {
                            for (i, port) in self.ports.iter().enumerate() {
                                ui.selectable_value(&mut self.selected_port, i, port.display_label());
                            }
                        });
                });

                if ui.add_enabled(idle, egui::Button::new("Refresh")).clicked() {
                    self.send(UiCommand::RefreshPorts);
                }

                if self.link_state.button_shows_disconnect() {
                    if ui.button("Disconnect").clicked() {
                        self.send(UiCommand::Disconnect);
                    }
                } else if ui.add_enabled(idle, egui::Button::new("Connect")).clicked() {
                    self.connect_selected();
                }
            });

            ui.separator();

            ui.vertical_centered(|ui| {
                ui.add_space(32.0);
                ui.label(egui::RichText::new(self.panel.label()).size(44.0).strong());
                ui.add_space(24.0);
            });

            match &self.status {
                Some(message) => {
                    ui.label(egui::RichText::new(message).color(egui::Color32::RED));
                }
                None => {
                    ui.label(self.link_state.status_text());
                }
            }
        });

        // Keep polling actor events even while the user is idle.
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
