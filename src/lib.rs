#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]
#![deny(clippy::use_self, rust_2018_idioms)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

use std::{
    sync::{mpsc, Arc},
    time::{Duration, Instant},
};

use config::Config;
use eframe::egui::{
    self, Button, CentralPanel, Context, Grid, Layout, ScrollArea, TopBottomPanel, Window,
};
use list::AlarmList;
use presenter::{ChangeOrigin, RowPresenter};
use scheduler::LocalScheduler;
use store::AlarmStore;
use toast::Toasts;
use writer::PersistQueue;

pub mod alarm;
pub mod config;
pub mod error;
pub mod list;
pub mod presenter;
pub mod scheduler;
pub mod store;
pub mod toast;
pub mod writer;

pub use error::{Error, Result};

/// a tap on the time of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowTap {
    pub position: usize,
    pub id: alarm::AlarmId,
}

/// the alarm list screen
pub struct AlarmApp {
    config: Config,
    store: Arc<dyn AlarmStore>,
    list: AlarmList,
    presenter: RowPresenter<LocalScheduler>,
    taps: mpsc::Receiver<RowTap>,
    selected: Option<RowTap>,
    // revision of the list the selection was made on
    seen_revision: u64,
    toasts: Toasts,
}

impl AlarmApp {
    #[must_use]
    pub fn new(config: Config, store: Arc<dyn AlarmStore>) -> Self {
        let writer = PersistQueue::spawn(Arc::clone(&store), config.persist_workers);
        let (sender, taps) = mpsc::channel();
        let presenter = RowPresenter::new(LocalScheduler::new(), writer, move |position, id| {
            // the receiver lives as long as the app
            let _ = sender.send(RowTap { position, id });
        });
        let mut app = Self {
            toasts: Toasts::new(config.notice_duration()),
            config,
            store,
            list: AlarmList::new(),
            presenter,
            taps,
            selected: None,
            seen_revision: 0,
        };
        app.reload();
        app
    }

    /// reads every alarm back from the store, whatever is stored wins over what is on screen
    fn reload(&mut self) {
        match self.store.load_all() {
            Ok(records) => {
                log::info!("loaded {} alarms", records.len());
                self.presenter.scheduler_mut().sync(&records);
                self.list.set_displayed_sequence(records);
            }
            Err(e) => log::error!("couldn't load alarms: {e}"),
        }
    }

    fn render_header(&mut self, ctx: &Context) {
        TopBottomPanel::top("time_and_ctrl").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let theme_btn = ui.add(Button::new({
                    if self.config.theme == config::Theme::Dark {
                        "🌞"
                    } else {
                        "🌙"
                    }
                }));
                if theme_btn.clicked() {
                    self.config.theme = !self.config.theme;
                }
                ui.label(format!(
                    "Time: {}",
                    chrono::Local::now()
                        .naive_local()
                        .format(&self.config.time_format)
                ));
                ui.with_layout(Layout::right_to_left(egui::Align::Min), |ui| {
                    if ui.button("⟳").on_hover_text("reload alarms").clicked() {
                        self.reload();
                    }
                });
            });
        });
    }

    fn list_alarms(&mut self, ui: &mut egui::Ui) {
        for i in 0..self.list.row_count() {
            let row = self.list.bind_row(i, &self.config.time_format);
            if ui.button(row.time_label.as_str()).clicked() {
                self.presenter.on_time_tapped(&self.list, i);
            }
            let mut enabled = row.enabled;
            if ui.checkbox(&mut enabled, "on").clicked() {
                self.presenter
                    .on_enabled_toggled(&mut self.list, i, enabled, ChangeOrigin::User);
            }
            let mut repeating = row.repeating;
            if ui.checkbox(&mut repeating, "repeat").clicked() {
                self.presenter
                    .on_repeat_toggled(&mut self.list, i, repeating, ChangeOrigin::User);
            }
            ui.end_row();
        }
    }

    fn render_details(&mut self, ctx: &Context) {
        let Some(tap) = self.selected else {
            return;
        };
        let Some(record) = self.list.records().get(tap.position).filter(|r| r.id == tap.id) else {
            self.selected = None;
            return;
        };
        let mut open = true;
        Window::new(format!("alarm {}", tap.id))
            .auto_sized()
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(format!("rings at {}", record.time_label(&self.config.time_format)));
                ui.label(if record.repeating {
                    "every day"
                } else {
                    "once"
                });
                if let Some(next) = self.presenter.scheduler().next_fire(record.id) {
                    ui.label(format!("next: {}", next.format("%a %H:%M")));
                }
            });
        if !open {
            self.selected = None;
        }
    }

    fn poll_taps(&mut self) {
        // a reload rebuilt every row, positions from before it mean nothing
        if self.list.revision() != self.seen_revision {
            self.seen_revision = self.list.revision();
            self.selected = None;
        }
        if let Some(tap) = self.taps.try_iter().last() {
            self.selected = Some(tap);
        }
    }

    fn ring_due_alarms(&mut self) {
        let now = chrono::Local::now().naive_local();
        for fired in self.presenter.scheduler_mut().fire_due(now) {
            self.toasts.push(
                format!("alarm {} ringing", fired.time.format(&self.config.time_format)),
                Instant::now(),
            );
            if !fired.repeating {
                self.presenter.on_alarm_fired(&mut self.list, fired.id);
            }
        }
    }
}

impl eframe::App for AlarmApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(self.config.theme.into());

        self.poll_taps();
        self.ring_due_alarms();

        self.render_header(ctx);
        CentralPanel::default().show(ctx, |ui| {
            if !self.list.has_sequence() {
                ui.label("alarms couldn't be loaded, see the log");
            } else if self.list.row_count() == 0 {
                ui.label("no alarms yet, add one with `simple_alarm new-alarm HH:MM`");
            }
            ScrollArea::vertical().show(ui, |ui| {
                Grid::new("alarms").show(ui, |ui| {
                    self.list_alarms(ui);
                });
            });
        });
        self.render_details(ctx);

        let now = chrono::Local::now().naive_local();
        for notice in self.presenter.take_notices() {
            self.toasts.push(notice.message(now), Instant::now());
        }
        self.toasts.render(ctx);

        // alarms are checked once per frame
        ctx.request_repaint_after(Duration::from_secs(1));
    }
}
