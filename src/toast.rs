use std::time::{Duration, Instant};

use eframe::egui::{self, Align2, Area, Context, Frame, Id};

/// messages that disappear on their own after a while
#[derive(Debug)]
pub struct Toasts {
    lifetime: Duration,
    entries: Vec<(String, Instant)>,
}

impl Toasts {
    #[must_use]
    pub const fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, message: String, now: Instant) {
        log::info!("{message}");
        self.entries.push((message, now + self.lifetime));
    }

    /// drops everything that has been shown long enough
    pub fn prune(&mut self, now: Instant) {
        self.entries.retain(|(_, expires)| *expires > now);
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(message, _)| message.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&mut self, ctx: &Context) {
        self.prune(Instant::now());
        if self.is_empty() {
            return;
        }
        Area::new(Id::new("toasts"))
            .anchor(Align2::CENTER_BOTTOM, egui::vec2(0.0, -16.0))
            .show(ctx, |ui| {
                for message in self.messages() {
                    Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(message);
                    });
                }
            });
        // keep repainting so expired toasts go away without input
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}
