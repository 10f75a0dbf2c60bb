use eframe::egui;
use std::path::PathBuf;
use std::time::Instant;

use crate::carousel::{Carousel, Direction, Layout, MountedCarousel};
use crate::config::Config;
use crate::deck::{Deck, Testimonial};
use crate::frame_loop::FrameLoop;
use crate::theme::Theme;

const STRIP_HEIGHT: f32 = 300.0;
const CARD_PADDING: f32 = 24.0;
const CARD_ROUNDING: f32 = 12.0;
const BADGE_RADIUS: f32 = 24.0;
const CONTROL_RADIUS: f32 = 24.0;
const CONTROL_MARGIN: f32 = 16.0;
const TOAST_DURATION: f32 = 1.5;
const HINT: &str = "Hover to pause \u{00B7} \u{2190}/\u{2192} step while paused \u{00B7} \
                    T theme \u{00B7} Esc quit";

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        let fade_start = 1.0;
        if elapsed < fade_start {
            1.0
        } else if elapsed < TOAST_DURATION {
            1.0 - (elapsed - fade_start) / (TOAST_DURATION - fade_start)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= TOAST_DURATION
    }
}

struct ReelApp {
    title: Option<String>,
    carousel: MountedCarousel<Testimonial>,
    frame_loop: FrameLoop,
    theme: Theme,
    toast: Option<Toast>,
    last_frame: Instant,
}

impl ReelApp {
    fn new(deck: Deck, layout: Layout, theme: Theme) -> Self {
        let frame_loop = FrameLoop::default();
        let carousel = Carousel::new(deck.testimonials, layout).mount(&frame_loop);
        Self {
            title: deck.title,
            carousel,
            frame_loop,
            theme,
            toast: None,
            last_frame: Instant::now(),
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.toast = Some(Toast::new(format!("Theme: {}", self.theme.name)));
    }

    fn press(&mut self, direction: Direction) {
        let now = self.frame_loop.now();
        if !self.carousel.with_mut(|c| c.press_control(direction, now)) {
            tracing::trace!(%direction, "controls hidden; press ignored");
        }
    }

    fn draw_strip(&self, ui: &egui::Ui, strip: egui::Rect) {
        let painter = ui.painter().with_clip_rect(strip);
        self.carousel.with(|c| {
            let item_width = c.layout().item_width as f32;
            let items = c.items();
            for card in c.surface().frame(c.offset(), strip.width() as f64) {
                let Some(testimonial) = items.get(card.item_index) else {
                    continue;
                };
                let card_rect = egui::Rect::from_min_size(
                    egui::pos2(strip.left() + card.x as f32, strip.top()),
                    egui::vec2(item_width, strip.height()),
                );
                draw_card(&painter, &self.theme, card_rect, testimonial);
            }
        });
    }

    /// Draws prev/next while paused; returns the control clicked this frame.
    fn draw_controls(&self, ui: &egui::Ui, strip: egui::Rect) -> Option<Direction> {
        if !self.carousel.with(|c| c.controls_visible()) {
            return None;
        }
        let y = strip.center().y;
        let inset = CONTROL_RADIUS + CONTROL_MARGIN;
        let controls = [
            (Direction::Backward, strip.left() + inset, "\u{2039}", "reel-prev"),
            (Direction::Forward, strip.right() - inset, "\u{203A}", "reel-next"),
        ];

        let mut clicked = None;
        for (direction, x, glyph, id) in controls {
            let center = egui::pos2(x, y);
            let hit = egui::Rect::from_center_size(center, egui::Vec2::splat(CONTROL_RADIUS * 2.0));
            let response = ui.interact(hit, egui::Id::new(id), egui::Sense::click());

            let (fill, text) = if response.hovered() {
                (self.theme.accent, self.theme.badge_text)
            } else {
                (self.theme.control_background, self.theme.foreground)
            };
            let painter = ui.painter();
            painter.circle_filled(center, CONTROL_RADIUS, fill);
            painter.circle_stroke(
                center,
                CONTROL_RADIUS,
                egui::Stroke::new(1.0, self.theme.card_border),
            );
            let galley = painter.layout_no_wrap(
                glyph.to_string(),
                egui::FontId::proportional(CONTROL_RADIUS * 1.4),
                text,
            );
            painter.galley(center - galley.size() / 2.0, galley, text);

            if response.clicked() {
                clicked = Some(direction);
            }
        }
        clicked
    }

    fn draw_title(&self, ui: &egui::Ui, rect: egui::Rect, strip: egui::Rect) {
        let Some(title) = &self.title else {
            return;
        };
        let galley = ui.painter().layout_no_wrap(
            title.clone(),
            egui::FontId::proportional(self.theme.title_size),
            self.theme.heading_color,
        );
        let pos = egui::pos2(
            rect.center().x - galley.rect.width() / 2.0,
            strip.top() - galley.rect.height() - 48.0,
        );
        ui.painter().galley(pos, galley, self.theme.heading_color);
    }

    fn draw_hint(&self, ui: &egui::Ui, rect: egui::Rect) {
        let color = Theme::faded(self.theme.foreground, 0.4);
        let galley = ui.painter().layout_no_wrap(
            HINT.to_string(),
            egui::FontId::proportional(14.0),
            color,
        );
        let pos = egui::pos2(
            rect.center().x - galley.rect.width() / 2.0,
            rect.bottom() - galley.rect.height() - 24.0,
        );
        ui.painter().galley(pos, galley, color);
    }

    fn draw_toast(&self, ui: &egui::Ui, rect: egui::Rect) {
        let Some(ref toast) = self.toast else {
            return;
        };
        let opacity = toast.opacity();
        if opacity <= 0.0 {
            return;
        }
        let toast_color = Theme::faded(self.theme.foreground, opacity * 0.9);
        let toast_bg = Theme::faded(self.theme.card_background, opacity * 0.9);
        let galley = ui.painter().layout_no_wrap(
            toast.message.clone(),
            egui::FontId::proportional(20.0),
            toast_color,
        );
        let padding = 16.0;
        let toast_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.center().x - galley.rect.width() / 2.0 - padding,
                rect.bottom() - 120.0,
            ),
            egui::vec2(
                galley.rect.width() + padding * 2.0,
                galley.rect.height() + padding * 2.0,
            ),
        );
        ui.painter().rect_filled(toast_rect, 8.0, toast_bg);
        let text_pos = egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding);
        ui.painter().galley(text_pos, galley, toast_color);
    }
}

impl eframe::App for ReelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.frame_loop.advance(now.duration_since(self.last_frame));
        self.last_frame = now;

        let mut close = false;
        let mut toggle_theme = false;
        let mut key_step = None;
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Escape) || i.key_pressed(egui::Key::Q) {
                close = true;
            }
            if i.key_pressed(egui::Key::T) {
                toggle_theme = true;
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                key_step = Some(Direction::Forward);
            }
            if i.key_pressed(egui::Key::ArrowLeft) {
                key_step = Some(Direction::Backward);
            }
        });
        if close {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if toggle_theme {
            self.toggle_theme();
        }
        if let Some(direction) = key_step {
            self.press(direction);
        }

        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }

        let bg = self.theme.background;

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);

                let strip = egui::Rect::from_center_size(
                    rect.center(),
                    egui::vec2(rect.width(), STRIP_HEIGHT),
                );
                let hovered = ui.rect_contains_pointer(strip);
                self.carousel.with_mut(|c| {
                    c.cover_viewport(strip.width() as f64);
                    c.set_hovered(hovered);
                });

                self.draw_title(ui, rect, strip);
                self.draw_strip(ui, strip);
                if let Some(direction) = self.draw_controls(ui, strip) {
                    self.press(direction);
                }
                self.draw_hint(ui, rect);
                self.draw_toast(ui, rect);
            });

        ctx.request_repaint();
    }
}

fn draw_card(painter: &egui::Painter, theme: &Theme, rect: egui::Rect, testimonial: &Testimonial) {
    let painter = painter.with_clip_rect(rect.intersect(painter.clip_rect()));
    painter.rect_filled(rect, CARD_ROUNDING, theme.card_background);
    painter.rect_stroke(
        rect,
        CARD_ROUNDING,
        egui::Stroke::new(1.0, theme.card_border),
        egui::StrokeKind::Inside,
    );

    let inner = rect.shrink(CARD_PADDING);
    let badge_center = inner.left_top() + egui::vec2(BADGE_RADIUS, BADGE_RADIUS);
    painter.circle_filled(badge_center, BADGE_RADIUS, theme.accent);
    let initials = painter.layout_no_wrap(
        testimonial.initials.clone(),
        egui::FontId::proportional(theme.badge_size),
        theme.badge_text,
    );
    painter.galley(
        badge_center - initials.size() / 2.0,
        initials,
        theme.badge_text,
    );

    let name_left = inner.left() + BADGE_RADIUS * 2.0 + 12.0;
    let name = painter.layout(
        testimonial.name.clone(),
        egui::FontId::proportional(theme.name_size),
        theme.heading_color,
        inner.right() - name_left,
    );
    let name_pos = egui::pos2(name_left, badge_center.y - name.rect.height() / 2.0);
    painter.galley(name_pos, name, theme.heading_color);

    let mut y = inner.top() + BADGE_RADIUS * 2.0 + 16.0;
    if !testimonial.highlight.is_empty() {
        let highlight = painter.layout(
            testimonial.highlight.clone(),
            egui::FontId::proportional(theme.highlight_size),
            theme.accent,
            inner.width(),
        );
        let height = highlight.rect.height();
        painter.galley(egui::pos2(inner.left(), y), highlight, theme.accent);
        y += height + 10.0;
    }

    let body = painter.layout(
        testimonial.body.clone(),
        egui::FontId::proportional(theme.body_size),
        theme.foreground,
        inner.width(),
    );
    painter.galley(egui::pos2(inner.left(), y), body, theme.foreground);
}

pub fn run(
    file: Option<PathBuf>,
    windowed: bool,
    theme_override: Option<&str>,
) -> anyhow::Result<()> {
    let deck = match &file {
        Some(path) => Deck::load(path)?,
        None => Deck::sample(),
    };

    let config = Config::load_or_default();
    let layout = config.layout();
    let count = deck.testimonials.len();

    let theme_name = theme_override.or(config.theme()).unwrap_or("light");
    let theme = Theme::from_name(theme_name);

    let title = deck.title.clone().unwrap_or_else(|| match &file {
        Some(path) => format!(
            "reel - {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        ),
        None => "reel".to_string(),
    });

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    tracing::debug!(testimonials = count, ?layout, "starting player");
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(ReelApp::new(deck, layout, theme)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
