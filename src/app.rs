use egui::{emath::TSTransform, Color32};
use ringbuffer::RingBuffer;
use thiserror::Error;

use crate::{
    assets::{AssetError, AssetLibrary},
    canvas::Canvas,
    config::{Config, ConfigError},
    game::Game,
    scene::{MainScene, SceneError},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Assets(#[from] AssetError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

pub struct App {
    game: Game<MainScene>,
    assets: AssetLibrary,
    config: Config,
    next_tick: Option<web_time::Instant>,
    previous_frame_times: ringbuffer::AllocRingBuffer<web_time::Instant>,
}

impl App {
    /// Bootstraps the built-in session. This is the on-ready path: it only
    /// returns once every manifest asset has loaded, and a load failure
    /// aborts startup naming the offending asset.
    pub fn classic(cc: &eframe::CreationContext<'_>) -> Result<Self, AppError> {
        Self::with_config(cc, Config::classic())
    }

    pub fn with_config(cc: &eframe::CreationContext<'_>, config: Config) -> Result<Self, AppError> {
        config.validate()?;

        let assets = AssetLibrary::load_all(&cc.egui_ctx, &config.manifest)?;
        let scene = MainScene::new(&assets, config.playfield)?;

        let mut game = Game::new(config.fps, config.playfield);
        game.register_action(egui::Key::A, Box::new(MainScene::nudge_left));
        game.register_action(egui::Key::ArrowLeft, Box::new(MainScene::nudge_left));
        game.register_action(egui::Key::D, Box::new(MainScene::nudge_right));
        game.register_action(egui::Key::ArrowRight, Box::new(MainScene::nudge_right));
        game.register_action(egui::Key::Space, Box::new(MainScene::fire));
        game.run_with_scene(scene);

        Ok(Self {
            game,
            assets,
            config,
            next_tick: None,
            previous_frame_times: ringbuffer::AllocRingBuffer::new(128),
        })
    }

    fn compute_fps(&self) -> f32 {
        if self.previous_frame_times.len() < 2 {
            return self.config.fps;
        }

        let first = self.previous_frame_times.front().unwrap();
        let last = self.previous_frame_times.back().unwrap();
        let elapsed_secs = (*last - *first).as_secs_f32();

        (self.previous_frame_times.len() as f32 - 1.0) / elapsed_secs
    }

    /// Maps playfield coordinates onto the widget rect, preserving aspect
    /// ratio and centering.
    fn playfield_transform(&self, canvas_rect: egui::Rect) -> TSTransform {
        let field = self.config.playfield;
        let scale = (canvas_rect.width() / field.w).min(canvas_rect.height() / field.h);

        TSTransform {
            scaling: scale,
            translation: canvas_rect.center().to_vec2()
                - egui::vec2(field.w, field.h) * (scale / 2.0),
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.previous_frame_times.push(web_time::Instant::now());

        // Key events mutate only the held-key map; the tick reads it once in
        // its input phase.
        let keys: Vec<egui::Key> = self.game.registered_keys().collect();
        ctx.input(|i| {
            for key in keys {
                self.game.input_mut().set(key, i.key_down(key));
            }
            if i.key_pressed(egui::Key::P) {
                self.game.toggle_debug();
            }
        });

        let now = web_time::Instant::now();
        let due = self.next_tick.map_or(true, |deadline| now >= deadline);

        let delay = if due {
            let delay = self.game.tick();
            if let Some(delay) = delay {
                self.next_tick = Some(now + delay);
            }

            // A cleared wall swaps in a fresh scene at the next boundary.
            if self.game.scene().is_some_and(|scene| scene.cleared()) {
                match MainScene::new(&self.assets, self.config.playfield) {
                    Ok(scene) => self.game.replace_scene(scene),
                    Err(err) => {
                        log::error!("failed to rebuild scene: {err}");
                        self.game.stop();
                    }
                }
            }

            delay
        } else {
            self.next_tick.map(|deadline| deadline - now)
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::hover());

            let transform = self.playfield_transform(response.rect);
            let canvas = Canvas::new(&painter, transform, Color32::BLACK);

            self.game.render(&canvas);

            if self.game.debug() {
                canvas.draw_text(
                    &format!("fps {:.0} / tick {}", self.compute_fps(), self.game.tick_count()),
                    egui::pos2(self.config.playfield.w / 2.0, self.config.playfield.h - 8.0),
                    14.0,
                    Color32::YELLOW,
                );
            }
        });

        // Fixed-delay reschedule; a stopped session requests nothing more.
        if let Some(delay) = delay {
            ctx.request_repaint_after(delay);
        }
    }
}
