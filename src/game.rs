use egui::{Pos2, Rect};
use web_time::Duration;

use crate::{
    canvas::Canvas,
    config::Playfield,
    input::{Action, ActionRegistry, InputState},
    scene::Scene,
};

/// One game session: owns the input state, the action wiring, the active
/// scene and the tick scheduling. Everything runs on one logical thread;
/// ticks never overlap because the next one is only requested once the
/// current one has completed.
pub struct Game<S: Scene> {
    fps: f32,
    tick_interval: Duration,
    field: Playfield,
    input: InputState,
    actions: ActionRegistry<S>,
    scene: Option<S>,
    pending_scene: Option<S>,
    debug: bool,
    running: bool,
    tick_counter: u64,
}

impl<S: Scene> Game<S> {
    pub fn new(fps: f32, field: Playfield) -> Self {
        Self {
            fps,
            tick_interval: Duration::from_secs_f32(1.0 / fps),
            field,
            input: InputState::new(),
            actions: ActionRegistry::new(),
            scene: None,
            pending_scene: None,
            debug: false,
            running: false,
            tick_counter: 0,
        }
    }

    /// Wires a held key to a gameplay effect. Effects run during the input
    /// phase, in registration order. There is no unregistration.
    pub fn register_action(&mut self, key: egui::Key, action: Action<S>) {
        self.actions.register(key, action);
    }

    pub fn registered_keys(&self) -> impl Iterator<Item = egui::Key> + '_ {
        self.actions.keys()
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Starts the session. The only sanctioned call site is the bootstrap
    /// path, once every asset has loaded.
    pub fn run_with_scene(&mut self, scene: S) {
        self.scene = Some(scene);
        self.running = true;
        log::info!("session started at {} ticks/s", self.fps);
    }

    /// Queues a wholesale scene swap. It lands at the next tick boundary,
    /// never mid-tick: the current tick's phases all keep reading the scene
    /// they started with.
    pub fn replace_scene(&mut self, scene: S) {
        self.pending_scene = Some(scene);
    }

    pub fn scene(&self) -> Option<&S> {
        self.scene.as_ref()
    }

    pub fn toggle_debug(&mut self) {
        self.debug = !self.debug;
        log::info!("debug {}", if self.debug { "on" } else { "off" });
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Cancels the loop: once stopped, `tick` asks for no further schedule.
    pub fn stop(&mut self) {
        self.running = false;
        log::info!("session stopped after {} ticks", self.tick_counter);
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Runs the input and update phases of one tick and returns the delay
    /// until the next one should run (`1/fps`, a fixed-delay schedule that
    /// does not account for phase cost). Returns `None` once the session is
    /// stopped or not yet started.
    ///
    /// Panics if the scene has gone missing while running; that is a
    /// programming error, not a recoverable condition.
    pub fn tick(&mut self) -> Option<Duration> {
        if !self.running {
            return None;
        }

        if let Some(scene) = self.pending_scene.take() {
            self.scene = Some(scene);
            log::info!("scene swapped in at tick {}", self.tick_counter);
        }

        let Some(scene) = self.scene.as_mut() else {
            panic!("tick with no scene; start the session with run_with_scene");
        };

        // Input phase: effects fire for every held key, in registration
        // order.
        for (key, action) in self.actions.entries_mut() {
            if self.input.is_down(*key) {
                action(scene);
            }
        }

        // Update phase: physics is frozen while the debug flag is set, but
        // input and draw keep running.
        if !self.debug {
            scene.update();
        }

        self.tick_counter += 1;
        Some(self.tick_interval)
    }

    /// Clear and draw phases: erase the playfield, draw the scene, then the
    /// debug overlays.
    pub fn render(&self, canvas: &Canvas<'_>) {
        let Some(scene) = self.scene.as_ref() else {
            panic!("render with no scene; start the session with run_with_scene");
        };

        canvas.clear(Rect::from_min_size(
            Pos2::ZERO,
            egui::vec2(self.field.w, self.field.h),
        ));
        scene.draw(canvas);

        if self.debug {
            scene.draw_debug(canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::Drawable;
    use egui::Key;

    #[derive(Default)]
    struct TestScene {
        id: u32,
        updates: u32,
        log: Vec<&'static str>,
    }

    impl Drawable for TestScene {
        fn draw(&self, _canvas: &Canvas<'_>) {}
    }

    impl Scene for TestScene {
        fn update(&mut self) {
            self.updates += 1;
        }
    }

    fn field() -> Playfield {
        Playfield { w: 400.0, h: 600.0 }
    }

    #[test]
    fn test_tick_cadence_at_60_fps() {
        let mut game: Game<TestScene> = Game::new(60.0, field());
        game.run_with_scene(TestScene::default());

        for _ in 0..10 {
            let delay = game.tick().unwrap();
            assert!((delay.as_secs_f32() - 1.0 / 60.0).abs() < 1e-4);
        }
        assert_eq!(game.tick_count(), 10);
    }

    #[test]
    fn test_tick_before_start_and_after_stop() {
        let mut game: Game<TestScene> = Game::new(60.0, field());
        assert!(game.tick().is_none());

        game.run_with_scene(TestScene::default());
        assert!(game.tick().is_some());

        game.stop();
        assert!(game.tick().is_none());
    }

    #[test]
    fn test_scene_swap_lands_at_tick_boundary() {
        let mut game: Game<TestScene> = Game::new(60.0, field());
        game.run_with_scene(TestScene {
            id: 1,
            ..Default::default()
        });
        game.tick();

        game.replace_scene(TestScene {
            id: 2,
            ..Default::default()
        });
        // Still the old scene until the next tick starts.
        assert_eq!(game.scene().unwrap().id, 1);

        game.tick();
        assert_eq!(game.scene().unwrap().id, 2);
        assert_eq!(game.scene().unwrap().updates, 1);
    }

    #[test]
    fn test_debug_flag_freezes_updates_only() {
        let mut game: Game<TestScene> = Game::new(60.0, field());
        game.run_with_scene(TestScene::default());

        game.tick();
        assert_eq!(game.scene().unwrap().updates, 1);

        game.toggle_debug();
        for _ in 0..3 {
            assert!(game.tick().is_some(), "frozen frames still reschedule");
        }
        assert_eq!(game.scene().unwrap().updates, 1);

        game.toggle_debug();
        game.tick();
        assert_eq!(game.scene().unwrap().updates, 2);
    }

    #[test]
    fn test_held_keys_fire_actions_in_registration_order() {
        let mut game: Game<TestScene> = Game::new(60.0, field());
        game.register_action(Key::A, Box::new(|s| s.log.push("first")));
        game.register_action(Key::A, Box::new(|s| s.log.push("second")));
        game.register_action(Key::B, Box::new(|s| s.log.push("never")));
        game.run_with_scene(TestScene::default());

        game.input_mut().set(Key::A, true);
        game.tick();

        let scene = game.scene().unwrap();
        assert_eq!(scene.log, vec!["first", "second"]);
        assert_eq!(scene.updates, 1);
    }

    #[test]
    fn test_released_keys_fire_nothing() {
        let mut game: Game<TestScene> = Game::new(60.0, field());
        game.register_action(Key::A, Box::new(|s| s.log.push("left")));
        game.run_with_scene(TestScene::default());

        game.input_mut().set(Key::A, true);
        game.input_mut().set(Key::A, false);
        game.tick();

        assert!(game.scene().unwrap().log.is_empty());
    }
}
