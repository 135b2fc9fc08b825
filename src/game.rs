use crate::config::{Settings, POPULATION_RANGE, SPEED_RANGE};
use crate::entity::Kind;
use crate::session::{Action, Screen, Session};
use crate::ui::{self, Button, Slider, SpriteMeshes};
use crate::world::{World, ARENA_SIZE};
use ggez::{
    event,
    graphics::{self, Canvas, DrawMode, Mesh, Rect},
    input::keyboard::{KeyCode, KeyInput},
    input::mouse::MouseButton,
    Context, GameError, GameResult,
};
use tracing::debug;

/// Simulation ticks per second
pub const TICK_RATE: u32 = 60;

const PLAY: Button = Button::new("PLAY", [250.0, 350.0]);
const RESTART: Button = Button::new("Restart", [250.0, 300.0]);
const MAIN_MENU: Button = Button::new("Main menu", [250.0, 350.0]);

//////////////////////////////////////////////////////////////////////////////
// Game State Implementation
//////////////////////////////////////////////////////////////////////////////

/// Owns the session and everything needed to show it
pub struct GameState {
    session: Session,
    speed_slider: Slider,
    population_slider: Slider,
    sprites: SpriteMeshes,
}

impl GameState {
    pub fn new(ctx: &mut Context, settings: Settings) -> GameResult<GameState> {
        Ok(GameState {
            session: Session::new(settings),
            speed_slider: Slider::new(
                Rect::new(100.0, 150.0, 300.0, 15.0),
                SPEED_RANGE,
                settings.speed(),
            ),
            population_slider: Slider::new(
                Rect::new(100.0, 250.0, 300.0, 15.0),
                POPULATION_RANGE,
                settings.population(),
            ),
            sprites: SpriteMeshes::new(ctx)?,
        })
    }

    fn apply(&mut self, action: Action) {
        let before = self.session.screen();
        self.session.apply(action);
        debug!(?action, from = ?before, to = ?self.session.screen(), "screen change");
    }

    /// Pushes the slider values into the session
    fn sync_settings(&mut self) -> GameResult {
        self.session
            .configure(self.population_slider.value(), self.speed_slider.value())
            .map_err(|e| GameError::ConfigError(e.to_string()))
    }

    fn draw_menu(&self, ctx: &mut Context, canvas: &mut Canvas) -> GameResult {
        self.speed_slider.draw(ctx, canvas)?;
        let speed = ui::centered_text(format!("Speed: {}", self.speed_slider.value()), ui::LABEL_SCALE);
        canvas.draw(&speed, graphics::DrawParam::default().dest([250.0, 175.0]).color(ui::TEXT));

        self.population_slider.draw(ctx, canvas)?;
        let population = ui::centered_text(
            format!("Group size: {}", self.population_slider.value()),
            ui::LABEL_SCALE,
        );
        canvas.draw(&population, graphics::DrawParam::default().dest([250.0, 275.0]).color(ui::TEXT));

        PLAY.draw(ctx, canvas);
        Ok(())
    }

    fn draw_arena(&self, ctx: &mut Context, canvas: &mut Canvas, world: &World) -> GameResult {
        let counts = Kind::ALL.map(|kind| world.count(kind));
        let top = ARENA_SIZE - ui::SCORE_BAR_HEIGHT;

        for segment in ui::score_segments(counts, world.settings().total(), ARENA_SIZE) {
            if segment.width <= 0.0 {
                continue;
            }
            let bar = Mesh::new_rectangle(
                ctx,
                DrawMode::fill(),
                Rect::new(segment.start, top, segment.width, ui::SCORE_BAR_HEIGHT),
                ui::kind_color(segment.kind),
            )?;
            canvas.draw(&bar, graphics::DrawParam::default());
        }

        for entity in world.entities() {
            self.sprites.draw(canvas, entity);
        }
        Ok(())
    }

    fn draw_game_over(&self, ctx: &Context, canvas: &mut Canvas, winner: Kind) {
        let banner = ui::centered_text(format!("{winner} WON!"), ui::TITLE_SCALE);
        canvas.draw(&banner, graphics::DrawParam::default().dest([250.0, 200.0]).color(ui::TEXT));

        RESTART.draw(ctx, canvas);
        MAIN_MENU.draw(ctx, canvas);
    }
}

impl event::EventHandler<GameError> for GameState {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        while ctx.time.check_update_time(TICK_RATE) {
            self.session.update();
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let mut canvas = graphics::Canvas::from_frame(ctx, ui::BACKGROUND);

        match self.session.screen() {
            Screen::Menu => self.draw_menu(ctx, &mut canvas)?,
            Screen::Running => {
                if let Some(world) = self.session.world() {
                    self.draw_arena(ctx, &mut canvas, world)?;
                }
            }
            Screen::GameOver { winner } => self.draw_game_over(ctx, &mut canvas, winner),
        }

        canvas.finish(ctx)?;
        Ok(())
    }

    fn mouse_button_down_event(
        &mut self,
        ctx: &mut Context,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> GameResult {
        if button != MouseButton::Left {
            return Ok(());
        }

        match self.session.screen() {
            Screen::Menu => {
                let speed_grabbed = self.speed_slider.press(x, y);
                let population_grabbed = self.population_slider.press(x, y);
                if speed_grabbed || population_grabbed {
                    self.sync_settings()?;
                } else if PLAY.contains(ctx, x, y) {
                    self.apply(Action::Play);
                }
            }
            Screen::GameOver { .. } => {
                if RESTART.contains(ctx, x, y) {
                    self.apply(Action::Restart);
                } else if MAIN_MENU.contains(ctx, x, y) {
                    self.apply(Action::MainMenu);
                }
            }
            Screen::Running => {}
        }
        Ok(())
    }

    fn mouse_button_up_event(
        &mut self,
        _ctx: &mut Context,
        button: MouseButton,
        _x: f32,
        _y: f32,
    ) -> GameResult {
        if button == MouseButton::Left {
            self.speed_slider.release();
            self.population_slider.release();
        }
        Ok(())
    }

    fn mouse_motion_event(
        &mut self,
        _ctx: &mut Context,
        x: f32,
        _y: f32,
        _dx: f32,
        _dy: f32,
    ) -> GameResult {
        let speed_changed = self.speed_slider.drag(x);
        let population_changed = self.population_slider.drag(x);
        if speed_changed || population_changed {
            self.sync_settings()?;
        }
        Ok(())
    }

    fn key_down_event(&mut self, ctx: &mut Context, input: KeyInput, _repeated: bool) -> GameResult {
        if input.keycode == Some(KeyCode::Escape) {
            ctx.request_quit();
        }
        Ok(())
    }
}
