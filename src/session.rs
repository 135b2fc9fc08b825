use crate::config::{Settings, SettingsError};
use crate::entity::Kind;
use crate::world::World;
use tracing::{debug, info};

/// Which screen is showing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Running,
    GameOver { winner: Kind },
}

/// What the player clicked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Play,
    Restart,
    MainMenu,
}

/// Screen flow plus the round being played.
///
/// Menu -> Running -> GameOver -> Running (restart) or Menu.
pub struct Session {
    screen: Screen,
    settings: Settings,
    world: Option<World>,
    rounds: u64,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Session {
            screen: Screen::Menu,
            settings,
            world: None,
            rounds: 0,
        }
    }

    #[inline]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The current round, kept after it ends so the last frame can still be inspected
    #[inline]
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    /// Changes the parameters for the next round. Only the menu accepts changes.
    pub fn configure(&mut self, population: u32, speed: u32) -> Result<(), SettingsError> {
        if self.screen != Screen::Menu {
            return Ok(());
        }
        self.settings = Settings::new(population, speed)?.with_seed(self.settings.seed());
        Ok(())
    }

    /// Handles a click. Actions that make no sense on the current screen are ignored.
    pub fn apply(&mut self, action: Action) {
        match (self.screen, action) {
            (Screen::Menu, Action::Play) | (Screen::GameOver { .. }, Action::Restart) => {
                self.start_round();
            }
            (Screen::GameOver { .. }, Action::MainMenu) => {
                debug!("returning to menu");
                self.world = None;
                self.screen = Screen::Menu;
            }
            _ => {}
        }
    }

    fn start_round(&mut self) {
        // each round of a seeded session gets its own, still reproducible, layout
        let seed = self.settings.seed().map(|s| s.wrapping_add(self.rounds));
        let settings = self.settings.with_seed(seed);
        self.rounds += 1;

        info!(
            round = self.rounds,
            population = settings.population(),
            speed = settings.speed(),
            seed = ?seed,
            "starting round"
        );
        self.world = Some(World::new(settings));
        self.screen = Screen::Running;
    }

    /// Advances a running round by one tick. Returns the winner on the tick
    /// the round ends.
    pub fn update(&mut self) -> Option<Kind> {
        if self.screen != Screen::Running {
            return None;
        }
        let world = self.world.as_mut()?;
        let winner = world.update()?;

        info!(winner = %winner, ticks = world.tick(), "round over");
        self.screen = Screen::GameOver { winner };
        Some(winner)
    }
}
