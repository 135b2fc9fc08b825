use clap::Parser;
use std::ops::RangeInclusive;
use thiserror::Error;

//////////////////////////////////////////////////////////////////////////////
// Configuration Constants
//////////////////////////////////////////////////////////////////////////////

/// Allowed sprites per group
pub const POPULATION_RANGE: RangeInclusive<u32> = 1..=150;
/// Allowed movement per tick, in pixels
pub const SPEED_RANGE: RangeInclusive<u32> = 1..=10;
pub const DEFAULT_POPULATION: u32 = 50;
pub const DEFAULT_SPEED: u32 = 2;

//////////////////////////////////////////////////////////////////////////////
// Command Line
//////////////////////////////////////////////////////////////////////////////

#[derive(Parser, Debug)]
#[command(author, version, about = "Rock, paper and scissors chase each other until one kind remains", long_about = None)]
pub struct Args {
    /// Sprites per group at the start of a round
    #[arg(short, long, default_value_t = DEFAULT_POPULATION)]
    pub population: u32,

    /// Pixels each sprite moves per tick
    #[arg(short, long, default_value_t = DEFAULT_SPEED)]
    pub speed: u32,

    /// Seed for the position generator; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run rounds without a window and report the winner
    #[arg(long)]
    pub headless: bool,

    /// Give up a headless round after this many ticks
    #[arg(long, default_value_t = 100_000)]
    pub max_ticks: u64,
}

//////////////////////////////////////////////////////////////////////////////
// Settings
//////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("population must be between {min} and {max}, got {got}")]
    Population { got: u32, min: u32, max: u32 },
    #[error("speed must be between {min} and {max}, got {got}")]
    Speed { got: u32, min: u32, max: u32 },
}

/// Round parameters picked on the menu screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    population: u32,
    speed: u32,
    seed: Option<u64>,
}

impl Settings {
    pub fn new(population: u32, speed: u32) -> Result<Self, SettingsError> {
        if !POPULATION_RANGE.contains(&population) {
            return Err(SettingsError::Population {
                got: population,
                min: *POPULATION_RANGE.start(),
                max: *POPULATION_RANGE.end(),
            });
        }
        if !SPEED_RANGE.contains(&speed) {
            return Err(SettingsError::Speed {
                got: speed,
                min: *SPEED_RANGE.start(),
                max: *SPEED_RANGE.end(),
            });
        }
        Ok(Settings {
            population,
            speed,
            seed: None,
        })
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Sprites per group at the start of a round
    #[inline]
    pub fn population(&self) -> u32 {
        self.population
    }

    #[inline]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Seed for spawn positions; `None` draws from entropy
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Size a single group reaches once it has absorbed everyone
    #[inline]
    pub fn total(&self) -> usize {
        self.population as usize * 3
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            population: DEFAULT_POPULATION,
            speed: DEFAULT_SPEED,
            seed: None,
        }
    }
}

impl TryFrom<&Args> for Settings {
    type Error = SettingsError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        Ok(Settings::new(args.population, args.speed)?.with_seed(args.seed))
    }
}
