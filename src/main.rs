use clap::Parser;
use ggez::{event, GameError, GameResult};
use rock_paper_scissors::{
    config::{Args, Settings},
    game::GameState,
    session::{Action, Screen, Session},
    world::ARENA_SIZE,
};
use tracing::{info, warn};

//////////////////////////////////////////////////////////////////////////////
// Main Function
//////////////////////////////////////////////////////////////////////////////

fn main() -> GameResult {
    init_tracing();

    let args = Args::parse();
    let settings = Settings::try_from(&args).map_err(|e| GameError::ConfigError(e.to_string()))?;
    info!(
        population = settings.population(),
        speed = settings.speed(),
        seed = ?settings.seed(),
        headless = args.headless,
        "starting"
    );

    if args.headless {
        run_headless(settings, args.max_ticks);
        return Ok(());
    }

    let cb = ggez::ContextBuilder::new("rock_paper_scissors", "you")
        .window_setup(ggez::conf::WindowSetup::default().title("Rock Paper Scissors"))
        .window_mode(
            ggez::conf::WindowMode::default()
                .dimensions(ARENA_SIZE, ARENA_SIZE)
                .resizable(false),
        );

    let (mut ctx, event_loop) = cb.build()?;
    let state = GameState::new(&mut ctx, settings)?;
    event::run(ctx, event_loop, state)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Plays one round without a window, stopping early after `max_ticks`
fn run_headless(settings: Settings, max_ticks: u64) {
    let mut session = Session::new(settings);
    session.apply(Action::Play);

    for _ in 0..max_ticks {
        if session.update().is_some() {
            break;
        }
    }

    match (session.screen(), session.world()) {
        (Screen::GameOver { winner }, Some(world)) => {
            info!(winner = %winner, ticks = world.tick(), "headless round finished");
        }
        (_, Some(world)) => {
            warn!(
                ticks = world.tick(),
                population = world.population(),
                "headless round hit the tick limit without a winner"
            );
        }
        (_, None) => {}
    }
}
