//! Simulate subcommand handler
//!
//! Runs a full session against the scripted engine with a real tick thread,
//! so loop behavior can be watched without an embedded player.

use std::sync::mpsc;

use anyhow::{bail, Result};
use tracing::debug;

use abloop::engine::{EngineEvent, EngineState, ScriptedEngine};
use abloop::sections::SectionPersistence;
use abloop::storage::MemoryStore;
use abloop::sync::ThreadTicker;
use abloop::time::{format_rate, format_time};
use abloop::{Config, Event, Session};

/// Messages consumed by the simulation loop.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Message {
    Tick,
    Interrupt,
}

pub struct SimulateArgs {
    pub video: String,
    pub duration: f64,
    pub a: f64,
    pub b: f64,
    pub seconds: f64,
    pub rate: f64,
    pub time_scale: f64,
}

#[cfg(not(tarpaulin_include))]
pub fn handle(args: SimulateArgs) -> Result<()> {
    if args.duration <= 0.0 {
        bail!("Duration must be positive");
    }
    if args.time_scale <= 0.0 || !args.time_scale.is_finite() {
        bail!("Time scale must be positive");
    }

    let config = Config::load()?;
    let options = config.session_options();
    let period = options.poll_interval;

    let (tx, rx) = mpsc::channel();
    let interrupt = tx.clone();
    ctrlc::set_handler(move || {
        let _ = interrupt.send(Message::Interrupt);
    })?;

    let persistence = SectionPersistence::new(
        Box::new(MemoryStore::new()),
        config.sections.storage_prefix.clone(),
    );
    let mut session = Session::create(
        persistence,
        Box::new(ThreadTicker::new(tx, Message::Tick)),
        options,
    );
    session.bind_engine(ScriptedEngine::with_duration(args.duration));
    let id = session.load_video(&args.video)?;
    session.handle(Event::Engine(EngineEvent::Ready));
    session.set_a(Some(args.a));
    session.set_b(Some(args.b));
    session.set_loop_enabled(true);
    session.set_speed(args.rate)?;

    let bounds = session.interval().bounds();
    println!(
        "Looping {} from {} to {} at {}",
        id,
        format_time(bounds.start),
        format_time(bounds.end),
        format_rate(session.sync().current_rate())
    );

    session.sync_mut().play();
    session.handle(Event::Engine(EngineEvent::StateChanged(EngineState::Playing)));

    let step = period.as_secs_f64() * args.time_scale;
    let mut elapsed = 0.0;
    while elapsed < args.seconds {
        match rx.recv() {
            Ok(Message::Tick) => {}
            Ok(Message::Interrupt) | Err(_) => {
                println!("Interrupted");
                break;
            }
        }
        elapsed += step;

        let before = session.sync().loop_seeks();
        let ended = session.engine_mut().and_then(|engine| engine.advance(step));
        let reached = session.sync().current_time().unwrap_or(0.0);
        if let Some(event) = ended {
            session.handle(Event::Engine(event));
        }
        session.handle(Event::Tick);
        if session.sync().loop_seeks() > before {
            println!(
                "loop at {} -> {}",
                format_time(reached),
                format_time(session.interval().point_a())
            );
        }
    }

    let seeks = session.sync().loop_seeks();
    session.teardown();
    debug!(elapsed, seeks, "simulation finished");
    println!("{} loop seek(s) in {} simulated", seeks, format_time(elapsed));
    Ok(())
}
