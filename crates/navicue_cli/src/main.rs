//! The `navicue` command line tool
//!
//! Browses the specimen catalog and plays specimens headlessly: the play
//! loop ticks a specimen at a fixed frame rate, simulates a pointer during
//! the active stage, and prints sampled frames to stdout.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use navicue_catalog::{series, CatalogRegistry, Specimen, SpecimenInput};
use navicue_core::clock::{Clock, ManualClock};
use navicue_core::stage::Stage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "navicue", version, about = "NaviCue specimen catalog tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every specimen in the catalog
    List,
    /// List the narrative series
    Series,
    /// Show one specimen's metadata
    Info {
        /// Specimen id
        id: String,
    },
    /// Play a specimen headlessly and print sampled frames
    Play {
        /// Specimen id
        id: String,
        /// Simulated frame rate
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Give up after this much simulated time
        #[arg(long, default_value_t = 120_000)]
        duration_ms: u64,
        /// How long the simulated pointer stays down during the active stage
        #[arg(long, default_value_t = 3200)]
        hold_ms: u64,
    },
    /// Print the catalog manifest as JSON
    Manifest,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let registry = CatalogRegistry::builtin();

    match cli.command {
        Command::List => {
            for meta in registry.metas() {
                println!(
                    "{:<16} [{}] {:<16} ({})",
                    meta.id,
                    meta.kbe.code(),
                    meta.title,
                    meta.series
                );
            }
        }
        Command::Series => {
            for s in series::SERIES {
                let shipped = registry.by_series(s.id).len();
                println!("{:<16} {:<16} {}/{} specimens", s.id, s.title, shipped, s.planned);
                println!("{:16} {}", "", s.arc);
            }
        }
        Command::Info { id } => {
            let meta = match registry.meta(&id) {
                Some(meta) => meta,
                None => bail!("unknown specimen '{id}'"),
            };
            println!("{}", serde_json::to_string_pretty(meta)?);
        }
        Command::Play {
            id,
            fps,
            duration_ms,
            hold_ms,
        } => {
            if fps == 0 {
                bail!("--fps must be at least 1");
            }
            let specimen = registry.create(&id)?;
            play(specimen, fps, duration_ms as f64, hold_ms as f64)?;
        }
        Command::Manifest => {
            let manifest = serde_json::json!({
                "series": series::SERIES,
                "specimens": registry.metas(),
            });
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
    }

    Ok(())
}

/// Drive one specimen to completion with a fixed frame delta, simulating a
/// press-and-release during the active stage.
fn play(mut specimen: Box<dyn Specimen>, fps: u32, duration_ms: f64, hold_ms: f64) -> Result<()> {
    let dt_ms = 1000.0 / fps as f64;
    let clock = ManualClock::new();
    let completed = Arc::new(AtomicBool::new(false));
    let flag = completed.clone();

    specimen.mount(SpecimenInput::new().on_complete(move || {
        flag.store(true, Ordering::SeqCst);
    }));

    let mut active_ms = 0.0;
    let mut pressed = false;
    let mut released = false;
    let mut next_print = 0.0;

    while !specimen.is_complete() {
        let elapsed = clock.now_ms();
        if elapsed >= duration_ms {
            bail!(
                "'{}' did not complete within {duration_ms}ms (stuck in {:?})",
                specimen.meta().id,
                specimen.frame().stage
            );
        }

        if specimen.frame().stage == Stage::Active {
            if !pressed {
                specimen.pointer_down();
                pressed = true;
            }
            active_ms += dt_ms;
            if pressed && !released && active_ms >= hold_ms {
                specimen.pointer_up();
                released = true;
            }
        }

        clock.advance(dt_ms);
        specimen.tick(dt_ms);

        if clock.now_ms() >= next_print {
            print_frame(clock.now_ms(), &specimen);
            next_print += 250.0;
        }
    }

    print_frame(clock.now_ms(), &specimen);
    println!(
        "done in {:.0}ms (on_complete fired: {})",
        clock.now_ms(),
        completed.load(Ordering::SeqCst)
    );
    Ok(())
}

fn print_frame(elapsed: f64, specimen: &Box<dyn Specimen>) {
    let frame = specimen.frame();
    let mut line = format!("{:>8.0}ms  {:<9}", elapsed, format!("{:?}", frame.stage));
    for channel in &frame.channels {
        line.push_str(&format!("  {}={:.3}", channel.name, channel.value));
    }
    if !frame.glyphs.is_empty() {
        let revealed = frame.glyphs.iter().filter(|g| g.revealed).count();
        line.push_str(&format!("  glyphs={}/{}", revealed, frame.glyphs.len()));
    }
    println!("{line}");
}
