//! psi-helix - A ψ-field that breathes, shimmers and hums
//!
//! Runs the session headless: the command line plays the role of the
//! control panel, PNG files the canvas and WAV files (or the speakers)
//! the audio output.

use std::time::Instant;

use clap::Parser;

use psi_helix::audio::{AudioSink, WavFileSink};
use psi_helix::cli::{Args, AudioMode};
use psi_helix::rendering::{composite_layers, rasterize_frame, rasterize_mandala, save_png};
use psi_helix::{Interaction, NoticeLevel, Session, TickOutput};

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> psi_helix::Result<()> {
    println!("psi-helix - ψ-field resonance engine");
    println!("Initializing ψ-field...\n");

    let defaults = args.build_defaults()?;
    args.create_output_dirs()?;

    let render_config = defaults.render.clone();
    let mut session = Session::new(defaults).with_mode(args.parse_mode());
    if let Some(sink) = create_sink(&args) {
        session = session.with_sink(sink);
    }

    let start = Instant::now();
    for tick in 0..args.ticks {
        let interactions = args.interactions_for(tick);
        let output = session.tick(args.dt, &interactions);

        report(&output);
        if args.writes_frame(tick) {
            write_images(&args, &output, &render_config)?;
        }
    }

    if let Some(path) = &args.save {
        let output = session.tick(0.0, &[Interaction::Save(path.clone())]);
        report(&output);
    }

    let tone = session.tone().state(session.field().mean());
    println!("\nRan {} ticks in {:.2}s", args.ticks, start.elapsed().as_secs_f64());
    println!(
        "  Resonance: {:.2} Hz (harmonic ratio {})",
        tone.resonance.frequency_hz,
        tone.resonance
            .harmonic_ratio
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "n/a".to_string())
    );
    println!("  Output: {}", args.output.display());

    Ok(())
}

/// Pick the audio sink for the requested mode
fn create_sink(args: &Args) -> Option<Box<dyn AudioSink>> {
    match args.parse_audio() {
        AudioMode::Off => None,
        AudioMode::Wav => {
            println!("Audio: WAV files in {}", args.tones_dir().display());
            Some(Box::new(WavFileSink::new(args.tones_dir())))
        }
        AudioMode::Live => live_sink(),
    }
}

#[cfg(feature = "live-audio")]
fn live_sink() -> Option<Box<dyn AudioSink>> {
    println!("Audio: live output");
    Some(Box::new(psi_helix::audio::CpalSink::new()))
}

#[cfg(not(feature = "live-audio"))]
fn live_sink() -> Option<Box<dyn AudioSink>> {
    eprintln!("Warning: built without the live-audio feature, audio off");
    None
}

fn report(output: &TickOutput) {
    for notice in &output.notices {
        match notice.level {
            NoticeLevel::Info => println!("  {}", notice.message),
            NoticeLevel::Error => eprintln!("  Error: {}", notice.message),
        }
    }
    for hit in &output.perturbations {
        println!(
            "  Surprise at ({}, {}) +{:.2}",
            hit.row, hit.col, hit.increment
        );
    }
}

fn write_images(
    args: &Args,
    output: &TickOutput,
    render: &psi_helix::params::RenderConfig,
) -> psi_helix::Result<()> {
    let dir = args.frames_dir();

    let frame = match &output.echo {
        Some(echo) => composite_layers(&output.frame, echo, render.cell_scale),
        None => rasterize_frame(&output.frame, render.cell_scale),
    };
    save_png(&frame, dir.join(format!("frame_{:05}.png", output.tick)))?;

    let mandala = rasterize_mandala(&output.mandala, render.mandala_size, render.mandala_symmetry);
    save_png(&mandala, dir.join(format!("mandala_{:05}.png", output.tick)))?;

    Ok(())
}
