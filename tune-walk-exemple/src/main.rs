use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use tune_walk_core::model::arrangement::{drums_for_lyrics, melody_for_lyrics};
use tune_walk_core::model::lyrics::lyric_sheet;
use tune_walk_core::model::presets::{
    DRUMS, SONG_STRUCTURE, chord_library, drum_library, drum_palette_library, lyric_graph, melody_library,
};
use tune_walk_core::model::song_plan::SongPlan;
use tune_walk_core::render::midi::{
    DEFAULT_TEMPO_BPM, drums_to_smf, melody_to_smf, merge_smf, song_to_smf, write_smf,
};

#[derive(Debug, Parser)]
#[command(name = "tune-walk-exemple", about = "Generate chords, drums, lyrics and a melody by walking weighted graphs")]
struct Cli {
    /// RNG seed (same seed => same song); random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// JSON song plan; verse / chorus / bridge / chorus when omitted
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Folder receiving the MIDI files
    #[arg(long, default_value = "createdFiles")]
    output_dir: PathBuf,

    /// Number of drum hits
    #[arg(long, default_value_t = 16)]
    drum_length: usize,

    /// Number of lyric lines per song section
    #[arg(long, default_value_t = 4)]
    lyric_lines: usize,

    /// Tempo in BPM
    #[arg(long, default_value_t = DEFAULT_TEMPO_BPM)]
    tempo: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    // Seeded runs are reproducible; unseeded runs draw from the OS
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let plan = match &cli.plan {
        Some(path) => SongPlan::load(path)?,
        None => SongPlan::default_plan(),
    };

    // Chords: one walk per section, a repeated section reuses its walk
    let chords = chord_library()?;
    let song = plan.generate(&chords, &mut rng)?;
    for section in &song {
        println!("{} ({}): {}", section.name, section.graph, section.sequence);
    }
    let progression = song_to_smf(&song, cli.tempo)?;
    let path = write_smf(&progression, &cli.output_dir, "full_progression.mid")?;
    println!("\nMIDI file created as '{}'", path.display());

    // Drums: a single long walk over the drum graph
    let drums = drum_library()?;
    let pattern = drums.generate_section(DRUMS, cli.drum_length, None, &mut rng)?;
    println!("\nDrums: {}", pattern);
    let beat = drums_to_smf(&pattern, cli.tempo)?;
    let path = write_smf(&beat, &cli.output_dir, "drum_pattern.mid")?;
    println!("MIDI file created as '{}'", path.display());

    // Lyrics: the phrase graph itself is drawn from the same seed, then
    // walked section by section along each rhyme scheme
    let phrases = lyric_graph(&mut rng)?;
    let lyrics = lyric_sheet(&phrases, SONG_STRUCTURE, cli.lyric_lines, &mut rng)?;
    let mut current = None;
    for line in &lyrics {
        if current != Some(&line.section) {
            println!("\n[{}]", line.section);
            current = Some(&line.section);
        }
        println!("{}", line.text);
    }

    // Melody and drums follow the lyrics, a few notes per line
    let melody = melody_for_lyrics(&lyrics, &melody_library()?, &mut rng)?;
    println!("\nMelody: {}", melody);
    let tune = melody_to_smf(&melody, cli.tempo)?;
    let path = write_smf(&tune, &cli.output_dir, "melody.mid")?;
    println!("MIDI file created as '{}'", path.display());

    let accompaniment = drums_for_lyrics(&lyrics, &drum_palette_library()?, &mut rng)?;
    let combined = merge_smf([tune.clone(), drums_to_smf(&accompaniment, cli.tempo)?]);
    let path = write_smf(&combined, &cli.output_dir, "combined_song.mid")?;
    println!("MIDI file created as '{}'", path.display());

    // Everything at once: progression, melody and drum pattern
    let merged = merge_smf([progression, tune, beat]);
    let path = write_smf(&merged, &cli.output_dir, "merged_song.mid")?;
    println!("MIDI file created as '{}'", path.display());

    Ok(())
}
