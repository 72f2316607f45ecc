// Chordspell — CLI entry point.
//
// Records chords from a MIDI input (live port or Standard MIDI File) and
// prints the corrected word sequence. The pipeline: frequency-weighted key
// map -> chord segmentation -> pseudo-words -> BK-tree dictionary
// correction.
//
// Usage:
//   chordspell devices
//   chordspell compose <device> [--letters FILE] [--dictionary FILE]
//     [--seed N] [--radius N] [--output FILE] [--debug]
//   chordspell compose --input score.mid [same flags]
//
// Live recording ends when the stop note (C8 by default) is struck.

mod midi;

use chordspell_core::{
    Composer, FrequencyTable, Lexicon, NoteEvent, SessionConfig, WeightedKeyMap,
};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::error::Error;
use std::path::Path;
use std::sync::mpsc;

/// Default letter-frequency table (English letter frequencies), embedded
/// at compile time. Override with --letters.
const DEFAULT_LETTERS: &str = include_str!("../../data/letters.txt");

/// Default dictionary source. Any hunspell .dic (or plain "word/tags"
/// line-oriented corpus) works. Override with --dictionary.
const DEFAULT_DICTIONARY: &str = "/usr/share/hunspell/en_US.dic";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let default_level = if args.iter().any(|a| a == "--debug") {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match args.first().map(String::as_str) {
        Some("devices") => devices(),
        Some("compose") => compose(&args[1..]),
        _ => {
            usage();
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn usage() {
    eprintln!("usage:");
    eprintln!("  chordspell devices");
    eprintln!("  chordspell compose <device> [options]");
    eprintln!("  chordspell compose --input <file.mid> [options]");
    eprintln!();
    eprintln!("options:");
    eprintln!("  --letters FILE      letter-frequency table (default: embedded)");
    eprintln!("  --dictionary FILE   word corpus (default: {})", DEFAULT_DICTIONARY);
    eprintln!("  --seed N            seed the random source for a reproducible session");
    eprintln!("  --radius N          maximum correction search radius (default: 10)");
    eprintln!("  --output FILE       also write the text to FILE");
    eprintln!("  --debug             verbose logging");
}

/// List available MIDI input ports.
fn devices() -> Result<(), Box<dyn Error>> {
    let input = midir::MidiInput::new("chordspell")?;
    for port in input.ports() {
        println!("{}", input.port_name(&port)?);
    }
    Ok(())
}

fn compose(args: &[String]) -> Result<(), Box<dyn Error>> {
    let letters_path: Option<String> = parse_flag(args, "--letters");
    let dictionary: String =
        parse_flag(args, "--dictionary").unwrap_or_else(|| DEFAULT_DICTIONARY.to_string());
    let seed: Option<u64> = parse_flag(args, "--seed");
    let radius: Option<u32> = parse_flag(args, "--radius");
    let input_file: Option<String> = parse_flag(args, "--input");
    let output: Option<String> = parse_flag(args, "--output");
    let device = args.first().filter(|s| !s.starts_with("--"));

    let mut config = SessionConfig::default();
    if let Some(r) = radius {
        config.max_radius = r;
    }

    log::debug!("loading frequency table");
    let table = match &letters_path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
            FrequencyTable::parse(&text).map_err(|e| format!("{path}: {e}"))?
        }
        None => FrequencyTable::parse(DEFAULT_LETTERS).map_err(|e| format!("embedded letters.txt: {e}"))?,
    };

    log::debug!("loading dictionary from {}", dictionary);
    let corpus =
        std::fs::read_to_string(&dictionary).map_err(|e| format!("{dictionary}: {e}"))?;
    let lexicon = Lexicon::from_corpus(&corpus, config.max_radius)
        .map_err(|e| format!("{dictionary}: {e}"))?;
    log::info!("indexed {} dictionary words", lexicon.len());

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    let keymap = WeightedKeyMap::generate(&table, config.note_range, &mut rng);

    let text = match input_file {
        Some(file) => {
            let events = midi::events_from_file(Path::new(&file))
                .map_err(|e| format!("{file}: {e}"))?;
            run_events(events, &config, keymap, lexicon, &mut rng)
        }
        None => {
            let device = device.ok_or(
                "no MIDI device given (and no --input file); run `chordspell devices` to list ports",
            )?;
            compose_live(device, &config, keymap, lexicon, &mut rng)?
        }
    };

    if text.is_empty() {
        log::warn!("no chords recorded, nothing to say");
    }
    println!("{}", text);
    if let Some(path) = output {
        std::fs::write(&path, &text).map_err(|e| format!("{path}: {e}"))?;
        log::info!("wrote text to {}", path);
    }
    Ok(())
}

/// Record from a live MIDI input port until the stop note is struck.
///
/// The midir callback runs on the transport's thread; completed events
/// cross to this thread over a channel, so the composer and its key
/// map/lexicon stay single-threaded.
fn compose_live<R: Rng>(
    device: &str,
    config: &SessionConfig,
    keymap: WeightedKeyMap,
    lexicon: Lexicon,
    rng: &mut R,
) -> Result<String, Box<dyn Error>> {
    let input = midir::MidiInput::new("chordspell")?;
    let ports = input.ports();
    let port = ports
        .iter()
        .find(|p| {
            input
                .port_name(p)
                .map(|name| name.contains(device))
                .unwrap_or(false)
        })
        .ok_or_else(|| format!("no MIDI input port matching '{device}'"))?;

    let (tx, rx) = mpsc::channel();
    let conn = input
        .connect(
            port,
            "chordspell-input",
            move |_stamp, bytes, _| {
                if let Some(event) = midi::parse_raw(bytes) {
                    let _ = tx.send(event);
                }
            },
            (),
        )
        .map_err(|e| e.to_string())?;

    log::info!(
        "recording. press the stop note ({}) to finish",
        config.stop_note
    );
    let text = run_events(rx.iter(), config, keymap, lexicon, rng);
    conn.close();
    Ok(text)
}

/// Drive events through the composer: stop on the sentinel, reject
/// out-of-range notes at this boundary, feed the rest.
fn run_events<I, R>(
    events: I,
    config: &SessionConfig,
    keymap: WeightedKeyMap,
    lexicon: Lexicon,
    rng: &mut R,
) -> String
where
    I: IntoIterator<Item = NoteEvent>,
    R: Rng,
{
    let mut composer = Composer::new(keymap, lexicon);
    for event in events {
        if event == NoteEvent::Start(config.stop_note) {
            log::debug!("stop note struck, ending session");
            break;
        }
        if !config.note_range.contains(event.note()) {
            log::debug!("note {} outside valid range, dropping", event.note());
            continue;
        }
        if let Some(word) = composer.feed(event, rng) {
            log::info!("word: {}", word);
        }
    }
    composer.finish()
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
