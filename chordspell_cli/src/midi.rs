// MIDI boundary: translates transport events into the core vocabulary.
//
// Two sources feed the pipeline: raw bytes from a live midir input port,
// and Standard MIDI Files parsed with midly. Both reduce to the same
// `NoteEvent` stream. A velocity-zero note-on is MIDI shorthand for
// note-off and is translated to a stop event here, so the core never sees
// the convention.
//
// Range validation does NOT happen here: the event loop in main.rs owns
// it, because the stop sentinel (C8 by default) deliberately lies outside
// the playable range and must survive translation.

use chordspell_core::NoteEvent;
use midly::{MidiMessage, Smf, TrackEventKind};
use std::error::Error;
use std::path::Path;

/// Translate one raw MIDI message from a live input port.
///
/// Returns `None` for anything that is not a note-on or note-off
/// (aftertouch, control change, clock, ...).
pub fn parse_raw(bytes: &[u8]) -> Option<NoteEvent> {
    let (&status, data) = bytes.split_first()?;
    let note = *data.first()?;
    match status & 0xF0 {
        0x90 => {
            let velocity = *data.get(1)?;
            if velocity == 0 {
                Some(NoteEvent::Stop(note))
            } else {
                Some(NoteEvent::Start(note))
            }
        }
        0x80 => Some(NoteEvent::Stop(note)),
        _ => None,
    }
}

/// Flatten a Standard MIDI File into one chronological event sequence.
///
/// Tracks run in parallel in SMF format 1, so each track's deltas are
/// accumulated into absolute ticks and the tracks are merged by tick
/// (stable sort: simultaneous events keep track order). The core ignores
/// timing beyond ordering, so the ticks themselves are dropped.
pub fn events_from_smf(smf: &Smf) -> Vec<NoteEvent> {
    let mut timed: Vec<(u64, NoteEvent)> = Vec::new();
    for track in &smf.tracks {
        let mut tick = 0u64;
        for event in track {
            tick += u64::from(event.delta.as_int());
            if let TrackEventKind::Midi { message, .. } = event.kind {
                match message {
                    MidiMessage::NoteOn { key, vel } => {
                        let note = key.as_int();
                        if vel.as_int() == 0 {
                            timed.push((tick, NoteEvent::Stop(note)));
                        } else {
                            timed.push((tick, NoteEvent::Start(note)));
                        }
                    }
                    MidiMessage::NoteOff { key, .. } => {
                        timed.push((tick, NoteEvent::Stop(key.as_int())));
                    }
                    _ => {}
                }
            }
        }
    }
    timed.sort_by_key(|&(tick, _)| tick);
    timed.into_iter().map(|(_, event)| event).collect()
}

/// Read and flatten a MIDI file from disk.
pub fn events_from_file(path: &Path) -> Result<Vec<NoteEvent>, Box<dyn Error>> {
    let bytes = std::fs::read(path)?;
    let smf = Smf::parse(&bytes)?;
    Ok(events_from_smf(&smf))
}
