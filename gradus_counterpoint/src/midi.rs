// MIDI output for finished exercises.
//
// Converts an Exercise into a Standard MIDI File (SMF) for playback. Track 0
// carries the tempo; the cantus and the counterpoint each get their own track
// and channel. Every position is one quarter note, so higher species simply
// play faster against a cantus that repeats its pitches.
//
// Reference pitch `p` sounds as MIDI key `base_note + p`. Sentinel positions
// in the counterpoint become rests of the same length.
//
// Uses the `midly` crate for MIDI writing. Output is SMF Format 1 (multi-track).

use crate::config::MidiSettings;
use crate::error::ExportError;
use crate::exercise::Exercise;
use crate::pitch::{Pitch, SENTINEL};
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;
use tracing::info;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u32 = 480;

const NOTE_VELOCITY: u8 = 80;

/// Convert an exercise to MIDI and write it to a file.
pub fn write_midi(
    exercise: &Exercise,
    settings: &MidiSettings,
    path: &Path,
) -> Result<(), ExportError> {
    let smf = exercise_to_smf(exercise, settings)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    std::fs::write(path, &buf)?;
    info!(path = %path.display(), bytes = buf.len(), "wrote MIDI file");
    Ok(())
}

/// Convert an exercise to an in-memory SMF.
pub fn exercise_to_smf(
    exercise: &Exercise,
    settings: &MidiSettings,
) -> Result<Smf<'static>, ExportError> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER as u16)),
    ));

    // Track 0: tempo track
    let tempo_microseconds = (60_000_000 / u32::from(settings.tempo_bpm.max(1))).min(0xFF_FFFF);
    smf.tracks.push(vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        },
    ]);

    smf.tracks.push(line_track(
        "Cantus firmus",
        u4::new(0),
        settings.cantus_program,
        &exercise.cantus,
        settings.base_note,
    )?);
    smf.tracks.push(line_track(
        "Counterpoint",
        u4::new(1),
        settings.counterpoint_program,
        &exercise.counterpoint,
        settings.base_note,
    )?);

    Ok(smf)
}

/// One voice as a track of back-to-back quarter notes.
fn line_track(
    name: &'static str,
    channel: u4,
    program: u8,
    line: &[Pitch],
    base_note: u8,
) -> Result<Track<'static>, ExportError> {
    let mut track: Track<'static> = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(program.min(127)),
                },
            },
        },
    ];

    // Rests are not events; they only push the next note-on later.
    let mut pending_rest: u32 = 0;
    for (position, &pitch) in line.iter().enumerate() {
        if pitch == SENTINEL {
            pending_rest += TICKS_PER_QUARTER;
            continue;
        }
        let key = midi_key(base_note, pitch)
            .ok_or(ExportError::PitchOutOfRange { position, pitch })?;
        track.push(TrackEvent {
            delta: u28::new(pending_rest),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key,
                    vel: u7::new(NOTE_VELOCITY),
                },
            },
        });
        track.push(TrackEvent {
            delta: u28::new(TICKS_PER_QUARTER),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key,
                    vel: u7::new(0),
                },
            },
        });
        pending_rest = 0;
    }

    track.push(TrackEvent {
        delta: u28::new(pending_rest),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    Ok(track)
}

fn midi_key(base_note: u8, pitch: Pitch) -> Option<u7> {
    let key = i32::from(base_note) + i32::from(pitch);
    u8::try_from(key)
        .ok()
        .filter(|&k| k <= 127)
        .map(u7::new)
}
