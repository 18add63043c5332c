//! Pattern-to-event scheduling.
//!
//! Walks a song's order list and patterns, producing a sorted `Vec<Event>`
//! that the player consumes during playback.

use alloc::vec::Vec;
use ct_ir::{Event, MusicalTime, OrderEntry, Song};

/// Schedule every non-empty cell of the song in play order.
///
/// Rows advance at `song.rows_per_beat`. Cells on channels the song does
/// not declare are dropped.
pub fn schedule_song(song: &Song) -> Vec<Event> {
    let mut events = Vec::new();
    let rows_per_beat = song.rows_per_beat as u32;
    let channels = song.channel_count().min(u8::MAX as usize) as u8;
    let mut start = MusicalTime::zero();

    for entry in &song.order {
        match entry {
            OrderEntry::Pattern(idx) => {
                let Some(pattern) = song.patterns.get(*idx as usize) else {
                    continue;
                };
                for row in 0..pattern.rows {
                    let time = start.add_rows(row as u32, rows_per_beat);
                    for ch in 0..pattern.channels.min(channels) {
                        let cell = pattern.cell(row, ch);
                        if !cell.is_empty() {
                            events.push(Event::new(time, ch, *cell));
                        }
                    }
                }
                start = start.add_rows(pattern.rows as u32, rows_per_beat);
            }
            OrderEntry::Skip => {}
            OrderEntry::End => break,
        }
    }

    events
}
