use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ct_engine::{Instrument, InstrumentBank, Player, Tracker};
use ct_ir::{
    Adsr, Cell, Chord, Effect, InstrumentParams, OrderEntry, Pattern, Song, Sound, Waveform,
    NOTE_A4,
};

const SR: f32 = 44100.0;
const BLOCK: usize = 512;

fn busy_song() -> Song {
    let mut song = Song::with_channels("bench", 8);
    for ch in 0..8u8 {
        let waveform = match ch % 4 {
            0 => Waveform::Sine,
            1 => Waveform::Saw,
            2 => Waveform::Square,
            _ => Waveform::Triangle,
        };
        let inst = song.add_instrument(
            InstrumentParams::new("bench", waveform)
                .with_voices(4)
                .with_envelope(Adsr::new(0.01, 0.1, 0.6, 0.2)),
        );
        song.assign(ch, inst);
    }
    let mut pat = Pattern::new(16, 8);
    for row in 0..16u16 {
        for ch in 0..8u8 {
            let effect = match (row + ch as u16) % 3 {
                0 => Effect::Arpeggio(Chord::Minor),
                1 => Effect::Vibrato,
                _ => Effect::Slide,
            };
            let note = 36 + ((row as u8 * 5 + ch) % 36);
            *pat.cell_mut(row, ch) = Cell::note_on(note).with_effect(effect);
        }
    }
    let idx = song.add_pattern(pat);
    song.add_order(OrderEntry::Pattern(idx));
    song
}

fn bench_tracker(c: &mut Criterion) {
    let mut bank = InstrumentBank::with_key();
    let key = bank.insert(Instrument::from_params(
        &InstrumentParams::new("chorus", Waveform::Saw).with_voices(8),
    ));
    let mut tracker = Tracker::new(1, SR);
    tracker.play(0, Sound::new(NOTE_A4, key).with_effect(Effect::Vibrato), &mut bank);

    c.bench_function("tracker_block_8_voices", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for _ in 0..BLOCK {
                acc += tracker.sample(&mut bank, 120.0, 1.0);
            }
            black_box(acc)
        })
    });
}

fn bench_player(c: &mut Criterion) {
    let song = busy_song();
    let mut player = Player::new(&song, SR);
    player.play();
    let mut buf = [0.0f32; BLOCK];

    c.bench_function("player_block_8_channels", |b| {
        b.iter(|| {
            if player.is_finished() {
                player.rewind();
            }
            player.render(&mut buf);
            black_box(buf[BLOCK - 1])
        })
    });
}

criterion_group!(benches, bench_tracker, bench_player);
criterion_main!(benches);
