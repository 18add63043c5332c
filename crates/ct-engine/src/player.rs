//! Song playback: scheduled events driving a tracker.

use ct_ir::{CellKind, Event, InstrumentKey, Song};
use heapless::Vec;

use crate::event_queue::EventQueue;
use crate::instrument::{Instrument, InstrumentBank};
use crate::mixer::{Tracker, MAX_CHANNELS};
use crate::scheduler::schedule_song;

/// Seconds a song may ring on after its last row before playback ends.
pub const RELEASE_TAIL_SECONDS: f32 = 10.0;

/// Plays a `Song` sample by sample.
///
/// Owns the instrument arena, so triggering and rendering never reach
/// outside the player. Setup allocates; `render_sample` does not.
pub struct Player {
    tracker: Tracker,
    instruments: InstrumentBank,
    /// Instrument played by each channel
    channel_keys: Vec<Option<InstrumentKey>, MAX_CHANNELS>,
    queue: EventQueue,
    bpm: f32,
    beat_unit: f32,
    /// Song length in beats
    end: f64,
    playing: bool,
}

impl Player {
    /// Build a player for `song`, stopped at the start.
    pub fn new(song: &Song, sample_rate: f32) -> Self {
        let mut instruments = InstrumentBank::with_key();
        let keys: alloc::vec::Vec<InstrumentKey> = song
            .instruments
            .iter()
            .map(|params| instruments.insert(Instrument::from_params(params)))
            .collect();

        let mut channel_keys = Vec::new();
        for slot in song.channel_instruments.iter().take(MAX_CHANNELS) {
            let key = slot.and_then(|idx| keys.get(idx as usize).copied());
            let _ = channel_keys.push(key);
        }

        let mut tracker = Tracker::new(song.channel_count(), sample_rate);
        tracker.set_master_volume(song.master_volume);

        Self {
            tracker,
            instruments,
            channel_keys,
            queue: EventQueue::from_sorted(schedule_song(song)),
            bpm: song.bpm,
            beat_unit: song.beat_unit,
            end: song.total_time().as_beats(),
            playing: false,
        }
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Stop and cut every channel. Playback resumes from the same row.
    pub fn stop(&mut self) {
        self.playing = false;
        self.tracker.silence(&mut self.instruments);
    }

    /// Return to the first row.
    pub fn rewind(&mut self) {
        self.tracker.silence(&mut self.instruments);
        let sample_rate = self.tracker.sample_rate();
        let volume = self.tracker.master_volume();
        self.tracker = Tracker::new(self.channel_keys.len(), sample_rate);
        self.tracker.set_master_volume(volume);
        for instrument in self.instruments.values_mut() {
            instrument.reseed_noise();
        }
        self.queue.rewind();
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn set_bpm(&mut self, bpm: f32) {
        if bpm > 0.0 {
            self.bpm = bpm;
        }
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.tracker.set_master_volume(volume);
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn instruments(&self) -> &InstrumentBank {
        &self.instruments
    }

    /// Instrument assigned to `channel`.
    pub fn channel_instrument(&self, channel: usize) -> Option<InstrumentKey> {
        self.channel_keys.get(channel).copied().flatten()
    }

    /// Playback position in beats.
    pub fn position(&self) -> f64 {
        self.tracker.elapsed_beats()
    }

    /// Song length in beats.
    pub fn length(&self) -> f64 {
        self.end
    }

    /// True once the last row has passed and the release tail has faded,
    /// or the tail has run for `RELEASE_TAIL_SECONDS`.
    pub fn is_finished(&self) -> bool {
        let position = self.position();
        if position < self.end || !self.queue.is_exhausted() {
            return false;
        }
        let tail = (RELEASE_TAIL_SECONDS * self.bpm * self.beat_unit / 60.0) as f64;
        !self.tracker.is_audible(&self.instruments) || position - self.end >= tail
    }

    /// Render one sample. Returns silence while stopped.
    #[inline]
    pub fn render_sample(&mut self) -> f32 {
        if !self.playing {
            return 0.0;
        }
        let range = self.queue.drain_until(self.tracker.elapsed_beats());
        for i in range {
            if let Some(event) = self.queue.get(i).copied() {
                self.dispatch(&event);
            }
        }
        self.tracker.sample(&mut self.instruments, self.bpm, self.beat_unit)
    }

    /// Fill `out` with consecutive samples.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.render_sample();
        }
    }

    fn dispatch(&mut self, event: &Event) {
        let channel = event.channel as usize;
        match event.cell.kind {
            CellKind::NoteOn => {
                let key = self.channel_instrument(channel);
                if let Some(sound) = event.cell.to_sound(key) {
                    self.tracker.play(channel, sound, &mut self.instruments);
                }
            }
            CellKind::NoteOff => self.tracker.stop(channel, &mut self.instruments),
            CellKind::Empty => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_ir::{Adsr, Cell, InstrumentParams, OrderEntry, Pattern, Waveform, NOTE_A4};

    const SR: f32 = 44100.0;

    fn one_note_song(release: f32) -> Song {
        one_note_song_with(Waveform::Sine, 1, release)
    }

    fn one_note_song_with(waveform: Waveform, voices: u8, release: f32) -> Song {
        let mut song = Song::with_channels("one", 1);
        let inst = song.add_instrument(
            InstrumentParams::new("lead", waveform)
                .with_voices(voices)
                .with_envelope(Adsr::new(0.0, 0.0, 1.0, release)),
        );
        song.assign(0, inst);
        let mut pat = Pattern::new(4, 1);
        *pat.cell_mut(0, 0) = Cell::note_on(NOTE_A4);
        *pat.cell_mut(2, 0) = Cell::note_off();
        let idx = song.add_pattern(pat);
        song.add_order(OrderEntry::Pattern(idx));
        song
    }

    fn peak(s: &[f32]) -> f32 {
        s.iter().fold(0.0f32, |m, x| m.max(x.abs()))
    }

    #[test]
    fn stopped_player_is_silent() {
        let mut player = Player::new(&one_note_song(0.0), SR);
        let mut buf = [1.0f32; 64];
        player.render(&mut buf);
        assert!(buf.iter().all(|&s| s == 0.0));
        assert_eq!(player.position(), 0.0);
    }

    #[test]
    fn note_on_and_off_follow_rows() {
        let mut player = Player::new(&one_note_song(0.0), SR);
        player.play();
        // 4 rows per beat at 120 bpm: a row lasts 5512.5 samples
        let mut buf = std::vec![0.0f32; 11_025];
        player.render(&mut buf);
        assert!(peak(&buf[..5000]) > 0.7);
        assert!(peak(&buf[6000..11_000]) > 0.7);
        let mut after = std::vec![0.0f32; 1000];
        player.render(&mut after);
        assert!(peak(&after[10..]) == 0.0);
    }

    #[test]
    fn finishes_after_last_row_and_tail() {
        let mut player = Player::new(&one_note_song(0.0), SR);
        player.play();
        assert_eq!(player.length(), 1.0);
        let mut n = 0;
        while !player.is_finished() {
            player.render_sample();
            n += 1;
            assert!(n < 100_000);
        }
        assert!(n >= 22_000);
    }

    #[test]
    fn tail_is_bounded() {
        let mut song = one_note_song(60.0);
        song.patterns[0].cell_mut(2, 0).kind = ct_ir::CellKind::Empty;
        let mut player = Player::new(&song, SR);
        player.play();
        let mut n = 0u32;
        while !player.is_finished() {
            player.render_sample();
            n += 1;
        }
        // one beat of song plus ten seconds
        assert!((n as f32 - (22_050.0 + 441_000.0)).abs() < 10.0);
    }

    #[test]
    fn channel_without_instrument_is_silent() {
        let mut song = one_note_song(0.0);
        song.channel_instruments[0] = None;
        let mut player = Player::new(&song, SR);
        player.play();
        let mut buf = [0.0f32; 2000];
        player.render(&mut buf);
        assert!(buf.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn rewind_restarts_song() {
        let mut player = Player::new(&one_note_song(0.0), SR);
        player.play();
        let mut first = [0.0f32; 512];
        player.render(&mut first);
        player.rewind();
        assert_eq!(player.position(), 0.0);
        let mut again = [0.0f32; 512];
        player.render(&mut again);
        assert_eq!(first, again);
    }

    #[test]
    fn rewind_replays_noise() {
        let mut player = Player::new(&one_note_song_with(Waveform::Noise, 2, 0.0), SR);
        player.play();
        let mut first = [0.0f32; 2048];
        player.render(&mut first);
        assert!(peak(&first) > 0.0);
        player.rewind();
        let mut again = [0.0f32; 2048];
        player.render(&mut again);
        assert_eq!(first, again);
    }

    #[test]
    fn master_volume_from_song() {
        let mut song = one_note_song(0.0);
        song.master_volume = 0.5;
        let mut player = Player::new(&song, SR);
        player.play();
        let mut buf = std::vec![0.0f32; 1000];
        player.render(&mut buf);
        let p = peak(&buf);
        assert!(p > 0.45 && p <= 0.5 + 1e-6, "peak {p}");
    }
}
