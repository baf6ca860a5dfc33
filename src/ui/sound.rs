/// Sound: the audio capability handed to the app, plus the rodio backend.
///
/// Every effect is synthesised into an in-memory WAV buffer at start-up;
/// playback is fire-and-forget through a detached rodio `Sink`.
///
/// Build without the "sound" feature (or run without an output device) and
/// `open_player` hands back a `SilentPlayer` that only tracks settings.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum SoundEffect {
    ButtonClick,
    Hover,
    Success,
    Error,
    Complete,
    Popup,
    Select,
    Start,
    LevelUp,
    CountDown,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 10] = [
        SoundEffect::ButtonClick, SoundEffect::Hover, SoundEffect::Success,
        SoundEffect::Error, SoundEffect::Complete, SoundEffect::Popup,
        SoundEffect::Select, SoundEffect::Start, SoundEffect::LevelUp,
        SoundEffect::CountDown,
    ];

    pub fn id(self) -> &'static str {
        match self {
            SoundEffect::ButtonClick => "buttonClick",
            SoundEffect::Hover => "hover",
            SoundEffect::Success => "success",
            SoundEffect::Error => "error",
            SoundEffect::Complete => "complete",
            SoundEffect::Popup => "popup",
            SoundEffect::Select => "select",
            SoundEffect::Start => "start",
            SoundEffect::LevelUp => "levelUp",
            SoundEffect::CountDown => "countDown",
        }
    }

    pub fn from_id(id: &str) -> Option<SoundEffect> {
        SoundEffect::ALL.into_iter().find(|e| e.id() == id)
    }
}

// ── Settings ──

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct AudioSettings {
    volume: f32,
    pub muted: bool,
}

impl AudioSettings {
    pub fn new(volume: f32, muted: bool) -> Self {
        let mut s = AudioSettings { volume: 0.5, muted };
        s.set_volume(volume);
        s
    }

    /// Clamped to [0, 1]; NaN is ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_nan() {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        AudioSettings::new(0.5, false)
    }
}

/// Audio capability. Playback failures never reach the caller.
pub trait SoundPlayer {
    fn settings(&self) -> &AudioSettings;
    fn settings_mut(&mut self) -> &mut AudioSettings;

    /// Play one effect if not muted.
    fn play_effect(&mut self, effect: SoundEffect);

    /// Play by id; unknown ids are logged and ignored.
    fn play(&mut self, id: &str) {
        match SoundEffect::from_id(id) {
            Some(effect) => self.play_effect(effect),
            None => log::warn!("unknown sound effect {id:?}"),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.settings_mut().set_volume(volume);
    }

    fn volume(&self) -> f32 {
        self.settings().volume()
    }

    fn set_muted(&mut self, muted: bool) {
        self.settings_mut().muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.settings().muted
    }

    fn toggle_muted(&mut self) {
        let muted = self.is_muted();
        self.set_muted(!muted);
    }
}

/// No device, or built without audio.
#[derive(Debug, Default)]
pub struct SilentPlayer {
    settings: AudioSettings,
}

impl SilentPlayer {
    pub fn new(settings: AudioSettings) -> Self {
        SilentPlayer { settings }
    }
}

impl SoundPlayer for SilentPlayer {
    fn settings(&self) -> &AudioSettings { &self.settings }
    fn settings_mut(&mut self) -> &mut AudioSettings { &mut self.settings }

    fn play_effect(&mut self, effect: SoundEffect) {
        log::trace!("(silent) {}", effect.id());
    }
}

/// Best available player for this build and machine.
pub fn open_player(settings: AudioSettings) -> Box<dyn SoundPlayer> {
    #[cfg(feature = "sound")]
    {
        if let Some(engine) = inner::SoundEngine::new(settings) {
            log::info!("audio output opened");
            return Box::new(engine);
        }
        log::warn!("no audio output device, sound disabled");
    }
    Box::new(SilentPlayer::new(settings))
}

#[cfg(feature = "sound")]
mod inner {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{synth, AudioSettings, SoundEffect, SoundPlayer};

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        buffers: HashMap<SoundEffect, Arc<Vec<u8>>>,
        settings: AudioSettings,
    }

    impl SoundEngine {
        pub fn new(settings: AudioSettings) -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            let buffers = SoundEffect::ALL
                .into_iter()
                .map(|e| (e, Arc::new(synth::make_wav(&synth::generate(e)))))
                .collect();
            Some(SoundEngine { _stream: stream, handle, buffers, settings })
        }
    }

    impl SoundPlayer for SoundEngine {
        fn settings(&self) -> &AudioSettings { &self.settings }
        fn settings_mut(&mut self) -> &mut AudioSettings { &mut self.settings }

        fn play_effect(&mut self, effect: SoundEffect) {
            if self.settings.muted {
                return;
            }
            let Some(buf) = self.buffers.get(&effect) else { return };
            let sink = match Sink::try_new(&self.handle) {
                Ok(sink) => sink,
                Err(e) => {
                    log::warn!("sound {}: {e}", effect.id());
                    return;
                }
            };
            match rodio::Decoder::new(Cursor::new(buf.as_ref().clone())) {
                Ok(src) => {
                    sink.set_volume(self.settings.volume());
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                    log::trace!("played {}", effect.id());
                }
                Err(e) => log::warn!("sound {}: {e}", effect.id()),
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Synthesis: effect → mono f32 samples → WAV bytes
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
mod synth {
    use std::f32::consts::PI;

    use super::SoundEffect;

    pub const SAMPLE_RATE: u32 = 22050;

    pub fn generate(effect: SoundEffect) -> Vec<f32> {
        match effect {
            SoundEffect::ButtonClick => blip(800.0, 0.05, 0.25),
            SoundEffect::Hover => blip(1200.0, 0.03, 0.12),
            SoundEffect::Success => arpeggio(&[1047.0, 1319.0, 1568.0], 0.045, 0.25), // C6 E6 G6
            SoundEffect::Error => buzz(),
            SoundEffect::Complete => fanfare(),
            SoundEffect::Popup => sweep(400.0, 900.0, 0.12, 0.22),
            SoundEffect::Select => chime(),
            SoundEffect::Start => arpeggio(&[523.0, 784.0, 1047.0], 0.07, 0.28), // C5 G5 C6
            SoundEffect::LevelUp => arpeggio(&[523.0, 659.0, 784.0, 1047.0, 1319.0], 0.06, 0.25),
            SoundEffect::CountDown => blip(880.0, 0.08, 0.3),
        }
    }

    fn samples(duration: f32) -> usize {
        (SAMPLE_RATE as f32 * duration) as usize
    }

    /// Sine blip with a linear fade out
    fn blip(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = samples(duration);
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32);
                (t * freq * 2.0 * PI).sin() * env * volume
            })
            .collect()
    }

    /// Frequency glide from `from` to `to`
    fn sweep(from: f32, to: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = samples(duration);
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = from + (to - from) * t;
                phase += freq * 2.0 * PI / SAMPLE_RATE as f32;
                phase.sin() * (1.0 - t).powf(0.6) * volume
            })
            .collect()
    }

    /// Quick run of notes, sine + 3rd harmonic for a retro edge
    fn arpeggio(notes: &[f32], note_dur: f32, volume: f32) -> Vec<f32> {
        let mut out = Vec::new();
        for &freq in notes {
            let n = samples(note_dur);
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (t * freq * 2.0 * PI).sin() * 0.7
                    + (t * freq * 3.0 * 2.0 * PI).sin() * 0.3;
                out.push(wave * env * volume);
            }
        }
        out
    }

    /// Error: low descending tone over noise
    fn buzz() -> Vec<f32> {
        let n = samples(0.15);
        let mut rng: u32 = 12345;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 220.0 - t * 90.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * freq * 2.0 * PI).sin().signum();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                (tone * 0.7 + noise * 0.3) * (1.0 - t).powf(0.8) * 0.2
            })
            .collect()
    }

    /// Match complete: ascending fanfare with a held top note
    fn fanfare() -> Vec<f32> {
        let notes = [523.0_f32, 659.0, 784.0, 1047.0]; // C5 E5 G5 C6
        let mut out = Vec::new();
        for &freq in &notes {
            let n = samples(0.1);
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = (t * freq * 2.0 * PI).sin() * 0.6
                    + (t * freq * 2.0 * 2.0 * PI).sin() * 0.3
                    + (t * freq * 3.0 * 2.0 * PI).sin() * 0.1;
                out.push(wave * env * 0.3);
            }
        }
        let n = samples(0.25);
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32);
            out.push((t * 1047.0 * 2.0 * PI).sin() * env * 0.3);
        }
        out
    }

    /// Select: two-note chime G5 → C6
    fn chime() -> Vec<f32> {
        let mut out = Vec::new();
        for &(freq, dur) in &[(784.0_f32, 0.06_f32), (1047.0, 0.1)] {
            let n = samples(dur);
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (t * freq * 2.0 * PI).sin() * 0.7
                    + (t * freq * 2.0 * 2.0 * PI).sin() * 0.3;
                out.push(wave * env * 0.25);
            }
        }
        out
    }

    /// 16-bit mono PCM WAV
    pub fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }
}
