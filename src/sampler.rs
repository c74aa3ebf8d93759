use crate::keys::SampleId;

#[derive(Clone, Copy, Debug)]
struct Voice {
    sample_id: SampleId,
    start_sample: u64,
    phase: f32,
    phase_inc: f32,
    amp0: f32,
    max_harmonic_odd: u32,
}

/// One-shot sample playback: each strike starts a struck-string voice at the
/// sample's pitch and lets it ring out. There is no note-off; a voice dies
/// when its envelope decays to silence.
pub struct Sampler {
    sample_rate_hz: f32,
    sample: u64,
    voices: Vec<Voice>,
}

const A4_TUNING_HZ: f32 = 440.0;
const STRIKE_AMP: f32 = 0.12;

impl Sampler {
    pub fn new(sample_rate_hz: u32) -> Self {
        Self {
            sample_rate_hz: sample_rate_hz.max(1) as f32,
            sample: 0,
            voices: Vec::new(),
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate_hz: u32) {
        self.sample_rate_hz = sample_rate_hz.max(1) as f32;
    }

    pub fn strike(&mut self, sample_id: SampleId) {
        let freq_hz = midi_to_hz(sample_id.midi_note().0 as f32);
        let phase_inc = (2.0 * std::f32::consts::PI * freq_hz) / self.sample_rate_hz;

        // Band-limit the tone by only summing harmonics under Nyquist.
        // Limit upper harmonics to keep CPU bounded.
        let nyquist = self.sample_rate_hz * 0.5;
        let mut max_harmonic = (nyquist / freq_hz).floor() as u32;
        if max_harmonic < 1 {
            max_harmonic = 1;
        }
        if (max_harmonic & 1) == 0 {
            max_harmonic = max_harmonic.saturating_sub(1);
        }
        max_harmonic = max_harmonic.min(15); // 1..15 odd => at most 8 sines

        let voice = Voice {
            sample_id,
            start_sample: self.sample,
            phase: 0.0,
            phase_inc,
            amp0: STRIKE_AMP,
            max_harmonic_odd: max_harmonic,
        };

        // Restriking a sample restarts it rather than stacking copies.
        if let Some(v) = self.voices.iter_mut().find(|v| v.sample_id == sample_id) {
            *v = voice;
            return;
        }

        const MAX_VOICES: usize = 24;
        if self.voices.len() >= MAX_VOICES {
            self.voices.swap_remove(0);
        }

        self.voices.push(voice);
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    fn render_sample(&mut self) -> f32 {
        // Exponential decay time constant (seconds)
        const TAU_S: f32 = 0.60;
        const ATTACK_S: f32 = 0.004; // short ramp to prevent clicks
        const SILENCE: f32 = 1.0e-4;

        let mut acc = 0.0f32;
        for v in &mut self.voices {
            let age_s = (self.sample - v.start_sample) as f32 / self.sample_rate_hz;

            let attack = (age_s / ATTACK_S).min(1.0);
            let decay = (-age_s / TAU_S).exp();
            let env = attack * decay;

            // Band-limited square: sum odd harmonics under Nyquist.
            // square(t) = (4/pi) * Σ_{n odd} sin(n*phase)/n
            let mut sq = 0.0f32;
            let mut n = 1u32;
            while n <= v.max_harmonic_odd {
                sq += (n as f32 * v.phase).sin() / (n as f32);
                n += 2;
            }
            sq *= 4.0 / std::f32::consts::PI;

            acc += v.amp0 * env * sq;

            v.phase += v.phase_inc;
            if v.phase >= 2.0 * std::f32::consts::PI {
                v.phase -= 2.0 * std::f32::consts::PI;
            }
        }

        self.sample += 1;

        // Periodically prune finished voices.
        if (self.sample & 0xFF) == 0 {
            let sample = self.sample;
            let rate = self.sample_rate_hz;
            self.voices.retain(|v| {
                let age_s = (sample - v.start_sample) as f32 / rate;
                v.amp0 * (-age_s / TAU_S).exp() > SILENCE
            });
        }

        // Cheap soft limiter to avoid harsh clipping when multiple voices overlap.
        acc / (1.0 + acc.abs())
    }

    pub fn render_i16_mono(&mut self, out: &mut [i16]) {
        self.render_i16_interleaved(out, 1);
    }

    pub fn render_f32_mono(&mut self, out: &mut [f32]) {
        self.render_f32_interleaved(out, 1);
    }

    pub fn render_i16_interleaved(&mut self, out: &mut [i16], channels: usize) {
        assert!(channels >= 1);
        assert!(out.len() % channels == 0);

        let frames = out.len() / channels;
        for frame in 0..frames {
            let s = (self.render_sample() * i16::MAX as f32) as i16;
            let base = frame * channels;
            for ch in 0..channels {
                out[base + ch] = s;
            }
        }
    }

    pub fn render_f32_interleaved(&mut self, out: &mut [f32], channels: usize) {
        assert!(channels >= 1);
        assert!(out.len() % channels == 0);

        let frames = out.len() / channels;
        for frame in 0..frames {
            let s = self.render_sample();
            let base = frame * channels;
            for ch in 0..channels {
                out[base + ch] = s;
            }
        }
    }
}

fn midi_to_hz(midi: f32) -> f32 {
    A4_TUNING_HZ * (2.0f32).powf((midi - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strike_produces_audio_i16() {
        let mut s = Sampler::new(48_000);
        s.strike(SampleId::A2);

        let mut buf = [0i16; 512];
        s.render_i16_mono(&mut buf);

        assert!(buf.iter().any(|&x| x != 0));
    }

    #[test]
    fn strike_produces_audio_f32_within_range() {
        let mut s = Sampler::new(48_000);
        s.strike(SampleId::C2);
        s.strike(SampleId::E2);
        s.strike(SampleId::G2);

        let mut buf = [0.0f32; 512];
        s.render_f32_mono(&mut buf);

        assert!(buf.iter().any(|&x| x != 0.0));
        assert!(buf.iter().all(|&x| x.abs() <= 1.0));
    }

    #[test]
    fn struck_voice_decays_to_silence_on_its_own() {
        let mut s = Sampler::new(48_000);
        s.strike(SampleId::B3);

        // ~6 decay constants; whatever is left should be inaudible.
        let mut buf = vec![0.0f32; 48_000 * 4];
        s.render_f32_mono(&mut buf);

        let tail_max = buf[buf.len() - 2048..]
            .iter()
            .fold(0.0f32, |m, &x| m.max(x.abs()));
        assert!(tail_max < 1.0e-2, "expected near-silence, got tail_max={tail_max}");
    }

    #[test]
    fn restrike_restarts_instead_of_stacking() {
        let mut s = Sampler::new(48_000);
        s.strike(SampleId::C3);
        s.strike(SampleId::C3);
        s.strike(SampleId::C3);
        assert_eq!(s.active_voices(), 1);
    }

    #[test]
    fn voice_count_is_capped() {
        let mut s = Sampler::new(48_000);
        for sample in crate::keys::WHITE_SAMPLES {
            s.strike(sample);
        }
        for (_, sample) in crate::keys::BLACK_SAMPLES {
            s.strike(sample);
        }
        assert!(s.active_voices() <= 24);
    }
}
