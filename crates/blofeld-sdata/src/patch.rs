//! Structured sound patch model
//!
//! Every field is a raw 7-bit SDATA value; the meaning of the numbers is
//! left to the device. Field names double as the presentation-layer keys.

use serde::{Deserialize, Serialize};

use crate::field_map::{arp, meta, mod_matrix, modifier, EFFECT_PARAM_COUNT, SDATA_LEN};

/// Oscillator record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Oscillator {
    pub octave: u8,
    /// Semitone
    pub pitch: u8,
    pub bend_range: u8,
    pub keytrack: u8,
    pub detune: u8,
    pub shape: u8,
    pub pw: u8,
    pub pwm: u8,
    pub pwm_source: u8,
    pub fm: u8,
    pub fm_source: u8,
    pub limit_wt: u8,
    pub brilliance: u8,
}

/// Filter record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    #[serde(rename = "type")]
    pub filter_type: u8,
    pub cutoff: u8,
    pub res: u8,
    pub drive: u8,
    pub drive_curve: u8,
    pub env_amt: u8,
    pub env_vel: u8,
    pub keytrack: u8,
    pub mod_source: u8,
    pub mod_amount: u8,
    pub fm_source: u8,
    pub fm_amount: u8,
    pub pan: u8,
    pub pan_source: u8,
    pub pan_amount: u8,
}

/// Envelope record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    pub mode: u8,
    pub attack: u8,
    pub attack_level: u8,
    pub decay: u8,
    pub sustain: u8,
    pub decay2: u8,
    pub sustain2: u8,
    pub release: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lfo {
    pub shape: u8,
    pub speed: u8,
    pub sync: u8,
    pub clocked: u8,
    pub start_phase: u8,
    pub delay: u8,
    pub fade: u8,
    pub keytrack: u8,
}

/// Effect record
///
/// The device addresses the first two effect parameters at the head of the
/// parameter run, so `param1`/`param2` are views into `params` rather than
/// separate storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: u8,
    pub mix: u8,
    pub params: [u8; EFFECT_PARAM_COUNT],
}

impl Effect {
    pub fn param1(&self) -> u8 {
        self.params[0]
    }

    pub fn param2(&self) -> u8 {
        self.params[1]
    }

    pub fn set_param1(&mut self, value: u8) {
        self.params[0] = value;
    }

    pub fn set_param2(&mut self, value: u8) {
        self.params[1] = value;
    }
}

/// Modulation matrix slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModSlot {
    pub source: u8,
    pub amount: u8,
    pub dest: u8,
}

/// Modifier slot (source A op source B, with constant)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifier {
    pub source_a: u8,
    pub source_b: u8,
    pub operator: u8,
    pub constant: u8,
}

/// A Blofeld sound patch
///
/// `category` and `subcategory` are presence-tracked: `None` leaves the
/// encoded byte at the seed value (baseline or zero), `Some(v)` always writes
/// `v`, including an explicit zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patch {
    pub oscillators: [Oscillator; 3],
    pub osc2_sync: u8,
    pub osc_pitch_source: u8,
    pub osc_pitch_amount: u8,

    pub filters: [Filter; 2],

    pub mix_osc1: u8,
    pub mix_osc1_balance: u8,
    pub mix_osc2: u8,
    pub mix_osc2_balance: u8,
    pub mix_osc3: u8,
    pub mix_osc3_balance: u8,
    pub mix_noise: u8,
    pub mix_noise_balance: u8,
    pub mix_noise_color: u8,
    pub mix_ring: u8,
    pub mix_ring_balance: u8,

    pub filter_routing: u8,
    pub glide_mode: u8,
    pub glide_rate: u8,
    pub unison: u8,
    pub unison_detune: u8,

    pub envelopes: [Envelope; 3],
    pub lfos: [Lfo; 3],

    pub mod_matrix: [ModSlot; mod_matrix::SLOTS],
    pub modifiers: [Modifier; modifier::SLOTS],

    pub arp_mode: u8,
    pub arp_pattern: u8,
    pub arp_clock: u8,
    pub arp_length: u8,
    pub arp_range: u8,
    pub arp_direction: u8,
    pub arp_sort: u8,
    pub arp_velocity_mode: u8,
    pub arp_timing_factor: u8,
    pub arp_pattern_reset: u8,
    pub arp_pattern_length: u8,
    pub arp_tempo: u8,
    pub arp_pattern_steps: [u8; arp::PATTERN_STEPS],
    pub arp_pattern_timing: [u8; arp::PATTERN_STEPS],

    pub effects: [Effect; 2],

    pub amp_volume: u8,
    pub amp_velocity: u8,
    pub amp_mod_source: u8,
    pub amp_mod_amount: u8,

    pub master_tune: u8,

    /// Up to 16 ASCII characters
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<u8>,

    /// SDATA block this patch was decoded from
    #[serde(skip)]
    baseline: Option<Box<[u8; SDATA_LEN]>>,
}

impl Patch {
    /// Create an empty patch with the given name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The retained SDATA block, if any
    pub fn baseline(&self) -> Option<&[u8; SDATA_LEN]> {
        self.baseline.as_deref()
    }

    /// Attach a baseline block; unmodeled positions are taken from it on encode
    pub fn with_baseline(mut self, raw: [u8; SDATA_LEN]) -> Self {
        self.baseline = Some(Box::new(raw));
        self
    }

    pub(crate) fn set_baseline(&mut self, raw: [u8; SDATA_LEN]) {
        self.baseline = Some(Box::new(raw));
    }

    /// Drop the retained block; later encodes zero-fill unmodeled positions
    pub fn discard_baseline(&mut self) -> Option<[u8; SDATA_LEN]> {
        self.baseline.take().map(|b| *b)
    }

    /// Name as it will be written: the first [`meta::NAME_LEN`] characters,
    /// one byte each, zero-padded
    ///
    /// Characters outside printable ASCII become [`NAME_REPLACEMENT`], so no
    /// byte in the name reaches 0x80.
    pub fn name_bytes(&self) -> [u8; meta::NAME_LEN] {
        let mut out = [0u8; meta::NAME_LEN];
        for (slot, c) in out.iter_mut().zip(self.name.chars()) {
            *slot = name_unit(c);
        }
        out
    }
}

/// Written in place of characters the device cannot display
pub const NAME_REPLACEMENT: u8 = b'?';

fn name_unit(c: char) -> u8 {
    if c == ' ' || c.is_ascii_graphic() {
        c as u8
    } else {
        NAME_REPLACEMENT
    }
}

/// Read a stored name, dropping trailing zero padding
pub(crate) fn name_from_bytes(raw: &[u8]) -> String {
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    raw[..end]
        .iter()
        .map(|&b| name_unit(b as char) as char)
        .collect()
}
