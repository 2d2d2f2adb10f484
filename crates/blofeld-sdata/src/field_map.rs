//! SDATA offset table
//!
//! Byte positions of every modeled sound parameter inside the 383-byte
//! SDATA block (Blofeld SysEx documentation, section 3.1).
//!
//! Per-slot offsets that the device layout does not provide for every slot
//! are `Option<usize>`; `None` marks the position as absent for that slot and
//! the codec skips it in both directions.

/// Size of one SDATA sound block
pub const SDATA_LEN: usize = 383;

/// Oscillator parameter offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OscillatorOffsets {
    pub octave: Option<usize>,
    pub pitch: usize,
    pub detune: usize,
    pub bend_range: Option<usize>,
    pub keytrack: Option<usize>,
    pub fm_source: usize,
    pub fm: usize,
    pub shape: usize,
    pub pw: usize,
    pub pwm_source: Option<usize>,
    pub pwm: usize,
    pub limit_wt: Option<usize>,
    pub brilliance: Option<usize>,
}

/// Filter parameter offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOffsets {
    pub filter_type: usize,
    pub cutoff: usize,
    pub res: usize,
    pub drive: usize,
    pub drive_curve: usize,
    pub keytrack: usize,
    pub env_amt: usize,
    pub env_vel: usize,
    pub mod_source: usize,
    pub mod_amount: usize,
    pub fm_source: usize,
    pub fm_amount: usize,
    pub pan: usize,
    pub pan_source: usize,
    pub pan_amount: usize,
}

/// Envelope parameter offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeOffsets {
    pub mode: usize,
    pub attack: usize,
    pub attack_level: usize,
    pub decay: usize,
    pub sustain: usize,
    pub decay2: usize,
    pub sustain2: usize,
    pub release: usize,
}

/// LFO parameter offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LfoOffsets {
    pub shape: usize,
    pub speed: usize,
    pub sync: usize,
    pub clocked: usize,
    pub start_phase: usize,
    pub delay: usize,
    pub fade: usize,
    pub keytrack: usize,
}

/// Effect offsets; parameters are a contiguous run starting at `params_start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectOffsets {
    pub effect_type: usize,
    pub mix: usize,
    pub params_start: usize,
}

/// Number of parameter bytes carried by each effect
pub const EFFECT_PARAM_COUNT: usize = 14;

pub const OSCILLATORS: [OscillatorOffsets; 3] = [
    OscillatorOffsets {
        octave: Some(1),
        pitch: 2,
        detune: 3,
        bend_range: Some(4),
        keytrack: Some(5),
        fm_source: 6,
        fm: 7,
        shape: 8,
        pw: 9,
        pwm_source: Some(10),
        pwm: 11,
        limit_wt: Some(14),
        brilliance: Some(16),
    },
    OscillatorOffsets {
        octave: Some(17),
        pitch: 18,
        detune: 19,
        bend_range: Some(20),
        keytrack: Some(21),
        fm_source: 22,
        fm: 23,
        shape: 24,
        pw: 25,
        pwm_source: Some(26),
        pwm: 27,
        limit_wt: Some(30),
        brilliance: Some(32),
    },
    // Oscillator 3 plays no wavetables, so it has no limit-WT address.
    OscillatorOffsets {
        octave: Some(33),
        pitch: 34,
        detune: 35,
        bend_range: Some(36),
        keytrack: Some(37),
        fm_source: 38,
        fm: 39,
        shape: 40,
        pw: 41,
        pwm_source: Some(42),
        pwm: 43,
        limit_wt: None,
        brilliance: Some(48),
    },
];

pub const FILTERS: [FilterOffsets; 2] = [
    FilterOffsets {
        filter_type: 77,
        cutoff: 78,
        res: 80,
        drive: 81,
        drive_curve: 82,
        keytrack: 86,
        env_amt: 87,
        env_vel: 88,
        mod_source: 89,
        mod_amount: 90,
        fm_source: 91,
        fm_amount: 92,
        pan: 93,
        pan_source: 94,
        pan_amount: 95,
    },
    FilterOffsets {
        filter_type: 97,
        cutoff: 98,
        res: 100,
        drive: 101,
        drive_curve: 102,
        keytrack: 106,
        env_amt: 107,
        env_vel: 108,
        mod_source: 109,
        mod_amount: 110,
        fm_source: 111,
        fm_amount: 112,
        pan: 113,
        pan_source: 114,
        pan_amount: 115,
    },
];

/// Filter envelope, amp envelope, envelope 3
pub const ENVELOPES: [EnvelopeOffsets; 3] = [
    EnvelopeOffsets {
        mode: 196,
        attack: 199,
        attack_level: 200,
        decay: 201,
        sustain: 202,
        decay2: 203,
        sustain2: 204,
        release: 205,
    },
    EnvelopeOffsets {
        mode: 208,
        attack: 211,
        attack_level: 212,
        decay: 213,
        sustain: 214,
        decay2: 215,
        sustain2: 216,
        release: 217,
    },
    EnvelopeOffsets {
        mode: 220,
        attack: 223,
        attack_level: 224,
        decay: 225,
        sustain: 226,
        decay2: 227,
        sustain2: 228,
        release: 229,
    },
];

pub const LFOS: [LfoOffsets; 3] = [
    LfoOffsets {
        shape: 160,
        speed: 161,
        sync: 163,
        clocked: 164,
        start_phase: 165,
        delay: 166,
        fade: 167,
        keytrack: 170,
    },
    LfoOffsets {
        shape: 172,
        speed: 173,
        sync: 175,
        clocked: 176,
        start_phase: 177,
        delay: 178,
        fade: 179,
        keytrack: 182,
    },
    LfoOffsets {
        shape: 184,
        speed: 185,
        sync: 187,
        clocked: 188,
        start_phase: 189,
        delay: 190,
        fade: 191,
        keytrack: 194,
    },
];

pub const EFFECTS: [EffectOffsets; 2] = [
    EffectOffsets {
        effect_type: 128,
        mix: 129,
        params_start: 130,
    },
    EffectOffsets {
        effect_type: 144,
        mix: 145,
        params_start: 146,
    },
];

/// Oscillator-section globals
pub mod osc_global {
    pub const OSC2_SYNC: usize = 49;
    pub const PITCH_SOURCE: usize = 50;
    pub const PITCH_AMOUNT: usize = 51;
    /// Reserved slot on the device; kept so the model field round-trips
    pub const MASTER_TUNE: usize = 52;
}

pub mod glide {
    pub const MODE: usize = 56;
    pub const RATE: usize = 57;
    pub const UNISON: usize = 58;
    pub const UNISON_DETUNE: usize = 59;
}

pub mod mixer {
    pub const OSC1: usize = 61;
    pub const OSC1_BALANCE: usize = 62;
    pub const OSC2: usize = 63;
    pub const OSC2_BALANCE: usize = 64;
    pub const OSC3: usize = 65;
    pub const OSC3_BALANCE: usize = 66;
    pub const NOISE: usize = 67;
    pub const NOISE_BALANCE: usize = 68;
    pub const NOISE_COLOR: usize = 69;
    pub const RING: usize = 71;
    pub const RING_BALANCE: usize = 72;
}

pub const FILTER_ROUTING: usize = 117;

pub mod amp {
    pub const VOLUME: usize = 121;
    pub const VELOCITY: usize = 122;
    pub const MOD_SOURCE: usize = 123;
    pub const MOD_AMOUNT: usize = 124;
}

/// Modifier slots: source A, source B, operator, constant
pub mod modifier {
    pub const START: usize = 245;
    pub const STRIDE: usize = 4;
    pub const SLOTS: usize = 4;
}

/// Modulation matrix slots: source, destination, amount
pub mod mod_matrix {
    pub const START: usize = 261;
    pub const STRIDE: usize = 3;
    pub const SLOTS: usize = 16;
}

pub mod arp {
    pub const MODE: usize = 311;
    pub const PATTERN: usize = 312;
    pub const CLOCK: usize = 314;
    pub const LENGTH: usize = 315;
    pub const RANGE: usize = 316;
    pub const DIRECTION: usize = 317;
    pub const SORT: usize = 318;
    pub const VELOCITY_MODE: usize = 319;
    pub const TIMING_FACTOR: usize = 320;
    pub const PATTERN_RESET: usize = 322;
    pub const PATTERN_LENGTH: usize = 323;
    pub const TEMPO: usize = 326;
    pub const STEPS_START: usize = 327;
    pub const TIMING_START: usize = 343;
    pub const PATTERN_STEPS: usize = 16;
}

/// Name and browser metadata at the tail of the block
pub mod meta {
    pub const NAME_START: usize = 363;
    pub const NAME_LEN: usize = 16;
    pub const CATEGORY: usize = 379;
    pub const SUBCATEGORY: usize = 380;
}

/// Field pairs that share one offset on purpose. Empty for this layout.
pub const INTENTIONAL_ALIASES: &[(&str, &str)] = &[];

/// Enumerate every modeled (field path, offset) pair
///
/// Absent offsets are not listed. Used for layout consistency checks and
/// diagnostics.
pub fn field_offsets() -> Vec<(String, usize)> {
    let mut out = Vec::with_capacity(320);
    let mut push = |name: String, offset: usize| out.push((name, offset));

    for (i, o) in OSCILLATORS.iter().enumerate() {
        let p = format!("oscillators[{}]", i);
        let optional = [
            ("octave", o.octave),
            ("bend_range", o.bend_range),
            ("keytrack", o.keytrack),
            ("pwm_source", o.pwm_source),
            ("limit_wt", o.limit_wt),
            ("brilliance", o.brilliance),
        ];
        for (field, offset) in optional {
            if let Some(offset) = offset {
                push(format!("{}.{}", p, field), offset);
            }
        }
        for (field, offset) in [
            ("pitch", o.pitch),
            ("detune", o.detune),
            ("fm_source", o.fm_source),
            ("fm", o.fm),
            ("shape", o.shape),
            ("pw", o.pw),
            ("pwm", o.pwm),
        ] {
            push(format!("{}.{}", p, field), offset);
        }
    }

    for (i, f) in FILTERS.iter().enumerate() {
        for (field, offset) in [
            ("type", f.filter_type),
            ("cutoff", f.cutoff),
            ("res", f.res),
            ("drive", f.drive),
            ("drive_curve", f.drive_curve),
            ("keytrack", f.keytrack),
            ("env_amt", f.env_amt),
            ("env_vel", f.env_vel),
            ("mod_source", f.mod_source),
            ("mod_amount", f.mod_amount),
            ("fm_source", f.fm_source),
            ("fm_amount", f.fm_amount),
            ("pan", f.pan),
            ("pan_source", f.pan_source),
            ("pan_amount", f.pan_amount),
        ] {
            push(format!("filters[{}].{}", i, field), offset);
        }
    }

    for (i, e) in ENVELOPES.iter().enumerate() {
        for (field, offset) in [
            ("mode", e.mode),
            ("attack", e.attack),
            ("attack_level", e.attack_level),
            ("decay", e.decay),
            ("sustain", e.sustain),
            ("decay2", e.decay2),
            ("sustain2", e.sustain2),
            ("release", e.release),
        ] {
            push(format!("envelopes[{}].{}", i, field), offset);
        }
    }

    for (i, l) in LFOS.iter().enumerate() {
        for (field, offset) in [
            ("shape", l.shape),
            ("speed", l.speed),
            ("sync", l.sync),
            ("clocked", l.clocked),
            ("start_phase", l.start_phase),
            ("delay", l.delay),
            ("fade", l.fade),
            ("keytrack", l.keytrack),
        ] {
            push(format!("lfos[{}].{}", i, field), offset);
        }
    }

    for (i, e) in EFFECTS.iter().enumerate() {
        push(format!("effects[{}].type", i), e.effect_type);
        push(format!("effects[{}].mix", i), e.mix);
        for j in 0..EFFECT_PARAM_COUNT {
            push(format!("effects[{}].params[{}]", i, j), e.params_start + j);
        }
    }

    for i in 0..mod_matrix::SLOTS {
        let base = mod_matrix::START + i * mod_matrix::STRIDE;
        push(format!("mod_matrix[{}].source", i), base);
        push(format!("mod_matrix[{}].dest", i), base + 1);
        push(format!("mod_matrix[{}].amount", i), base + 2);
    }

    for i in 0..modifier::SLOTS {
        let base = modifier::START + i * modifier::STRIDE;
        push(format!("modifiers[{}].source_a", i), base);
        push(format!("modifiers[{}].source_b", i), base + 1);
        push(format!("modifiers[{}].operator", i), base + 2);
        push(format!("modifiers[{}].constant", i), base + 3);
    }

    for (name, offset) in [
        ("osc2_sync", osc_global::OSC2_SYNC),
        ("osc_pitch_source", osc_global::PITCH_SOURCE),
        ("osc_pitch_amount", osc_global::PITCH_AMOUNT),
        ("master_tune", osc_global::MASTER_TUNE),
        ("glide_mode", glide::MODE),
        ("glide_rate", glide::RATE),
        ("unison", glide::UNISON),
        ("unison_detune", glide::UNISON_DETUNE),
        ("mix_osc1", mixer::OSC1),
        ("mix_osc1_balance", mixer::OSC1_BALANCE),
        ("mix_osc2", mixer::OSC2),
        ("mix_osc2_balance", mixer::OSC2_BALANCE),
        ("mix_osc3", mixer::OSC3),
        ("mix_osc3_balance", mixer::OSC3_BALANCE),
        ("mix_noise", mixer::NOISE),
        ("mix_noise_balance", mixer::NOISE_BALANCE),
        ("mix_noise_color", mixer::NOISE_COLOR),
        ("mix_ring", mixer::RING),
        ("mix_ring_balance", mixer::RING_BALANCE),
        ("filter_routing", FILTER_ROUTING),
        ("amp_volume", amp::VOLUME),
        ("amp_velocity", amp::VELOCITY),
        ("amp_mod_source", amp::MOD_SOURCE),
        ("amp_mod_amount", amp::MOD_AMOUNT),
        ("arp_mode", arp::MODE),
        ("arp_pattern", arp::PATTERN),
        ("arp_clock", arp::CLOCK),
        ("arp_length", arp::LENGTH),
        ("arp_range", arp::RANGE),
        ("arp_direction", arp::DIRECTION),
        ("arp_sort", arp::SORT),
        ("arp_velocity_mode", arp::VELOCITY_MODE),
        ("arp_timing_factor", arp::TIMING_FACTOR),
        ("arp_pattern_reset", arp::PATTERN_RESET),
        ("arp_pattern_length", arp::PATTERN_LENGTH),
        ("arp_tempo", arp::TEMPO),
        ("category", meta::CATEGORY),
        ("subcategory", meta::SUBCATEGORY),
    ] {
        push(name.to_string(), offset);
    }

    for i in 0..arp::PATTERN_STEPS {
        push(format!("arp_pattern_steps[{}]", i), arp::STEPS_START + i);
        push(format!("arp_pattern_timing[{}]", i), arp::TIMING_START + i);
    }

    for i in 0..meta::NAME_LEN {
        push(format!("name[{}]", i), meta::NAME_START + i);
    }

    out
}
