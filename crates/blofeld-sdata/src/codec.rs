//! SDATA codec
//!
//! Converts between the 383-byte SDATA block and [`Patch`] using the offset
//! tables in [`crate::field_map`].

use tracing::trace;

use crate::error::{CodecError, CodecResult};
use crate::field_map::{
    amp, arp, glide, meta, mixer, mod_matrix, modifier, osc_global, EffectOffsets,
    EnvelopeOffsets, FilterOffsets, LfoOffsets, OscillatorOffsets, EFFECTS, EFFECT_PARAM_COUNT,
    ENVELOPES, FILTERS, FILTER_ROUTING, LFOS, OSCILLATORS, SDATA_LEN,
};
use crate::patch::{
    name_from_bytes, Effect, Envelope, Filter, Lfo, ModSlot, Modifier, Oscillator, Patch,
};

/// Decode an SDATA block into a patch
///
/// The block is retained as the patch's baseline so that a later
/// [`encode`] reproduces every unmodeled byte.
pub fn decode(raw: &[u8]) -> CodecResult<Patch> {
    let data: &[u8; SDATA_LEN] = raw.try_into().map_err(|_| CodecError::InvalidLength {
        expected: SDATA_LEN,
        actual: raw.len(),
    })?;

    trace!(sdata = %hex::encode(data), "Decoding SDATA");

    let mut p = Patch::default();

    for (osc, m) in p.oscillators.iter_mut().zip(OSCILLATORS.iter()) {
        *osc = decode_oscillator(data, m);
    }
    p.osc2_sync = data[osc_global::OSC2_SYNC];
    p.osc_pitch_source = data[osc_global::PITCH_SOURCE];
    p.osc_pitch_amount = data[osc_global::PITCH_AMOUNT];
    p.master_tune = data[osc_global::MASTER_TUNE];

    p.mix_osc1 = data[mixer::OSC1];
    p.mix_osc1_balance = data[mixer::OSC1_BALANCE];
    p.mix_osc2 = data[mixer::OSC2];
    p.mix_osc2_balance = data[mixer::OSC2_BALANCE];
    p.mix_osc3 = data[mixer::OSC3];
    p.mix_osc3_balance = data[mixer::OSC3_BALANCE];
    p.mix_noise = data[mixer::NOISE];
    p.mix_noise_balance = data[mixer::NOISE_BALANCE];
    p.mix_noise_color = data[mixer::NOISE_COLOR];
    p.mix_ring = data[mixer::RING];
    p.mix_ring_balance = data[mixer::RING_BALANCE];

    for (filter, m) in p.filters.iter_mut().zip(FILTERS.iter()) {
        *filter = decode_filter(data, m);
    }
    p.filter_routing = data[FILTER_ROUTING];

    p.glide_mode = data[glide::MODE];
    p.glide_rate = data[glide::RATE];
    p.unison = data[glide::UNISON];
    p.unison_detune = data[glide::UNISON_DETUNE];

    for (env, m) in p.envelopes.iter_mut().zip(ENVELOPES.iter()) {
        *env = decode_envelope(data, m);
    }
    for (lfo, m) in p.lfos.iter_mut().zip(LFOS.iter()) {
        *lfo = decode_lfo(data, m);
    }
    for (fx, m) in p.effects.iter_mut().zip(EFFECTS.iter()) {
        *fx = decode_effect(data, m);
    }

    for (i, slot) in p.mod_matrix.iter_mut().enumerate() {
        let base = mod_matrix::START + i * mod_matrix::STRIDE;
        *slot = ModSlot {
            source: data[base],
            dest: data[base + 1],
            amount: data[base + 2],
        };
    }
    for (i, slot) in p.modifiers.iter_mut().enumerate() {
        let base = modifier::START + i * modifier::STRIDE;
        *slot = Modifier {
            source_a: data[base],
            source_b: data[base + 1],
            operator: data[base + 2],
            constant: data[base + 3],
        };
    }

    p.arp_mode = data[arp::MODE];
    p.arp_pattern = data[arp::PATTERN];
    p.arp_clock = data[arp::CLOCK];
    p.arp_length = data[arp::LENGTH];
    p.arp_range = data[arp::RANGE];
    p.arp_direction = data[arp::DIRECTION];
    p.arp_sort = data[arp::SORT];
    p.arp_velocity_mode = data[arp::VELOCITY_MODE];
    p.arp_timing_factor = data[arp::TIMING_FACTOR];
    p.arp_pattern_reset = data[arp::PATTERN_RESET];
    p.arp_pattern_length = data[arp::PATTERN_LENGTH];
    p.arp_tempo = data[arp::TEMPO];
    p.arp_pattern_steps
        .copy_from_slice(&data[arp::STEPS_START..arp::STEPS_START + arp::PATTERN_STEPS]);
    p.arp_pattern_timing
        .copy_from_slice(&data[arp::TIMING_START..arp::TIMING_START + arp::PATTERN_STEPS]);

    p.amp_volume = data[amp::VOLUME];
    p.amp_velocity = data[amp::VELOCITY];
    p.amp_mod_source = data[amp::MOD_SOURCE];
    p.amp_mod_amount = data[amp::MOD_AMOUNT];

    p.name = name_from_bytes(&data[meta::NAME_START..meta::NAME_START + meta::NAME_LEN]);
    p.category = Some(data[meta::CATEGORY]);
    p.subcategory = Some(data[meta::SUBCATEGORY]);

    p.set_baseline(*data);
    Ok(p)
}

/// Encode a patch into an SDATA block
///
/// The output is seeded from the patch's baseline when present, otherwise
/// from zeros, and every modeled field is written on top.
pub fn encode(p: &Patch) -> [u8; SDATA_LEN] {
    let mut data = p.baseline().copied().unwrap_or([0u8; SDATA_LEN]);

    for (osc, m) in p.oscillators.iter().zip(OSCILLATORS.iter()) {
        encode_oscillator(&mut data, m, osc);
    }
    data[osc_global::OSC2_SYNC] = p.osc2_sync;
    data[osc_global::PITCH_SOURCE] = p.osc_pitch_source;
    data[osc_global::PITCH_AMOUNT] = p.osc_pitch_amount;
    data[osc_global::MASTER_TUNE] = p.master_tune;

    data[mixer::OSC1] = p.mix_osc1;
    data[mixer::OSC1_BALANCE] = p.mix_osc1_balance;
    data[mixer::OSC2] = p.mix_osc2;
    data[mixer::OSC2_BALANCE] = p.mix_osc2_balance;
    data[mixer::OSC3] = p.mix_osc3;
    data[mixer::OSC3_BALANCE] = p.mix_osc3_balance;
    data[mixer::NOISE] = p.mix_noise;
    data[mixer::NOISE_BALANCE] = p.mix_noise_balance;
    data[mixer::NOISE_COLOR] = p.mix_noise_color;
    data[mixer::RING] = p.mix_ring;
    data[mixer::RING_BALANCE] = p.mix_ring_balance;

    for (filter, m) in p.filters.iter().zip(FILTERS.iter()) {
        encode_filter(&mut data, m, filter);
    }
    data[FILTER_ROUTING] = p.filter_routing;

    data[glide::MODE] = p.glide_mode;
    data[glide::RATE] = p.glide_rate;
    data[glide::UNISON] = p.unison;
    data[glide::UNISON_DETUNE] = p.unison_detune;

    for (env, m) in p.envelopes.iter().zip(ENVELOPES.iter()) {
        encode_envelope(&mut data, m, env);
    }
    for (lfo, m) in p.lfos.iter().zip(LFOS.iter()) {
        encode_lfo(&mut data, m, lfo);
    }
    for (fx, m) in p.effects.iter().zip(EFFECTS.iter()) {
        encode_effect(&mut data, m, fx);
    }

    for (i, slot) in p.mod_matrix.iter().enumerate() {
        let base = mod_matrix::START + i * mod_matrix::STRIDE;
        data[base] = slot.source;
        data[base + 1] = slot.dest;
        data[base + 2] = slot.amount;
    }
    for (i, slot) in p.modifiers.iter().enumerate() {
        let base = modifier::START + i * modifier::STRIDE;
        data[base] = slot.source_a;
        data[base + 1] = slot.source_b;
        data[base + 2] = slot.operator;
        data[base + 3] = slot.constant;
    }

    data[arp::MODE] = p.arp_mode;
    data[arp::PATTERN] = p.arp_pattern;
    data[arp::CLOCK] = p.arp_clock;
    data[arp::LENGTH] = p.arp_length;
    data[arp::RANGE] = p.arp_range;
    data[arp::DIRECTION] = p.arp_direction;
    data[arp::SORT] = p.arp_sort;
    data[arp::VELOCITY_MODE] = p.arp_velocity_mode;
    data[arp::TIMING_FACTOR] = p.arp_timing_factor;
    data[arp::PATTERN_RESET] = p.arp_pattern_reset;
    data[arp::PATTERN_LENGTH] = p.arp_pattern_length;
    data[arp::TEMPO] = p.arp_tempo;
    data[arp::STEPS_START..arp::STEPS_START + arp::PATTERN_STEPS]
        .copy_from_slice(&p.arp_pattern_steps);
    data[arp::TIMING_START..arp::TIMING_START + arp::PATTERN_STEPS]
        .copy_from_slice(&p.arp_pattern_timing);

    data[amp::VOLUME] = p.amp_volume;
    data[amp::VELOCITY] = p.amp_velocity;
    data[amp::MOD_SOURCE] = p.amp_mod_source;
    data[amp::MOD_AMOUNT] = p.amp_mod_amount;

    data[meta::NAME_START..meta::NAME_START + meta::NAME_LEN].copy_from_slice(&p.name_bytes());

    // Unset browser codes keep whatever the seed holds.
    if let Some(category) = p.category {
        data[meta::CATEGORY] = category;
    }
    if let Some(subcategory) = p.subcategory {
        data[meta::SUBCATEGORY] = subcategory;
    }

    trace!(
        sdata = %hex::encode(data),
        baseline = p.baseline().is_some(),
        "Encoded SDATA"
    );
    data
}

/// [`encode`] into an owned `Vec`
pub fn encode_vec(p: &Patch) -> Vec<u8> {
    encode(p).to_vec()
}

fn read_opt(data: &[u8; SDATA_LEN], offset: Option<usize>) -> u8 {
    offset.map_or(0, |o| data[o])
}

fn write_opt(data: &mut [u8; SDATA_LEN], offset: Option<usize>, value: u8) {
    if let Some(o) = offset {
        data[o] = value;
    }
}

fn decode_oscillator(data: &[u8; SDATA_LEN], m: &OscillatorOffsets) -> Oscillator {
    Oscillator {
        octave: read_opt(data, m.octave),
        pitch: data[m.pitch],
        bend_range: read_opt(data, m.bend_range),
        keytrack: read_opt(data, m.keytrack),
        detune: data[m.detune],
        shape: data[m.shape],
        pw: data[m.pw],
        pwm: data[m.pwm],
        pwm_source: read_opt(data, m.pwm_source),
        fm: data[m.fm],
        fm_source: data[m.fm_source],
        limit_wt: read_opt(data, m.limit_wt),
        brilliance: read_opt(data, m.brilliance),
    }
}

fn encode_oscillator(data: &mut [u8; SDATA_LEN], m: &OscillatorOffsets, osc: &Oscillator) {
    write_opt(data, m.octave, osc.octave);
    data[m.pitch] = osc.pitch;
    write_opt(data, m.bend_range, osc.bend_range);
    write_opt(data, m.keytrack, osc.keytrack);
    data[m.detune] = osc.detune;
    data[m.fm_source] = osc.fm_source;
    data[m.fm] = osc.fm;
    data[m.shape] = osc.shape;
    data[m.pw] = osc.pw;
    write_opt(data, m.pwm_source, osc.pwm_source);
    data[m.pwm] = osc.pwm;
    write_opt(data, m.limit_wt, osc.limit_wt);
    write_opt(data, m.brilliance, osc.brilliance);
}

fn decode_filter(data: &[u8; SDATA_LEN], m: &FilterOffsets) -> Filter {
    Filter {
        filter_type: data[m.filter_type],
        cutoff: data[m.cutoff],
        res: data[m.res],
        drive: data[m.drive],
        drive_curve: data[m.drive_curve],
        env_amt: data[m.env_amt],
        env_vel: data[m.env_vel],
        keytrack: data[m.keytrack],
        mod_source: data[m.mod_source],
        mod_amount: data[m.mod_amount],
        fm_source: data[m.fm_source],
        fm_amount: data[m.fm_amount],
        pan: data[m.pan],
        pan_source: data[m.pan_source],
        pan_amount: data[m.pan_amount],
    }
}

fn encode_filter(data: &mut [u8; SDATA_LEN], m: &FilterOffsets, f: &Filter) {
    data[m.filter_type] = f.filter_type;
    data[m.cutoff] = f.cutoff;
    data[m.res] = f.res;
    data[m.drive] = f.drive;
    data[m.drive_curve] = f.drive_curve;
    data[m.env_amt] = f.env_amt;
    data[m.env_vel] = f.env_vel;
    data[m.keytrack] = f.keytrack;
    data[m.mod_source] = f.mod_source;
    data[m.mod_amount] = f.mod_amount;
    data[m.fm_source] = f.fm_source;
    data[m.fm_amount] = f.fm_amount;
    data[m.pan] = f.pan;
    data[m.pan_source] = f.pan_source;
    data[m.pan_amount] = f.pan_amount;
}

fn decode_envelope(data: &[u8; SDATA_LEN], m: &EnvelopeOffsets) -> Envelope {
    Envelope {
        mode: data[m.mode],
        attack: data[m.attack],
        attack_level: data[m.attack_level],
        decay: data[m.decay],
        sustain: data[m.sustain],
        decay2: data[m.decay2],
        sustain2: data[m.sustain2],
        release: data[m.release],
    }
}

fn encode_envelope(data: &mut [u8; SDATA_LEN], m: &EnvelopeOffsets, env: &Envelope) {
    data[m.mode] = env.mode;
    data[m.attack] = env.attack;
    data[m.attack_level] = env.attack_level;
    data[m.decay] = env.decay;
    data[m.sustain] = env.sustain;
    data[m.decay2] = env.decay2;
    data[m.sustain2] = env.sustain2;
    data[m.release] = env.release;
}

fn decode_lfo(data: &[u8; SDATA_LEN], m: &LfoOffsets) -> Lfo {
    Lfo {
        shape: data[m.shape],
        speed: data[m.speed],
        sync: data[m.sync],
        clocked: data[m.clocked],
        start_phase: data[m.start_phase],
        delay: data[m.delay],
        fade: data[m.fade],
        keytrack: data[m.keytrack],
    }
}

fn encode_lfo(data: &mut [u8; SDATA_LEN], m: &LfoOffsets, lfo: &Lfo) {
    data[m.shape] = lfo.shape;
    data[m.speed] = lfo.speed;
    data[m.sync] = lfo.sync;
    data[m.clocked] = lfo.clocked;
    data[m.start_phase] = lfo.start_phase;
    data[m.delay] = lfo.delay;
    data[m.fade] = lfo.fade;
    data[m.keytrack] = lfo.keytrack;
}

fn decode_effect(data: &[u8; SDATA_LEN], m: &EffectOffsets) -> Effect {
    let mut params = [0u8; EFFECT_PARAM_COUNT];
    params.copy_from_slice(&data[m.params_start..m.params_start + EFFECT_PARAM_COUNT]);
    Effect {
        effect_type: data[m.effect_type],
        mix: data[m.mix],
        params,
    }
}

fn encode_effect(data: &mut [u8; SDATA_LEN], m: &EffectOffsets, fx: &Effect) {
    data[m.effect_type] = fx.effect_type;
    data[m.mix] = fx.mix;
    data[m.params_start..m.params_start + EFFECT_PARAM_COUNT].copy_from_slice(&fx.params);
}
