//! Oscillator randomization
//!
//! The generator is supplied by the caller, so results are reproducible with
//! a seeded RNG and no state is shared between calls.

use rand::Rng;

use crate::field_map::OSCILLATORS;
use crate::patch::Patch;

/// Oscillator shapes eligible for randomization (pulse through sine);
/// wavetables and user samples are excluded.
const RANDOM_SHAPES: u8 = 5;

/// Randomize every oscillator parameter, leaving the rest of the patch alone
///
/// Fields with no SDATA slot for a given oscillator keep their current value.
pub fn randomize_oscillators<R: Rng + ?Sized>(patch: &mut Patch, rng: &mut R) {
    for (osc, m) in patch.oscillators.iter_mut().zip(OSCILLATORS.iter()) {
        osc.shape = rng.gen_range(0..RANDOM_SHAPES);
        osc.pitch = random_value(rng);
        osc.detune = random_value(rng);
        osc.pw = random_value(rng);
        osc.pwm = random_value(rng);
        osc.fm = random_value(rng);
        osc.fm_source = random_value(rng);

        for (field, offset) in [
            (&mut osc.octave, m.octave),
            (&mut osc.bend_range, m.bend_range),
            (&mut osc.keytrack, m.keytrack),
            (&mut osc.pwm_source, m.pwm_source),
            (&mut osc.limit_wt, m.limit_wt),
            (&mut osc.brilliance, m.brilliance),
        ] {
            if offset.is_some() {
                *field = random_value(rng);
            }
        }
    }
}

fn random_value<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(0..128)
}
