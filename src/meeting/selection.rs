//! Default speaker selection when nobody in particular was addressed.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::persona::{Persona, Roster};

/// Upper bound on personas speaking in one unaddressed turn.
pub const MAX_SPEAKERS_PER_TURN: usize = 2;

/// Pick 1 or 2 distinct personas, uniformly, without replacement.
///
/// Returns an empty list for an empty roster. The order of the returned
/// personas is the order in which they will speak.
pub fn select_speakers<R: Rng + ?Sized>(roster: &Roster, rng: &mut R) -> Vec<Persona> {
    if roster.is_empty() {
        return Vec::new();
    }

    let upper = roster.len().min(MAX_SPEAKERS_PER_TURN);
    let count = rng.gen_range(1..=upper);

    roster
        .personas()
        .choose_multiple(rng, count)
        .cloned()
        .collect()
}
