//! Process-entropy seed source for the encoder's and recoder's own
//! randomness. Never used on the receiving side — a decoder always
//! regenerates a seeded coefficient vector from the seed carried on the
//! wire, never from this.

pub(crate) fn seed() -> u64 {
    rand::random()
}
