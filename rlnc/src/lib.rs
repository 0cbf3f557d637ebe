//! Random Linear Network Coding engine: a finite-field arithmetic kernel,
//! a systematic + coded block encoder, a Gaussian-elimination decoder, a
//! recoder that works from partial decoding state, and the wire payload
//! framing that ties them together.
//!
//! `K` source symbols of `S` bytes each are combined into coded symbols
//! over a finite field (`field::Binary` or `field::Gf256`); any `K`
//! linearly independent coded symbols are enough to recover the original
//! block. See [`factory::Factory`] for the usual entry point: it validates
//! `(K, S)` against fixed upper bounds and hands out matched
//! encoder/decoder pairs.

pub mod coefficient_storage;
pub mod decoder;
pub mod encoder;
pub(crate) mod entropy;
pub mod factory;
pub mod field;
pub mod generator;
pub mod payload;
pub mod recoder;
pub mod symbol_storage;

pub use decoder::{Decoder, Mode as DecoderMode, PivotStatus};
pub use encoder::{CodingMode, Encoder};
pub use factory::Factory;
pub use field::{Binary, Field, FieldId, Gf256};
pub use generator::{Rng, Seed, SEED_BYTES};
pub use payload::{HeaderMode, ParsedHeader};
pub use recoder::Recoder;
pub use rlnc_error::{Error, Result};
pub use symbol_storage::{Deep, ShallowImmutable, ShallowMutable, SymbolStorage};
