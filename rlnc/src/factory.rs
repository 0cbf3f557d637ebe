//! Factory — validates `(K, S)` against fixed upper bounds and hands out
//! encoders/decoders sized to the current values (spec §3 Lifecycle, §6
//! `ConfigError`).
//!
//! The teacher's `FECModule` carries an algorithm selector alongside its
//! field/size bounds because it multiplexes several FEC schemes
//! (`StripeXor`, `Cm256Scheme`, `RlncScheme`, `RsScheme`); this crate
//! implements exactly one coding algorithm, so that axis collapses into
//! the `Field` type parameter — a `Factory<Binary>` and a
//! `Factory<Gf256>` are the two "algorithms" a caller can choose between.

use std::marker::PhantomData;

use rlnc_error::{Error, Result};

use crate::decoder::{Decoder, Mode as DecoderMode};
use crate::encoder::{CodingMode, Encoder};
use crate::field::Field;
use crate::symbol_storage::ShallowImmutable;

pub struct Factory<F: Field> {
    k_max: usize,
    s_max: usize,
    k: usize,
    s: usize,
    _field: PhantomData<F>,
}

impl<F: Field> Factory<F> {
    pub fn new(k_max: usize, s_max: usize) -> Result<Self> {
        if k_max == 0 {
            return Err(Error::config("K_max must be non-zero"));
        }
        if s_max == 0 {
            return Err(Error::config("S_max must be non-zero"));
        }
        Ok(Self { k_max, s_max, k: k_max, s: s_max, _field: PhantomData })
    }

    pub fn set_symbols(&mut self, k: usize) -> Result<()> {
        if k == 0 || k > self.k_max {
            return Err(Error::config(format!("K={} out of range (1..={})", k, self.k_max)));
        }
        self.k = k;
        Ok(())
    }

    pub fn set_symbol_size(&mut self, s: usize) -> Result<()> {
        if s == 0 || s > self.s_max {
            return Err(Error::config(format!("S={} out of range (1..={})", s, self.s_max)));
        }
        self.s = s;
        Ok(())
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn symbol_size(&self) -> usize {
        self.s
    }

    pub fn k_max(&self) -> usize {
        self.k_max
    }

    pub fn symbol_size_max(&self) -> usize {
        self.s_max
    }

    pub fn new_decoder(&self, mode: DecoderMode) -> Result<Decoder<F>> {
        Decoder::new(self.k, self.s, mode)
    }

    /// Builds an encoder reading zero-copy out of `block`, which must be
    /// exactly `K * S` bytes (the currently configured block size).
    pub fn new_encoder<'a>(
        &self,
        block: &'a [u8],
        coding_mode: CodingMode,
    ) -> Result<Encoder<F, ShallowImmutable<'a>>> {
        Encoder::new(self.k, self.s, block, coding_mode)
    }
}
