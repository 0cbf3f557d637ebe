//! Linear block encoder — systematic phase followed by a coding phase
//! (spec §4.E).
//!
//! The systematic phase sends each source symbol once, uncoded, with a
//! plain index in place of a coefficient vector (spec §4.E.1); once that
//! cursor reaches `K` (or systematic mode is off), every subsequent call
//! produces a random linear combination of all `K` source symbols (spec
//! §4.E.2), using either a transmitted seed (regenerated with
//! [`crate::generator`]) or a literal coefficient vector, matching the two
//! [`crate::payload::HeaderMode`] wire shapes that aren't `Systematic`.

use std::marker::PhantomData;

use rlnc_error::{Error, Result};

use crate::field::Field;
use crate::generator::{self, Rng, Seed};
use crate::payload::{self, HeaderMode};
use crate::symbol_storage::{ShallowImmutable, SymbolStorage};

/// How the coding-phase coefficient vector is carried on the wire.
/// `density` is `None` for a dense draw, `Some(d)` for a sparse draw with
/// per-position non-zero probability `d` (spec §4.D.2).
#[derive(Clone, Copy, Debug)]
pub enum CodingMode {
    Seeded { density: Option<f64> },
    Literal { density: Option<f64> },
}

pub struct Encoder<F: Field, St: SymbolStorage> {
    k: usize,
    s: usize,
    coeff_row_bytes: usize,
    data: St,
    systematic: bool,
    systematic_cursor: usize,
    coding_mode: CodingMode,
    rng: Rng,
    scratch_coeff: Vec<u8>,
    scratch_symbol: Vec<u8>,
    _field: PhantomData<F>,
}

impl<'a, F: Field> Encoder<F, ShallowImmutable<'a>> {
    /// Convenience constructor over a caller-owned, unmodified source
    /// block — the common case, reading zero-copy out of caller memory.
    pub fn new(k: usize, s: usize, block: &'a [u8], coding_mode: CodingMode) -> Result<Self> {
        Self::with_storage(k, s, ShallowImmutable::new(k, s, block)?, coding_mode)
    }
}

impl<F: Field, St: SymbolStorage> Encoder<F, St> {
    pub fn with_storage(k: usize, s: usize, storage: St, coding_mode: CodingMode) -> Result<Self> {
        if k == 0 {
            return Err(Error::config("K must be non-zero"));
        }
        if s == 0 {
            return Err(Error::config("S must be non-zero"));
        }
        let coeff_row_bytes = F::packed_len(k);
        Ok(Self {
            k,
            s,
            coeff_row_bytes,
            data: storage,
            systematic: true,
            systematic_cursor: 0,
            coding_mode,
            rng: Rng::from_seed64(crate::entropy::seed()),
            scratch_coeff: vec![0u8; coeff_row_bytes],
            scratch_symbol: vec![0u8; s],
            _field: PhantomData,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn symbol_size(&self) -> usize {
        self.s
    }

    pub fn block_size(&self) -> usize {
        self.k * self.s
    }

    /// An encoder holds the complete source block from construction, so it
    /// is always at full rank (spec §4.E).
    pub fn rank(&self) -> usize {
        self.k
    }

    /// An encoder is complete the moment it is constructed — it never
    /// waits on external input the way a decoder does.
    pub fn is_complete(&self) -> bool {
        true
    }

    pub fn set_systematic(&mut self, on: bool) {
        self.systematic = on;
    }

    pub fn is_systematic(&self) -> bool {
        self.systematic
    }

    /// Whether the next call to [`Encoder::encode`] will emit an uncoded
    /// source symbol rather than a coded one.
    pub fn in_systematic_phase(&self) -> bool {
        self.systematic && self.systematic_cursor < self.k
    }

    pub fn systematic_remaining(&self) -> usize {
        self.k.saturating_sub(self.systematic_cursor)
    }

    /// Bytes the next [`Encoder::encode`] call will write, given the
    /// current phase.
    pub fn payload_size(&self) -> usize {
        if self.in_systematic_phase() {
            payload::payload_size(&HeaderMode::Systematic { index: 0 }, 0, self.s)
        } else {
            match self.coding_mode {
                CodingMode::Seeded { .. } => {
                    payload::payload_size(&HeaderMode::Seeded { seed: 0 }, 0, self.s)
                }
                CodingMode::Literal { .. } => {
                    payload::payload_size(&HeaderMode::Literal, self.coeff_row_bytes, self.s)
                }
            }
        }
    }

    /// Produces the next packet into `out`, returning the number of bytes
    /// written. Systematic symbols are drained first (index order), then
    /// every call produces a fresh random coded symbol — encoding never
    /// "runs out" (spec §4.E has no terminal state).
    pub fn encode(&mut self, out: &mut [u8]) -> Result<usize> {
        if self.in_systematic_phase() {
            return self.encode_systematic(out);
        }
        match self.coding_mode {
            CodingMode::Seeded { density } => self.encode_seeded(out, density),
            CodingMode::Literal { density } => self.encode_literal(out, density),
        }
    }

    fn encode_systematic(&mut self, out: &mut [u8]) -> Result<usize> {
        let index = self.systematic_cursor as u32;
        let mode = HeaderMode::Systematic { index };
        let header_len = payload::write_header(out, &mode, None)?;
        let symbol = self.data.symbol(index as usize);
        if out.len() < header_len + symbol.len() {
            return Err(Error::protocol("output buffer too small for symbol"));
        }
        out[header_len..header_len + symbol.len()].copy_from_slice(symbol);
        self.systematic_cursor += 1;
        Ok(header_len + symbol.len())
    }

    fn encode_seeded(&mut self, out: &mut [u8], density: Option<f64>) -> Result<usize> {
        let seed: Seed = crate::entropy::seed() as Seed;
        let mut rng = Rng::from_seed(seed);
        self.fill_coefficients(density, &mut rng);
        self.combine_into_scratch_symbol();
        let mode = HeaderMode::Seeded { seed };
        let header_len = payload::write_header(out, &mode, None)?;
        self.write_symbol(out, header_len)
    }

    fn encode_literal(&mut self, out: &mut [u8], density: Option<f64>) -> Result<usize> {
        let mut rng = std::mem::replace(&mut self.rng, Rng::from_seed64(0));
        self.fill_coefficients(density, &mut rng);
        self.rng = rng;
        self.combine_into_scratch_symbol();
        let mode = HeaderMode::Literal;
        let header_len = payload::write_header(out, &mode, Some(&self.scratch_coeff))?;
        self.write_symbol(out, header_len)
    }

    fn fill_coefficients(&mut self, density: Option<f64>, rng: &mut Rng) {
        match density {
            None => generator::fill_dense::<F>(&mut self.scratch_coeff, self.k, rng),
            Some(d) => generator::fill_sparse::<F>(&mut self.scratch_coeff, self.k, d, rng),
        }
    }

    fn combine_into_scratch_symbol(&mut self) {
        for b in self.scratch_symbol.iter_mut() {
            *b = 0;
        }
        for i in 0..self.k {
            let coeff = F::get(&self.scratch_coeff, i);
            if F::is_zero(coeff) {
                continue;
            }
            F::fma_symbol(&mut self.scratch_symbol, self.data.symbol(i), coeff);
        }
    }

    fn write_symbol(&self, out: &mut [u8], header_len: usize) -> Result<usize> {
        if out.len() < header_len + self.s {
            return Err(Error::protocol("output buffer too small for symbol"));
        }
        out[header_len..header_len + self.s].copy_from_slice(&self.scratch_symbol);
        Ok(header_len + self.s)
    }
}
