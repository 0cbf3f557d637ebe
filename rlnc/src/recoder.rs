//! Recoder — produces new coded packets from a partially- or
//! fully-decoded state without first reconstructing the source block
//! (spec §4.G).
//!
//! A recoded packet is a random linear combination of the rows the
//! underlying decoder currently has pivoted, re-expressed as a length-`K`
//! coefficient vector over the *original* source symbols (row `r`'s own
//! coefficient vector already carries that expansion, since it was
//! installed by forward elimination). That combined vector isn't itself a
//! fresh dense/sparse draw over all `K` columns — it's a specific derived
//! vector — so unlike [`crate::encoder::Encoder`] a recoder always carries
//! it as a literal coefficient vector on the wire; there is no seed short
//! enough to reproduce it. A recoder never sets the systematic flag
//! (spec §9 open question 3: recoded output is never "the original
//! symbol, unchanged").

use rlnc_error::{Error, Result};

use crate::decoder::Decoder;
use crate::field::Field;
use crate::generator::{self, Rng};
use crate::payload::{self, HeaderMode};
use crate::symbol_storage::SymbolStorage;

pub struct Recoder<'d, F: Field, St: SymbolStorage> {
    decoder: &'d Decoder<F, St>,
    k: usize,
    s: usize,
    coeff_row_bytes: usize,
    density: Option<f64>,
    rng: Rng,
    weight_buf: Vec<u8>,
    scratch_coeff: Vec<u8>,
    scratch_symbol: Vec<u8>,
}

impl<'d, F: Field, St: SymbolStorage> Recoder<'d, F, St> {
    /// `density` controls the draw over currently-pivoted rows (`None` =
    /// dense). Seeded from process entropy; a recoder has no notion of a
    /// wire-visible seed of its own, only the encoder does.
    pub fn new(decoder: &'d Decoder<F, St>, density: Option<f64>) -> Self {
        let k = decoder.k();
        let s = decoder.symbol_size();
        let coeff_row_bytes = decoder.coefficients().row_bytes();
        Self {
            decoder,
            k,
            s,
            coeff_row_bytes,
            density,
            rng: Rng::from_seed64(crate::entropy::seed()),
            weight_buf: vec![0u8; F::packed_len(k)],
            scratch_coeff: vec![0u8; coeff_row_bytes],
            scratch_symbol: vec![0u8; s],
        }
    }

    pub fn rank(&self) -> usize {
        self.decoder.rank()
    }

    pub fn payload_size(&self) -> usize {
        payload::payload_size(&HeaderMode::Literal, self.coeff_row_bytes, self.s)
    }

    /// Writes one recoded packet into `out`. Returns `Ok(0)` (no packet
    /// written) if the decoder has not pivoted any row yet — there is
    /// nothing to recode from.
    pub fn recode(&mut self, out: &mut [u8]) -> Result<usize> {
        let pivots = self.decoder.pivots();
        let rank = self.decoder.rank();
        if rank == 0 {
            return Ok(0);
        }

        let weight_len = F::packed_len(rank);
        match self.density {
            None => generator::fill_dense::<F>(&mut self.weight_buf[..weight_len], rank, &mut self.rng),
            Some(d) => generator::fill_sparse::<F>(&mut self.weight_buf[..weight_len], rank, d, &mut self.rng),
        }

        for b in self.scratch_coeff.iter_mut() {
            *b = 0;
        }
        for b in self.scratch_symbol.iter_mut() {
            *b = 0;
        }

        let mut weight_index = 0usize;
        for row in 0..self.k {
            if !pivots[row] {
                continue;
            }
            let weight = F::get(&self.weight_buf, weight_index);
            weight_index += 1;
            if F::is_zero(weight) {
                continue;
            }
            F::fma(&mut self.scratch_coeff, self.decoder.coefficients().vector(row), weight, self.k);
            F::fma_symbol(&mut self.scratch_symbol, self.decoder.data_storage().symbol(row), weight);
        }

        let header_len = payload::write_header(out, &HeaderMode::Literal, Some(&self.scratch_coeff))?;
        if out.len() < header_len + self.s {
            return Err(Error::protocol("output buffer too small for symbol"));
        }
        out[header_len..header_len + self.s].copy_from_slice(&self.scratch_symbol);
        Ok(header_len + self.s)
    }
}
