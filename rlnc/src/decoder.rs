//! Linear block decoder — on-the-fly Gaussian elimination in echelon form
//! (spec §4.F, "the hard part").
//!
//! Two disciplines share one forward-elimination core (§4.F.2): immediate
//! mode folds each newly-installed pivot back into every other pivoted row
//! right away (§4.F.3, keeping invariant 2 continuously), delayed mode
//! defers that work to a single backward pass performed once full rank is
//! reached (§4.F.3 delayed / `finalize`), trading continuous reduced
//! row-echelon form for less fill-in on sparse input (the same trade this
//! crate's `min-labs-m13` pack reference makes in its own
//! `RlncDecoder::absorb`/`decode` split).

use std::marker::PhantomData;

use log::{debug, trace};
use rlnc_error::{Error, Result};

use crate::coefficient_storage::CoefficientStorage;
use crate::field::Field;
use crate::generator::{self, Rng, Seed};
use crate::payload::{self, ParsedHeader};
use crate::symbol_storage::{Deep, SymbolStorage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Immediate,
    Delayed,
}

/// Tri-state pivot status (spec §4.F.4). Advisory only — it never feeds
/// back into decoding correctness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PivotStatus {
    Missing,
    Seen,
    Decoded,
}

pub struct Decoder<F: Field, St: SymbolStorage = Deep> {
    k: usize,
    s: usize,
    coeffs: CoefficientStorage,
    data: St,
    pivot: Vec<bool>,
    mode: Mode,
    finalized: bool,
    rank: usize,
    seed_density: Option<f64>,
    // Scratch space allocated once at construction and reused on every
    // `decode`/`decode_symbol` call, per the "no hidden allocations during
    // encode/decode" resource policy (spec §5).
    scratch_coeff: Vec<u8>,
    scratch_symbol: Vec<u8>,
    scratch_row: Vec<u8>,
    scratch_data: Vec<u8>,
    _field: PhantomData<F>,
}

impl<F: Field> Decoder<F, Deep> {
    pub fn new(k: usize, s: usize, mode: Mode) -> Result<Self> {
        Self::with_storage(k, s, mode, Deep::new(k, s))
    }
}

impl<F: Field, St: SymbolStorage> Decoder<F, St> {
    pub fn with_storage(k: usize, s: usize, mode: Mode, storage: St) -> Result<Self> {
        if k == 0 {
            return Err(Error::config("K must be non-zero"));
        }
        if s == 0 {
            return Err(Error::config("S must be non-zero"));
        }
        let row_bytes = F::packed_len(k);
        Ok(Self {
            k,
            s,
            coeffs: CoefficientStorage::new(k, row_bytes),
            data: storage,
            pivot: vec![false; k],
            mode,
            finalized: false,
            rank: 0,
            seed_density: None,
            scratch_coeff: vec![0u8; row_bytes],
            scratch_symbol: vec![0u8; s],
            scratch_row: vec![0u8; row_bytes],
            scratch_data: vec![0u8; s],
            _field: PhantomData,
        })
    }

    /// Configures the density used to regenerate a coefficient vector from
    /// a seeded packet (spec §4.D); `None` means dense uniform. Must match
    /// whatever the sender's encoder used — this is part of the
    /// out-of-band `(field, K)` agreement in spec §6, extended to cover
    /// seeded mode.
    pub fn set_seed_density(&mut self, density: Option<f64>) {
        self.seed_density = density;
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

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_complete(&self) -> bool {
        self.rank == self.k && (self.finalized || self.mode == Mode::Immediate)
    }

    /// Resets pivots and status without reallocating (spec §3 Lifecycle).
    pub fn initialize(&mut self) {
        self.coeffs.reset();
        for p in self.pivot.iter_mut() {
            *p = false;
        }
        self.rank = 0;
        self.finalized = false;
    }

    /// Parses and ingests one wire packet (spec §4.F.1). Returns `true` if
    /// the packet was innovative (installed a new pivot), `false` if it
    /// was linearly dependent and silently discarded.
    pub fn decode(&mut self, packet: &[u8]) -> Result<bool> {
        let row_bytes = self.coeffs.row_bytes();
        let parsed = payload::parse(packet, self.k, row_bytes, self.s)?;
        match parsed {
            ParsedHeader::Systematic { index, symbol } => {
                for b in self.scratch_coeff.iter_mut() {
                    *b = 0;
                }
                F::set(&mut self.scratch_coeff, index as usize, F::ONE);
                self.scratch_symbol.copy_from_slice(symbol);
            }
            ParsedHeader::Seeded { seed, symbol } => {
                self.regenerate_from_seed(seed);
                self.scratch_symbol.copy_from_slice(symbol);
            }
            ParsedHeader::Literal { coefficients, symbol } => {
                self.scratch_coeff.copy_from_slice(coefficients);
                self.scratch_symbol.copy_from_slice(symbol);
            }
        }
        self.forward_eliminate()
    }

    fn regenerate_from_seed(&mut self, seed: Seed) {
        let mut rng = Rng::from_seed(seed);
        match self.seed_density {
            None => generator::fill_dense::<F>(&mut self.scratch_coeff, self.k, &mut rng),
            Some(d) => generator::fill_sparse::<F>(&mut self.scratch_coeff, self.k, d, &mut rng),
        }
    }

    /// Pre-parsed ingest entry point (spec §4.F.1), used by the recoder and
    /// by tests that want to bypass wire framing.
    pub fn decode_symbol(&mut self, symbol: &[u8], coefficients: &[u8]) -> Result<bool> {
        if coefficients.len() != self.coeffs.row_bytes() {
            return Err(Error::protocol("coefficient vector length mismatch"));
        }
        if symbol.len() != self.s {
            return Err(Error::protocol("symbol length mismatch"));
        }
        self.scratch_coeff.copy_from_slice(coefficients);
        self.scratch_symbol.copy_from_slice(symbol);
        self.forward_eliminate()
    }

    fn leading_pivot(&self) -> Option<usize> {
        (0..self.k).find(|&i| !F::is_zero(F::get(&self.scratch_coeff, i)))
    }

    /// Forward elimination (spec §4.F.2). Column ordering tie-break: always
    /// takes the lowest non-zero column index as the candidate pivot, so
    /// two decoders fed the same packet sequence reach the same pivot
    /// assignment (Testable Property 7).
    fn forward_eliminate(&mut self) -> Result<bool> {
        loop {
            let k0 = match self.leading_pivot() {
                Some(i) => i,
                None => {
                    trace!("discarding zero / linearly dependent packet");
                    return Ok(false);
                }
            };
            if self.pivot[k0] {
                let factor = F::get(&self.scratch_coeff, k0);
                // M[k0] is already normalized (M[k0,k0] == ONE) at install
                // time, so dividing by it is a no-op.
                self.scratch_row.copy_from_slice(self.coeffs.vector(k0));
                self.scratch_data.copy_from_slice(self.data.symbol(k0));
                F::fma(&mut self.scratch_coeff, &self.scratch_row, factor, self.k);
                F::fma_symbol(&mut self.scratch_symbol, &self.scratch_data, factor);
                continue;
            }

            let pivot_val = F::get(&self.scratch_coeff, k0);
            let inv = F::invert(pivot_val)?;
            F::scale(&mut self.scratch_coeff, inv, self.k);
            F::scale_symbol(&mut self.scratch_symbol, inv);
            self.coeffs.vector_mut(k0).copy_from_slice(&self.scratch_coeff);
            self.data.symbol_mut(k0).copy_from_slice(&self.scratch_symbol);
            self.pivot[k0] = true;
            self.rank += 1;
            debug!("installed pivot at column {} (rank now {} of {})", k0, self.rank, self.k);

            match self.mode {
                Mode::Immediate => self.back_substitute_column(k0),
                Mode::Delayed => {
                    if self.rank == self.k {
                        self.finalize()?;
                    }
                }
            }
            return Ok(true);
        }
    }

    /// Immediate-mode back-substitution (spec §4.F.3), preserving invariant
    /// 2 continuously. Forward elimination (§4.F.2) only reduces a row
    /// against the *leading* pivoted column it finds on the way up, so the
    /// row just installed at `k0` may still carry non-zero entries at
    /// other, higher-indexed columns that are already pivoted (those
    /// columns were never the leading one, so the loop never touched
    /// them). Two passes are needed, in order:
    ///
    /// 1. Clean the new row against every other already-pivoted column:
    ///    those rows are themselves unit vectors under invariant 2 (by
    ///    induction), so this only zeroes one entry and folds its symbol
    ///    contribution in.
    /// 2. Fold the now-clean new row into every other pivoted row that
    ///    still has a non-zero entry in column `k0`.
    fn back_substitute_column(&mut self, k0: usize) {
        for j in 0..self.k {
            if j == k0 || !self.pivot[j] {
                continue;
            }
            let factor = F::get(self.coeffs.vector(k0), j);
            if F::is_zero(factor) {
                continue;
            }
            self.scratch_row.copy_from_slice(self.coeffs.vector(j));
            self.scratch_data.copy_from_slice(self.data.symbol(j));
            F::fma(self.coeffs.vector_mut(k0), &self.scratch_row, factor, self.k);
            F::fma_symbol(self.data.symbol_mut(k0), &self.scratch_data, factor);
        }

        self.scratch_row.copy_from_slice(self.coeffs.vector(k0));
        self.scratch_data.copy_from_slice(self.data.symbol(k0));
        for j in 0..self.k {
            if j == k0 || !self.pivot[j] {
                continue;
            }
            let factor = F::get(self.coeffs.vector(j), k0);
            if F::is_zero(factor) {
                continue;
            }
            F::fma(self.coeffs.vector_mut(j), &self.scratch_row, factor, self.k);
            F::fma_symbol(self.data.symbol_mut(j), &self.scratch_data, factor);
        }
    }

    /// Delayed-mode back-substitution (spec §4.F.3): a single pass from
    /// column K-1 down to 0, performed once on the rank → K transition (or
    /// explicitly here). Idempotent once `finalized`.
    pub fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Ok(());
        }
        if self.mode == Mode::Immediate {
            self.finalized = true;
            return Ok(());
        }
        for i in (0..self.k).rev() {
            if !self.pivot[i] {
                continue;
            }
            self.scratch_row.copy_from_slice(self.coeffs.vector(i));
            self.scratch_data.copy_from_slice(self.data.symbol(i));
            for j in 0..i {
                if !self.pivot[j] {
                    continue;
                }
                let factor = F::get(self.coeffs.vector(j), i);
                if F::is_zero(factor) {
                    continue;
                }
                F::fma(self.coeffs.vector_mut(j), &self.scratch_row, factor, self.k);
                F::fma_symbol(self.data.symbol_mut(j), &self.scratch_data, factor);
            }
        }
        self.finalized = true;
        debug!("decoder finalized after delayed back-substitution");
        Ok(())
    }

    pub fn pivot_status(&self, column: usize) -> PivotStatus {
        if !self.pivot[column] {
            return PivotStatus::Missing;
        }
        let row = self.coeffs.vector(column);
        let is_unit = (0..self.k).all(|j| {
            let v = F::get(row, j);
            if j == column {
                v == F::ONE
            } else {
                F::is_zero(v)
            }
        });
        if is_unit {
            PivotStatus::Decoded
        } else {
            PivotStatus::Seen
        }
    }

    /// Serializes the pivot-status bitmap of spec §4.F.4: one bit per
    /// column, MSB-first, set iff that column's status is `Decoded`.
    pub fn write_pivot_status(&self, out: &mut [u8]) -> Result<()> {
        let needed = (self.k + 7) / 8;
        if out.len() < needed {
            return Err(Error::protocol("pivot status buffer too small"));
        }
        for b in out[..needed].iter_mut() {
            *b = 0;
        }
        for col in 0..self.k {
            if self.pivot_status(col) == PivotStatus::Decoded {
                out[col / 8] |= 1 << (7 - (col % 8));
            }
        }
        Ok(())
    }

    pub fn copy_symbols(&self, out: &mut [u8]) -> Result<()> {
        if !self.is_complete() {
            return Err(Error::NotReady { rank: self.rank, k: self.k });
        }
        if out.len() != self.block_size() {
            return Err(Error::config("output buffer does not match block size"));
        }
        for i in 0..self.k {
            out[i * self.s..(i + 1) * self.s].copy_from_slice(self.data.symbol(i));
        }
        Ok(())
    }

    pub(crate) fn coefficients(&self) -> &CoefficientStorage {
        &self.coeffs
    }

    pub(crate) fn data_storage(&self) -> &St {
        &self.data
    }

    pub(crate) fn pivots(&self) -> &[bool] {
        &self.pivot
    }
}
