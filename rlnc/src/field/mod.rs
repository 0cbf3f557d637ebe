//! Finite-field arithmetic kernel.
//!
//! Two field variants are supported, GF(2) and GF(2^8), each operating on
//! byte buffers that pack a vector of field elements. Every coder is
//! generic over a `Field` implementor; there is no third variant and no
//! plan to add one, so this is a plain trait rather than an enum dispatch
//! table.

mod binary;
mod gf256;

pub use binary::Binary;
pub use gf256::Gf256;

use serde::{Deserialize, Serialize};

/// Identifies a field variant on the wire. `(field, K)` must be agreed by
/// sender and receiver out-of-band (spec §6); this enum is what a host
/// application would serialize into its own config to do so.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldId {
    Binary,
    Gf256,
}

/// Primitive operations needed for linear algebra over packed symbol
/// buffers. All arithmetic is exact (no overflow, no rounding) because it
/// operates over a finite field.
pub trait Field {
    const ID: FieldId;

    /// Bytes needed to pack `n` field elements.
    fn packed_len(n: usize) -> usize;

    /// Read element `i` out of a packed buffer.
    fn get(buf: &[u8], i: usize) -> u8;

    /// Write element `i` into a packed buffer.
    fn set(buf: &mut [u8], i: usize, value: u8);

    /// `dst ^= src`, `n` elements wide (both fields are additive over GF(2)
    /// XOR, so this is shared regardless of element width).
    fn add(dst: &mut [u8], src: &[u8], n: usize);

    /// `dst = a * dst`, `n` elements wide.
    fn scale(dst: &mut [u8], a: u8, n: usize);

    /// `dst ^= a * src`, `n` elements wide. The fused form is what both the
    /// encoder's dense-combination loop and the decoder's row-reduction
    /// loop actually call; `add`/`scale` exist for the generator and for
    /// tests.
    fn fma(dst: &mut [u8], src: &[u8], a: u8, n: usize);

    /// Multiplicative inverse. Fails when `a == 0`; invertibility failures
    /// are an internal bug (corrupted pivot invariant), not an
    /// input-dependent condition.
    fn invert(a: u8) -> rlnc_error::Result<u8>;

    /// Scale a raw `S`-byte symbol buffer by a single field element `a`.
    ///
    /// Distinct from [`Field::scale`], which operates on an `n`-element
    /// *packed coefficient vector*: in GF(2) a coefficient vector packs 8
    /// elements per byte, but a symbol is never bit-packed — it is `S`
    /// opaque payload bytes scaled as a whole by one coefficient bit
    /// (identity if `a=1`, all-zero if `a=0`). In GF(2^8) element width and
    /// byte width coincide, so this and `scale` do the same work.
    fn scale_symbol(dst: &mut [u8], a: u8);

    /// `dst ^= a * src` over a raw symbol buffer; see [`Field::scale_symbol`].
    fn fma_symbol(dst: &mut [u8], src: &[u8], a: u8);

    /// Whether `a` is the field's multiplicative zero.
    fn is_zero(a: u8) -> bool;

    /// The field's multiplicative identity, as an element value (not a
    /// packed representation - useful for building unit vectors).
    const ONE: u8;
    const ZERO: u8;
}
