//! Payload framing — packs a coefficient vector (or a systematic index, or
//! a coefficient seed) and a symbol into one wire packet (spec §4.H).
//!
//! Parsing borrows directly out of the input packet rather than
//! allocating a fresh `Vec`, matching the "no hidden allocations during
//! encode/decode" resource policy in spec §5 — all per-call scratch space
//! comes from buffers the factory already owns.

use crate::generator::{Seed, SEED_BYTES};
use rlnc_error::{Error, Result};

const FLAG_SYSTEMATIC: u8 = 0b01;
const FLAG_SEEDED: u8 = 0b10;
const SYSTEMATIC_INDEX_BYTES: usize = 4;

/// How the encoder is currently configured to write the header body; also
/// what `parse` hands back after reading one.
pub enum HeaderMode {
    /// Source symbol `index`, sent verbatim.
    Systematic { index: u32 },
    /// A coded symbol whose coefficient vector was regenerated from `seed`.
    Seeded { seed: Seed },
    /// A coded symbol whose coefficient vector is carried literally.
    Literal,
}

pub fn header_body_len(mode: &HeaderMode, coeff_row_bytes: usize) -> usize {
    match mode {
        HeaderMode::Systematic { .. } => SYSTEMATIC_INDEX_BYTES,
        HeaderMode::Seeded { .. } => SEED_BYTES,
        HeaderMode::Literal => coeff_row_bytes,
    }
}

pub fn payload_size(mode: &HeaderMode, coeff_row_bytes: usize, symbol_size: usize) -> usize {
    1 + header_body_len(mode, coeff_row_bytes) + symbol_size
}

/// Writes flags + header body into `out`, returning the number of bytes
/// written (not including the symbol, which the caller appends after).
/// `literal_coeffs` is consulted only for `HeaderMode::Literal`.
pub fn write_header(out: &mut [u8], mode: &HeaderMode, literal_coeffs: Option<&[u8]>) -> Result<usize> {
    let mut flags = 0u8;
    match mode {
        HeaderMode::Systematic { .. } => flags |= FLAG_SYSTEMATIC,
        HeaderMode::Seeded { .. } => flags |= FLAG_SEEDED,
        HeaderMode::Literal => {}
    }
    if out.is_empty() {
        return Err(Error::protocol("output buffer too small for packet flags"));
    }
    out[0] = flags;
    let body_len = header_body_len(mode, literal_coeffs.map(|c| c.len()).unwrap_or(0));
    if out.len() < 1 + body_len {
        return Err(Error::protocol("output buffer too small for packet header"));
    }
    match mode {
        HeaderMode::Systematic { index } => {
            out[1..1 + SYSTEMATIC_INDEX_BYTES].copy_from_slice(&index.to_be_bytes());
        }
        HeaderMode::Seeded { seed } => {
            out[1..1 + SEED_BYTES].copy_from_slice(&seed.to_be_bytes());
        }
        HeaderMode::Literal => {
            let coeffs = literal_coeffs
                .ok_or_else(|| Error::protocol("literal header mode requires a coefficient vector"))?;
            out[1..1 + coeffs.len()].copy_from_slice(coeffs);
        }
    }
    Ok(1 + body_len)
}

/// A parsed header, borrowing the coefficient vector (for `Literal`) or
/// the symbol bytes directly out of `packet`.
pub enum ParsedHeader<'a> {
    Systematic { index: u32, symbol: &'a [u8] },
    Seeded { seed: Seed, symbol: &'a [u8] },
    Literal { coefficients: &'a [u8], symbol: &'a [u8] },
}

/// Parses one wire packet. `coeff_row_bytes` and `symbol_size` must be
/// agreed out-of-band per spec §6; a length mismatch against them is a
/// `ProtocolError`, not a panic.
pub fn parse(packet: &[u8], k: usize, coeff_row_bytes: usize, symbol_size: usize) -> Result<ParsedHeader<'_>> {
    if packet.is_empty() {
        return Err(Error::protocol("empty packet"));
    }
    let flags = packet[0];
    let systematic = flags & FLAG_SYSTEMATIC != 0;
    let seeded = flags & FLAG_SEEDED != 0;
    if systematic && seeded {
        return Err(Error::protocol("packet sets both systematic and seeded flags"));
    }
    let rest = &packet[1..];
    if systematic {
        if rest.len() < SYSTEMATIC_INDEX_BYTES + symbol_size {
            return Err(Error::protocol("systematic packet truncated"));
        }
        let index = u32::from_be_bytes(rest[..SYSTEMATIC_INDEX_BYTES].try_into().unwrap());
        if index as usize >= k {
            return Err(Error::protocol(format!("systematic index {} out of range (K={})", index, k)));
        }
        let symbol = &rest[SYSTEMATIC_INDEX_BYTES..SYSTEMATIC_INDEX_BYTES + symbol_size];
        Ok(ParsedHeader::Systematic { index, symbol })
    } else if seeded {
        if rest.len() < SEED_BYTES + symbol_size {
            return Err(Error::protocol("seeded packet truncated"));
        }
        let seed = Seed::from_be_bytes(rest[..SEED_BYTES].try_into().unwrap());
        let symbol = &rest[SEED_BYTES..SEED_BYTES + symbol_size];
        Ok(ParsedHeader::Seeded { seed, symbol })
    } else {
        if rest.len() < coeff_row_bytes + symbol_size {
            return Err(Error::protocol("coded packet truncated or coefficient-vector length mismatch"));
        }
        let coefficients = &rest[..coeff_row_bytes];
        let symbol = &rest[coeff_row_bytes..coeff_row_bytes + symbol_size];
        Ok(ParsedHeader::Literal { coefficients, symbol })
    }
}
