//! Symbol storage — owns or borrows the K symbols of a source block.
//!
//! Two variants share one interface: `Deep` owns a contiguous `K*S`
//! buffer (used by decoders assembling a block from scratch), `Shallow`
//! borrows caller-provided memory (immutable for encoders reading caller
//! input, mutable for decoders writing into caller-provided output).

use rlnc_error::{Error, Result};

pub trait SymbolStorage {
    /// Bind `K` symbols of `S` bytes each. Copies for `Deep`, retains the
    /// pointer for `Shallow`.
    fn set_symbols(&mut self, block: &[u8]) -> Result<()>;

    /// The `S`-byte slice for symbol `i`.
    fn symbol(&self, i: usize) -> &[u8];

    /// Mutable access to symbol `i`, used by the decoder to install a
    /// pivoted row's data and by back-substitution.
    fn symbol_mut(&mut self, i: usize) -> &mut [u8];

    fn symbol_count(&self) -> usize;
    fn symbol_size(&self) -> usize;

    fn block_size(&self) -> usize {
        self.symbol_count() * self.symbol_size()
    }
}

/// Owns a contiguous `K*S` buffer.
pub struct Deep {
    k: usize,
    s: usize,
    buf: Vec<u8>,
}

impl Deep {
    pub fn new(k: usize, s: usize) -> Self {
        Self { k, s, buf: vec![0u8; k * s] }
    }
}

impl SymbolStorage for Deep {
    fn set_symbols(&mut self, block: &[u8]) -> Result<()> {
        if block.len() != self.block_size() {
            return Err(Error::config(format!(
                "block length {} does not match K*S={}",
                block.len(),
                self.block_size()
            )));
        }
        self.buf.copy_from_slice(block);
        Ok(())
    }

    fn symbol(&self, i: usize) -> &[u8] {
        &self.buf[i * self.s..(i + 1) * self.s]
    }

    fn symbol_mut(&mut self, i: usize) -> &mut [u8] {
        &mut self.buf[i * self.s..(i + 1) * self.s]
    }

    fn symbol_count(&self) -> usize {
        self.k
    }

    fn symbol_size(&self) -> usize {
        self.s
    }
}

/// Borrows externally-provided, read-only memory for the K symbols. Used
/// by encoders reading from caller-supplied input.
pub struct ShallowImmutable<'a> {
    k: usize,
    s: usize,
    block: &'a [u8],
}

impl<'a> ShallowImmutable<'a> {
    pub fn new(k: usize, s: usize, block: &'a [u8]) -> Result<Self> {
        if block.len() != k * s {
            return Err(Error::config(format!(
                "block length {} does not match K*S={}",
                block.len(),
                k * s
            )));
        }
        Ok(Self { k, s, block })
    }
}

impl<'a> SymbolStorage for ShallowImmutable<'a> {
    fn set_symbols(&mut self, _block: &[u8]) -> Result<()> {
        Err(Error::config(
            "shallow immutable storage is bound at construction and cannot be rebound",
        ))
    }

    fn symbol(&self, i: usize) -> &[u8] {
        &self.block[i * self.s..(i + 1) * self.s]
    }

    fn symbol_mut(&mut self, _i: usize) -> &mut [u8] {
        unreachable!("ShallowImmutable never hands out mutable access")
    }

    fn symbol_count(&self) -> usize {
        self.k
    }

    fn symbol_size(&self) -> usize {
        self.s
    }
}

/// Borrows externally-provided, writable memory for the K symbols. Used
/// by decoders writing the decoded block directly into caller-provided
/// output.
pub struct ShallowMutable<'a> {
    k: usize,
    s: usize,
    block: &'a mut [u8],
}

impl<'a> ShallowMutable<'a> {
    pub fn new(k: usize, s: usize, block: &'a mut [u8]) -> Result<Self> {
        if block.len() != k * s {
            return Err(Error::config(format!(
                "block length {} does not match K*S={}",
                block.len(),
                k * s
            )));
        }
        Ok(Self { k, s, block })
    }
}

impl<'a> SymbolStorage for ShallowMutable<'a> {
    fn set_symbols(&mut self, block: &[u8]) -> Result<()> {
        if block.len() != self.block_size() {
            return Err(Error::config(format!(
                "block length {} does not match K*S={}",
                block.len(),
                self.block_size()
            )));
        }
        self.block.copy_from_slice(block);
        Ok(())
    }

    fn symbol(&self, i: usize) -> &[u8] {
        &self.block[i * self.s..(i + 1) * self.s]
    }

    fn symbol_mut(&mut self, i: usize) -> &mut [u8] {
        &mut self.block[i * self.s..(i + 1) * self.s]
    }

    fn symbol_count(&self) -> usize {
        self.k
    }

    fn symbol_size(&self) -> usize {
        self.s
    }
}
