//! Coefficient storage — owns the K coefficient-vector rows of the
//! decoding matrix `M` (spec §3, §4.C). Allocated once per coder and
//! reused across `initialize()` calls, per the Lifecycle rule in spec §3.

pub struct CoefficientStorage {
    k: usize,
    row_bytes: usize,
    rows: Vec<u8>,
}

impl CoefficientStorage {
    pub fn new(k: usize, row_bytes: usize) -> Self {
        Self { k, row_bytes, rows: vec![0u8; k * row_bytes] }
    }

    pub fn vector(&self, i: usize) -> &[u8] {
        &self.rows[i * self.row_bytes..(i + 1) * self.row_bytes]
    }

    pub fn vector_mut(&mut self, i: usize) -> &mut [u8] {
        &mut self.rows[i * self.row_bytes..(i + 1) * self.row_bytes]
    }

    pub fn vector_element_count(&self) -> usize {
        self.k
    }

    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    pub fn reset(&mut self) {
        for b in self.rows.iter_mut() {
            *b = 0;
        }
    }
}
