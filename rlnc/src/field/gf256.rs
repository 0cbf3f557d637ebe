use super::{Field, FieldId};

/// GF(2^8) with the Rijndael/RLNC-standard primitive polynomial `0x11D`
/// (x^8 + x^4 + x^3 + x^2 + 1). Fixed and documented per spec §9 open
/// question 2: this is observable on the wire whenever a literal
/// coefficient vector or a coded symbol crosses a process boundary, so it
/// cannot be an implementation detail that varies by build.
pub struct Gf256;

const PRIMITIVE_POLY: u16 = 0x11D;

const fn build_tables() -> ([u8; 256], [u8; 256]) {
    let mut exp = [0u8; 256];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0usize;
    while i < 255 {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLY;
        }
        i += 1;
    }
    exp[255] = exp[0];
    (exp, log)
}

const TABLES: ([u8; 256], [u8; 256]) = build_tables();
const EXP: [u8; 256] = TABLES.0;
const LOG: [u8; 256] = TABLES.1;

#[inline]
fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let sum = LOG[a as usize] as u16 + LOG[b as usize] as u16;
    EXP[(sum % 255) as usize]
}

fn scale_scalar(dst: &mut [u8], a: u8, n: usize) {
    for b in dst.iter_mut().take(n) {
        *b = mul(*b, a);
    }
}

fn fma_scalar(dst: &mut [u8], src: &[u8], a: u8, n: usize) {
    for (d, s) in dst.iter_mut().zip(src.iter()).take(n) {
        *d ^= mul(*s, a);
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
unsafe fn fma_avx2(dst: &mut [u8], src: &[u8], a: u8, n: usize) {
    // The GF(256) multiply itself stays table-driven; AVX2 only widens the
    // XOR-accumulate step, mirroring the teacher's `multiply_vector_scalar_avx2`
    // which loads/stores 32-byte lanes around a scalar multiply core.
    use std::arch::x86_64::*;
    let mut i = 0;
    while i + 32 <= n {
        let mut buf = [0u8; 32];
        for j in 0..32 {
            buf[j] = mul(src[i + j], a);
        }
        let incoming = _mm256_loadu_si256(buf.as_ptr() as *const __m256i);
        let current = _mm256_loadu_si256(dst.as_ptr().add(i) as *const __m256i);
        let combined = _mm256_xor_si256(current, incoming);
        _mm256_storeu_si256(dst.as_mut_ptr().add(i) as *mut __m256i, combined);
        i += 32;
    }
    for j in i..n {
        dst[j] ^= mul(src[j], a);
    }
}

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
unsafe fn fma_neon(dst: &mut [u8], src: &[u8], a: u8, n: usize) {
    use std::arch::aarch64::*;
    let mut i = 0;
    while i + 16 <= n {
        let mut buf = [0u8; 16];
        for j in 0..16 {
            buf[j] = mul(src[i + j], a);
        }
        let incoming = vld1q_u8(buf.as_ptr());
        let current = vld1q_u8(dst.as_ptr().add(i));
        let combined = veorq_u8(current, incoming);
        vst1q_u8(dst.as_mut_ptr().add(i), combined);
        i += 16;
    }
    for j in i..n {
        dst[j] ^= mul(src[j], a);
    }
}

impl Field for Gf256 {
    const ID: FieldId = FieldId::Gf256;
    const ONE: u8 = 1;
    const ZERO: u8 = 0;

    fn packed_len(n: usize) -> usize {
        n
    }

    fn get(buf: &[u8], i: usize) -> u8 {
        buf[i]
    }

    fn set(buf: &mut [u8], i: usize, value: u8) {
        buf[i] = value;
    }

    fn add(dst: &mut [u8], src: &[u8], n: usize) {
        for i in 0..n {
            dst[i] ^= src[i];
        }
    }

    fn scale(dst: &mut [u8], a: u8, n: usize) {
        if a == 0 {
            for b in dst.iter_mut().take(n) {
                *b = 0;
            }
            return;
        }
        if a == 1 {
            return;
        }
        scale_scalar(dst, a, n);
    }

    fn fma(dst: &mut [u8], src: &[u8], a: u8, n: usize) {
        if a == 0 {
            return;
        }
        if a == 1 {
            Self::add(dst, src, n);
            return;
        }
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            if is_x86_feature_detected!("avx2") {
                unsafe { fma_avx2(dst, src, a, n) };
                return;
            }
        }
        #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
        {
            unsafe { fma_neon(dst, src, a, n) };
            return;
        }
        fma_scalar(dst, src, a, n);
    }

    fn scale_symbol(dst: &mut [u8], a: u8) {
        let n = dst.len();
        Self::scale(dst, a, n);
    }

    fn fma_symbol(dst: &mut [u8], src: &[u8], a: u8) {
        let n = dst.len().min(src.len());
        Self::fma(dst, src, a, n);
    }

    fn invert(a: u8) -> rlnc_error::Result<u8> {
        if a == 0 {
            return Err(rlnc_error::Error::field("GF(256): zero has no multiplicative inverse"));
        }
        Ok(EXP[(255 - LOG[a as usize] as u16) as usize])
    }

    fn is_zero(a: u8) -> bool {
        a == 0
    }
}
