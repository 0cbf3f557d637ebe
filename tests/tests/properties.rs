//! Property-based tests over the public `rlnc` API: round-trip recovery,
//! rank monotonicity, immediate/delayed mode equivalence, and generator
//! determinism.

use proptest::prelude::*;
use rlnc::{CodingMode, DecoderMode, Factory, Gf256, Rng};

fn block_strategy(k: usize, s: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), k * s)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn dense_coding_always_recovers_the_original_block(
        k in 1usize..12,
        s in 1usize..32,
        seed in any::<u64>(),
    ) {
        let _ = logger::init();
        let block = {
            let mut rng = Rng::from_seed64(seed);
            let mut out = vec![0u8; k * s];
            for b in out.iter_mut() {
                *b = (rng.next_u64() & 0xFF) as u8;
            }
            out
        };

        let mut factory = Factory::<Gf256>::new(k, s).unwrap();
        factory.set_symbols(k).unwrap();
        factory.set_symbol_size(s).unwrap();
        let mut enc = factory.new_encoder(&block, CodingMode::Literal { density: None }).unwrap();
        enc.set_systematic(false);
        let mut dec = factory.new_decoder(DecoderMode::Immediate).unwrap();

        let mut sent = 0;
        while !dec.is_complete() && sent < k * 8 + 8 {
            let mut buf = vec![0u8; enc.payload_size()];
            enc.encode(&mut buf).unwrap();
            dec.decode(&buf).unwrap();
            sent += 1;
        }
        prop_assert!(dec.is_complete());
        let mut out = vec![0u8; k * s];
        dec.copy_symbols(&mut out).unwrap();
        prop_assert_eq!(out, block);
    }

    #[test]
    fn rank_never_decreases_and_duplicates_never_advance_it(
        k in 1usize..10,
        s in 1usize..8,
        seed in any::<u64>(),
    ) {
        let mut factory = Factory::<Gf256>::new(k, s).unwrap();
        factory.set_symbols(k).unwrap();
        factory.set_symbol_size(s).unwrap();
        let mut dec = factory.new_decoder(DecoderMode::Immediate).unwrap();

        let mut rng = Rng::from_seed64(seed);
        let mut last_rank = 0usize;
        let mut last_packet: Option<(Vec<u8>, Vec<u8>)> = None;
        for _ in 0..(k * 3 + 2) {
            let mut coeffs = vec![0u8; k];
            for c in coeffs.iter_mut() {
                *c = (rng.next_u64() & 0xFF) as u8;
            }
            let mut symbol = vec![0u8; s];
            for b in symbol.iter_mut() {
                *b = (rng.next_u64() & 0xFF) as u8;
            }
            dec.decode_symbol(&symbol, &coeffs).unwrap();
            prop_assert!(dec.rank() >= last_rank);
            prop_assert!(dec.rank() - last_rank <= 1);
            last_rank = dec.rank();
            last_packet = Some((symbol, coeffs));
        }
        if let Some((symbol, coeffs)) = last_packet {
            let rank_before = dec.rank();
            dec.decode_symbol(&symbol, &coeffs).unwrap();
            prop_assert_eq!(dec.rank(), rank_before);
        }
    }

    #[test]
    fn immediate_and_delayed_modes_agree_on_full_rank(
        k in 1usize..10,
        s in 1usize..8,
        seed in any::<u64>(),
    ) {
        let block = {
            let mut rng = Rng::from_seed64(seed);
            let mut out = vec![0u8; k * s];
            for b in out.iter_mut() {
                *b = (rng.next_u64() & 0xFF) as u8;
            }
            out
        };

        let mut factory = Factory::<Gf256>::new(k, s).unwrap();
        factory.set_symbols(k).unwrap();
        factory.set_symbol_size(s).unwrap();
        let mut enc = factory.new_encoder(&block, CodingMode::Literal { density: None }).unwrap();
        enc.set_systematic(false);

        let mut packets = Vec::new();
        for _ in 0..(k * 4 + 4) {
            let mut buf = vec![0u8; enc.payload_size()];
            enc.encode(&mut buf).unwrap();
            packets.push(buf);
        }

        let mut imm = factory.new_decoder(DecoderMode::Immediate).unwrap();
        let mut del = factory.new_decoder(DecoderMode::Delayed).unwrap();
        for p in &packets {
            if imm.is_complete() && del.is_complete() {
                break;
            }
            imm.decode(p).unwrap();
            del.decode(p).unwrap();
        }
        del.finalize().unwrap();
        prop_assert_eq!(imm.is_complete(), del.is_complete());
        if imm.is_complete() {
            let mut out_imm = vec![0u8; k * s];
            let mut out_del = vec![0u8; k * s];
            imm.copy_symbols(&mut out_imm).unwrap();
            del.copy_symbols(&mut out_del).unwrap();
            prop_assert_eq!(out_imm, out_del);
        }
    }

    #[test]
    fn generator_is_deterministic_given_the_same_seed(
        seed in any::<u64>(),
        n in 1usize..256,
    ) {
        let mut a = Rng::from_seed64(seed);
        let mut b = Rng::from_seed64(seed);
        for _ in 0..n {
            prop_assert_eq!(a.next_u64(), b.next_u64());
        }
    }
}
