//! The dictionaries of both sides fill up and reset at the same point.
use lzw12::{decode::Decoder, encode::Encoder, Code, FIRST_DYNAMIC, MAX_ENTRIES};

/// Every pair of bytes once, each pair is a new symbol.
fn distinct_pairs() -> Vec<u8> {
    (0..=255u8)
        .flat_map(|a| (0..=255u8).flat_map(move |b| [a, b]))
        .collect()
}

/// Encode byte by byte, noting the next free code after each emitted code.
fn encoder_trace(data: &[u8]) -> (Vec<Code>, Vec<Code>) {
    let mut encoder = Encoder::new();
    let mut codes = vec![];
    let mut trace = vec![];
    for &byte in data {
        let before = codes.len();
        encoder.encode_bytes(&[byte], &mut codes);
        assert!(encoder.table_len() <= MAX_ENTRIES);
        assert!(codes.len() - before <= 1);
        if codes.len() > before {
            trace.push(encoder.next_code());
        }
    }
    encoder.finish(&mut codes);
    (codes, trace)
}

/// Decode code by code, noting the next free code after each code.
fn decoder_trace(codes: &[Code]) -> (Vec<u8>, Vec<Code>) {
    let mut decoder = Decoder::new();
    let mut data = vec![];
    let mut trace = vec![];
    for &code in codes {
        decoder.decode_codes(&[code], &mut data).unwrap();
        assert!(decoder.table_len() <= MAX_ENTRIES);
        trace.push(decoder.next_code());
    }
    (data, trace)
}

#[test]
fn resets_at_the_same_code() {
    let data = distinct_pairs();
    let (codes, encoded) = encoder_trace(&data);
    let (decoded, mirrored) = decoder_trace(&codes);
    assert_eq!(decoded, data);

    // The decoder creates the entry of each code one code later.
    assert_eq!(encoded.len() + 1, mirrored.len());
    assert_eq!(encoded[..], mirrored[1..]);

    let resets = mirrored
        .windows(2)
        .filter(|pair| pair[1] < pair[0])
        .count();
    assert!(resets >= 2, "only {} resets", resets);
}

#[test]
fn reset_happens_after_last_code() {
    let (codes, trace) = encoder_trace(&distinct_pairs());
    let full = trace
        .iter()
        .position(|&next| usize::from(next) == MAX_ENTRIES)
        .unwrap();
    // Each code but the first adds one symbol, 256..=4095.
    assert_eq!(full, MAX_ENTRIES - usize::from(FIRST_DYNAMIC) - 1);
    // The first code after the reset has no dynamic entry to refer to.
    assert!(codes[full + 1] < FIRST_DYNAMIC);
    assert_eq!(trace[full + 1], FIRST_DYNAMIC + 1);
}

#[test]
fn literals_survive_resets() {
    let mut rng = 0x1234_5678u32;
    let data: Vec<u8> = (0..200_000)
        .map(|_| {
            rng ^= rng << 13;
            rng ^= rng >> 17;
            rng ^= rng << 5;
            (rng >> 24) as u8 & 0x3f
        })
        .collect();

    let (codes, _) = encoder_trace(&data);
    let (decoded, trace) = decoder_trace(&codes);
    assert_eq!(decoded, data);
    let restarts = trace.iter().filter(|&&next| next == FIRST_DYNAMIC + 1).count();
    assert!(restarts > 1, "no reset in {} codes", codes.len());
    assert!(codes.iter().all(|&code| usize::from(code) < MAX_ENTRIES));
}

#[test]
fn self_reference_right_after_reset() {
    // After a reset the decoder must resolve 256 before it has assigned it.
    let mut codes = vec![0];
    codes.extend((1..3840u32).map(|i| (i % 256) as Code));
    // Fills slot 4095.
    codes.push(9);
    codes.push(256);

    let mut decoder = Decoder::new();
    let decoded = decoder.decode(&codes).unwrap();
    assert_eq!(&decoded[decoded.len() - 3..], &[9, 9, 9]);
    assert_eq!(decoder.next_code(), FIRST_DYNAMIC + 1);
}
