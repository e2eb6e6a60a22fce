#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|raw_data: &[u8]| {
    let _ = lzw12::decompress(raw_data, lzw12::Format::Counted);
    let _ = lzw12::decompress(raw_data, lzw12::Format::Legacy);
});
