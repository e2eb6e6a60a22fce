#![no_main]
use libfuzzer_sys::fuzz_target;
use lzw12::{compress, decompress, Format};

fuzz_target!(|data: &[u8]| {
    let packed = compress(data, Format::Counted);
    let result = decompress(&packed, Format::Counted);
    assert_eq!(result.as_deref(), Ok(data));
});
