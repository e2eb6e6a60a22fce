use futures::io::{BufReader, Cursor};
use lzw12::{compress, decode::Decoder, decompress, encode::Encoder, Format};
use tokio_util::compat::TokioAsyncReadCompatExt;

fn sample() -> Vec<u8> {
    b"TOBEORNOTTOBEORTOBEORNOT#".repeat(2000)
}

#[tokio::test]
async fn encode_matches_sync() {
    let data = sample();
    for &format in &[Format::Counted, Format::Legacy] {
        let mut packed = vec![];
        let result = Encoder::new()
            .into_async(&mut packed)
            .format(format)
            .encode_all(Cursor::new(&data[..]))
            .await;
        assert!(result.status.is_ok(), "{:?}", result.status);
        assert_eq!(result.bytes_read, data.len());
        assert_eq!(packed, compress(&data, format));
    }
}

#[tokio::test]
async fn decode_matches_sync() {
    let data = sample();
    let packed = compress(&data, Format::Counted);

    let mut out = vec![];
    let result = Decoder::new()
        .into_async(&mut out)
        .decode_all(Cursor::new(&packed[..]))
        .await;
    assert!(result.status.is_ok(), "{:?}", result.status);
    assert_eq!(result.bytes_written, data.len());
    assert_eq!(out, decompress(&packed, Format::Counted).unwrap());
}

#[tokio::test]
async fn tokio_reader_roundtrip() {
    let data = sample();

    let reader = BufReader::with_capacity(64, (&data[..]).compat());
    let mut packed = vec![];
    let result = Encoder::new().into_async(&mut packed).encode_all(reader).await;
    assert!(result.status.is_ok(), "{:?}", result.status);

    let reader = BufReader::with_capacity(7, (&packed[..]).compat());
    let mut out = vec![];
    let result = Decoder::new().into_async(&mut out).decode_all(reader).await;
    assert!(result.status.is_ok(), "{:?}", result.status);
    assert_eq!(out, data);
}
