use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ge_srtp::{DecodedResult, RegisterAddress, RequestFrame};

fn bench_parse_address(c: &mut Criterion) {
    c.bench_function("parse_address", |b| {
        b.iter(|| RegisterAddress::parse(black_box("%R20000:2")))
    });
}

fn bench_encode_request(c: &mut Criterion) {
    let addr = RegisterAddress::parse("MB03521").unwrap();
    c.bench_function("encode_request", |b| {
        b.iter(|| RequestFrame::read_sys_memory(black_box(&addr)))
    });
}

fn bench_decode_response(c: &mut Criterion) {
    let mut reply = vec![0u8; 56];
    reply[44..48].copy_from_slice(&[0x01, 0x02, 0x03, 0x04]);
    c.bench_function("decode_response", |b| {
        b.iter(|| DecodedResult::decode(black_box(&reply), 2))
    });
}

criterion_group!(
    benches,
    bench_parse_address,
    bench_encode_request,
    bench_decode_response
);
criterion_main!(benches);
