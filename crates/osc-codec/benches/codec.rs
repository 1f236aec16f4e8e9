//! Codec benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use osc_codec::address::is_match_with;
use osc_codec::{MatcherCache, OscBundle, OscMessage, OscMessageRaw, OscPacket, OscTimeTag, OscValue};

fn sample_message() -> OscMessage {
    OscMessage::new(
        "/mixer/channel/3/fader",
        vec![
            OscValue::Float(0.75),
            OscValue::Int(42),
            OscValue::from("label"),
            OscValue::Array(vec![OscValue::Int(1), OscValue::Int(2), OscValue::Int(3)]),
        ],
    )
    .unwrap()
}

fn encode_benchmark(c: &mut Criterion) {
    let msg = sample_message();

    c.bench_function("encode_message", |b| {
        b.iter(|| black_box(msg.to_bytes().unwrap()))
    });

    let bundle = OscBundle::new(
        OscTimeTag::IMMEDIATE,
        (0..8).map(|_| OscPacket::from(sample_message())).collect(),
    );

    c.bench_function("encode_bundle", |b| {
        b.iter(|| black_box(bundle.to_bytes().unwrap()))
    });
}

fn decode_benchmark(c: &mut Criterion) {
    let encoded = sample_message().to_bytes().unwrap();

    c.bench_function("decode_message", |b| {
        b.iter(|| black_box(OscMessage::read(&encoded).unwrap()))
    });

    c.bench_function("decode_message_raw", |b| {
        b.iter(|| {
            let raw = OscMessageRaw::new(&encoded).unwrap();
            black_box(raw.read_float(&raw[0]).unwrap())
        })
    });
}

fn text_benchmark(c: &mut Criterion) {
    let text = sample_message().to_string();

    c.bench_function("parse_message_text", |b| {
        b.iter(|| black_box(OscMessage::parse(&text).unwrap()))
    });
}

fn match_benchmark(c: &mut Criterion) {
    let pattern = "/mixer/{channel,bus}/[0-9]/f*r";
    let address = "/mixer/channel/3/fader";

    let cached = MatcherCache::new();
    c.bench_function("match_pattern_cached", |b| {
        b.iter(|| black_box(is_match_with(pattern, address, &cached)))
    });

    let uncached = MatcherCache::new();
    uncached.set_enabled(false);
    c.bench_function("match_pattern_uncached", |b| {
        b.iter(|| black_box(is_match_with(pattern, address, &uncached)))
    });
}

criterion_group!(
    benches,
    encode_benchmark,
    decode_benchmark,
    text_benchmark,
    match_benchmark
);
criterion_main!(benches);
