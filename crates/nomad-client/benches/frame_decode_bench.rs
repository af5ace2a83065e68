// Benchmarks for stream frame decoding
// Measures how fast log and file frames are cut out of a response body

use std::hint::black_box;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use nomad_client::FrameDecoder;

fn frame_body(frames: usize, payload_size: usize) -> Vec<u8> {
    let data = STANDARD.encode(vec![b'x'; payload_size]);
    let mut body = Vec::new();
    for i in 0..frames {
        body.extend_from_slice(
            format!(
                r#"{{"Offset":{},"Data":"{}","File":"alloc/logs/web.stdout.0"}}"#,
                (i + 1) * payload_size,
                data
            )
            .as_bytes(),
        );
        if i % 10 == 0 {
            body.extend_from_slice(b"{}");
        }
    }
    body
}

fn decode_all(body: &[u8], chunk_size: usize) -> usize {
    let mut decoder = FrameDecoder::new();
    let mut count = 0;
    for chunk in body.chunks(chunk_size) {
        decoder.push(chunk);
        while let Ok(Some(_)) = decoder.next_frame() {
            count += 1;
        }
    }
    count
}

fn bench_decode_whole_body(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_whole_body");
    for payload_size in [64, 1024, 16 * 1024] {
        let body = frame_body(100, payload_size);
        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(payload_size),
            &body,
            |b, body| b.iter(|| decode_all(black_box(body), body.len())),
        );
    }
    group.finish();
}

fn bench_decode_chunked(c: &mut Criterion) {
    let body = frame_body(100, 1024);
    let mut group = c.benchmark_group("decode_chunked");
    group.throughput(Throughput::Bytes(body.len() as u64));
    for chunk_size in [512, 4096, 16 * 1024] {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            &chunk_size,
            |b, &chunk_size| b.iter(|| decode_all(black_box(&body), chunk_size)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_decode_whole_body, bench_decode_chunked);
criterion_main!(benches);
