use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nllb_translator::pipelines::encoding::EncodedResult;
use std::time::{Duration, Instant};
use tch::Device;

fn encode_flat(length: i64) -> EncodedResult {
    let mut input_ids = vec![256_098];
    input_ids.extend(1000..1000 + length);
    input_ids.push(2);
    EncodedResult::from_ids(input_ids)
}

fn encode_ragged(batch_size: i64, max_length: i64) -> EncodedResult {
    let input_ids = (0..batch_size)
        .map(|row| (0..max_length - row % max_length).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let attention_mask = input_ids
        .iter()
        .map(|ids| vec![1; ids.len()])
        .collect::<Vec<_>>();
    EncodedResult::Batched {
        input_ids,
        attention_mask,
    }
}

fn normalization_pass(iters: u64, encoded: &EncodedResult) -> Duration {
    let mut duration = Duration::new(0, 0);
    for _i in 0..iters {
        let encoded = encoded.clone();
        let start = Instant::now();
        if let Ok(batch) = encoded.normalize(1) {
            let _ = black_box(batch.to_tensors(Device::Cpu));
        }
        duration = duration.checked_add(start.elapsed()).unwrap();
    }
    duration
}

fn bench_normalization(c: &mut Criterion) {
    let flat_short = encode_flat(16);
    let flat_long = encode_flat(126);
    let ragged = encode_ragged(32, 128);

    c.bench_function("Normalize flat (16 tokens)", |b| {
        b.iter_custom(|iters| black_box(normalization_pass(iters, &flat_short)))
    });
    c.bench_function("Normalize flat (128 tokens)", |b| {
        b.iter_custom(|iters| black_box(normalization_pass(iters, &flat_long)))
    });
    c.bench_function("Normalize ragged batch (32 x 128)", |b| {
        b.iter_custom(|iters| black_box(normalization_pass(iters, &ragged)))
    });
}

criterion_group! {
name = benches;
config = Criterion::default().sample_size(50);
targets = bench_normalization
}

criterion_main!(benches);
