use criterion::{Criterion, black_box, criterion_group, criterion_main};
use proximo_core::filter::MedianFilter;

// Generate a synthetic distance trace: slow sweep with additive white noise
fn synth_trace(n: usize, noise_amp: f32, seed: u32) -> Vec<f32> {
    // tiny PRNG
    let mut state = seed.max(1);
    let mut next_f32 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        (x as f32) / (u32::MAX as f32 + 1.0)
    };
    let mut v = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f32 / 200.0;
        let sweep = 100.0 + 80.0 * t.sin();
        let noise = (next_f32() * 2.0 - 1.0) * noise_amp; // [-amp, +amp]
        v.push((sweep + noise).clamp(0.0, 200.0));
    }
    v
}

pub fn bench_median_filter(c: &mut Criterion) {
    let trace = synth_trace(10_000, 5.0, 42);
    c.bench_function("median_filter_window5", |b| {
        b.iter(|| {
            let mut f = MedianFilter::new(5);
            let mut last = 0.0;
            for &s in &trace {
                last = f.push(black_box(s));
            }
            black_box(last)
        })
    });
}

criterion_group!(benches, bench_median_filter);
criterion_main!(benches);
