//! 降级解析器基准测试
//!
//! 测试场景:
//! 1. 注册表内服务商的单次解析
//! 2. 非注册表代码的快速拒绝
//! 3. 批量不同账户号

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use miles_gateway::{domain::provider_registry, service::fallback_resolver::FallbackResolver};

fn bench_resolve(c: &mut Criterion) {
    let resolver = FallbackResolver::new();
    let mut group = c.benchmark_group("fallback_resolve");

    for provider in provider_registry::fallback_providers() {
        group.bench_with_input(
            BenchmarkId::new("registered", provider.label),
            provider.code,
            |b, code| b.iter(|| resolver.resolve(black_box("1234567890"), black_box(code))),
        );
    }

    group.bench_function("not_registered", |b| {
        b.iter(|| resolver.resolve(black_box("1234567890"), black_box("058")))
    });

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let resolver = FallbackResolver::new();
    let accounts: Vec<String> = (0..1_000u64).map(|i| format!("{:010}", i * 7919)).collect();

    let mut group = c.benchmark_group("fallback_batch");
    group.throughput(Throughput::Elements(accounts.len() as u64));
    group.bench_function("1000_accounts", |b| {
        b.iter(|| {
            for account in &accounts {
                let _ = black_box(resolver.resolve(account, "999992"));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_batch);
criterion_main!(benches);
