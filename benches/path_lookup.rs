//! Benchmark the linear path scan against growing node tables.

use arbor::service::FileSystemService;
use arbor::store::MemorySnapshotStore;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

fn build_service(files: usize) -> FileSystemService {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    runtime.block_on(async {
        let store = Arc::new(MemorySnapshotStore::new());
        let mut service = FileSystemService::initialize(store, "bench").await.unwrap();
        service.create_directory("/src").await.unwrap();
        for i in 0..files {
            service
                .create_file(&format!("/src/file_{:04}.rs", i), "fn f() {}")
                .await
                .unwrap();
        }
        service
    })
}

fn bench_path_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_lookup");
    for size in [16usize, 128, 1024] {
        let service = build_service(size);
        let target = format!("/src/file_{:04}.rs", size - 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| service.get_file_by_path(&target))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_path_lookup);
criterion_main!(benches);
