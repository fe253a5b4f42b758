use criterion::{criterion_group, criterion_main, Criterion};

use models::state;
use service::storage::{file::FileStorage, Kind, Storage};

fn bench_file_save(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let path = std::env::temp_dir().join(format!("storage_bench_{}.json", uuid::Uuid::new_v4()));
    let store = rt.block_on(FileStorage::open(&path)).unwrap();

    // pre-populate outside of the benchmark so each save writes a realistic file
    rt.block_on(async {
        for i in 0..500 {
            let s = state::Model::create(&format!("State {i}")).unwrap();
            store.new(s.into()).await.unwrap();
        }
        store.save().await.unwrap();
    });

    c.bench_function("file_storage_new_and_save", |b| {
        b.iter(|| {
            rt.block_on(async {
                let s = state::Model::create("Bench").unwrap();
                let id = s.id.clone();
                store.new(s.into()).await.unwrap();
                store.save().await.unwrap();
                store.delete(Kind::State, &id).await.unwrap();
            })
        });
    });

    let _ = std::fs::remove_file(&path);
}

criterion_group!(benches, bench_file_save);
criterion_main!(benches);
