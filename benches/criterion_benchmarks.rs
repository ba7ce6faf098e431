use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use missbench::config::{CacheConfig, SlruConfig};
use missbench::{
    unit_loader, BoundedCache, EvictionPolicy, FifoPolicy, LfuPolicy, LruPolicy, RandomPolicy,
    SlruPolicy, WorkloadConfig, WorkloadGenerator,
};

const CACHE_SIZE: usize = 150;

fn replay<P: EvictionPolicy<u64>>(policy: P, config: &WorkloadConfig) -> u64 {
    let cache_config = CacheConfig {
        capacity: std::num::NonZeroUsize::new(CACHE_SIZE).unwrap(),
    };
    let mut cache = BoundedCache::init(cache_config, policy, unit_loader::<u64>());
    cache.replay(WorkloadGenerator::generate(config)).unwrap();
    cache.loader().misses()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let config = WorkloadConfig::new(1_000, 100, vec![7, 3]).unwrap();

    // Workload generation alone
    {
        let mut group = c.benchmark_group("Workload");
        group.bench_function("generate 1000x100", |b| {
            b.iter(|| black_box(WorkloadGenerator::generate(&config).sum::<u64>()));
        });
        group.finish();
    }

    // Full trials, one fresh cache per iteration
    {
        let mut group = c.benchmark_group("Trial");
        group.sample_size(20);

        group.bench_function("LRU", |b| {
            b.iter(|| black_box(replay(LruPolicy::with_capacity(CACHE_SIZE), &config)));
        });

        group.bench_function("LFU", |b| {
            b.iter(|| black_box(replay(LfuPolicy::new(), &config)));
        });

        group.bench_function("SLRU", |b| {
            let slru = SlruConfig::for_capacity(std::num::NonZeroUsize::new(CACHE_SIZE).unwrap());
            b.iter(|| black_box(replay(SlruPolicy::init(slru), &config)));
        });

        group.bench_function("FIFO", |b| {
            b.iter(|| black_box(replay(FifoPolicy::new(), &config)));
        });

        group.bench_function("Random", |b| {
            b.iter(|| black_box(replay(RandomPolicy::with_seed(1), &config)));
        });

        group.finish();
    }

    // Hit path on a warm cache
    {
        let mut group = c.benchmark_group("Cache Operations");
        group.bench_function("LRU get hit", |b| {
            b.iter_batched_ref(
                || {
                    let mut cache =
                        BoundedCache::new(CACHE_SIZE, LruPolicy::new(), unit_loader::<u64>())
                            .unwrap();
                    for key in 0..CACHE_SIZE as u64 {
                        cache.get_or_load(key).unwrap();
                    }
                    cache
                },
                |cache| {
                    for i in 0..100u64 {
                        black_box(cache.get_or_load(i % CACHE_SIZE as u64).unwrap());
                    }
                },
                BatchSize::SmallInput,
            );
        });
        group.finish();
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
