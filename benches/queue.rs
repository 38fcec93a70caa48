use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ringstack::{ByteQueue, Config, ScalarAccess, TypedQueue};
use std::collections::VecDeque;

fn bench_queue(c: &mut Criterion) {
    let n = 1024;
    {
        let mut group = c.benchmark_group("VecDeque vs RingQueue (Push 1024 from capacity 1)");
        group.bench_function("std::collections::VecDeque", |b| {
            b.iter(|| {
                let mut d = VecDeque::with_capacity(1);
                for i in 0..n {
                    d.push_back(black_box(i as i32));
                }
                d
            })
        });

        group.bench_function("TypedQueue<i32>", |b| {
            b.iter(|| {
                let mut q: TypedQueue<i32> = TypedQueue::with_config(1, Config::quiet()).unwrap();
                for i in 0..n {
                    q.push(black_box(i as i32)).unwrap();
                }
                q
            })
        });

        group.bench_function("ByteQueue (4-byte records)", |b| {
            b.iter(|| {
                let mut q = ByteQueue::with_config(4, 1, Config::quiet()).unwrap();
                for i in 0..n {
                    q.push_scalar(black_box(i as i32)).unwrap();
                }
                q
            })
        });
        group.finish();
    }

    {
        // Half the elements are popped first so the live region wraps.
        let mut group = c.benchmark_group("VecDeque vs RingQueue (Wrapped Get 1024)");
        let mut d_std = VecDeque::with_capacity(n);
        let mut q: TypedQueue<i32> = TypedQueue::new(n).unwrap();
        for i in 0..n {
            d_std.push_back(i as i32);
            q.push(i as i32).unwrap();
        }
        for i in 0..n / 2 {
            d_std.pop_front();
            d_std.push_back(i as i32);
            q.pop().unwrap();
            q.push(i as i32).unwrap();
        }

        group.bench_function("std::collections::VecDeque", |b| {
            b.iter(|| {
                for i in 0..n {
                    black_box(d_std.get(black_box(i)));
                }
            })
        });

        group.bench_function("TypedQueue<i32>", |b| {
            b.iter(|| {
                for i in 0..n {
                    let _ = black_box(q.get(black_box(i)));
                }
            })
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("VecDeque vs RingQueue (Insert middle 256)");
        group.bench_function("std::collections::VecDeque", |b| {
            b.iter(|| {
                let mut d = VecDeque::new();
                for i in 0..256 {
                    d.insert(d.len() / 2, black_box(i));
                }
                d
            })
        });

        group.bench_function("TypedQueue<i32>", |b| {
            b.iter(|| {
                let mut q: TypedQueue<i32> = TypedQueue::with_config(1, Config::quiet()).unwrap();
                for i in 0..256 {
                    q.insert(q.len() / 2, black_box(i)).unwrap();
                }
                q
            })
        });
        group.finish();
    }
}

criterion_group!(benches, bench_queue);
criterion_main!(benches);
