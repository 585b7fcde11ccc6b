use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ringchan_rs::{init_chan, Config, Flavor};
use std::sync::Arc;
use std::thread;

const MSG_PER_PRODUCER: u64 = 200_000;

fn bench_spsc(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc");
    group.throughput(Throughput::Elements(MSG_PER_PRODUCER));

    group.bench_function("single_producer_consumer", |b| {
        b.iter(|| {
            let channel = Arc::new(init_chan::<u64>(Config::new(1024, Flavor::Spsc)));

            let producer_channel = Arc::clone(&channel);
            let producer = thread::spawn(move || {
                for i in 0..MSG_PER_PRODUCER {
                    producer_channel.send(i);
                }
            });

            for _ in 0..MSG_PER_PRODUCER {
                black_box(channel.recv());
            }
            producer.join().unwrap();
        });
    });

    group.finish();
}

fn bench_mpsc(c: &mut Criterion) {
    let mut group = c.benchmark_group("mpsc");

    for num_producers in [2, 4, 8] {
        let total_msgs = MSG_PER_PRODUCER * num_producers as u64;
        group.throughput(Throughput::Elements(total_msgs));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{num_producers}P_1C")),
            &num_producers,
            |b, &n| {
                b.iter(|| {
                    let channel = Arc::new(init_chan::<u64>(Config::new(1024, Flavor::Mpsc)));

                    let mut producer_handles = Vec::new();
                    for _ in 0..n {
                        let channel = Arc::clone(&channel);
                        producer_handles.push(thread::spawn(move || {
                            for i in 0..MSG_PER_PRODUCER {
                                channel.send(i);
                            }
                        }));
                    }

                    for _ in 0..total_msgs {
                        black_box(channel.recv());
                    }
                    for handle in producer_handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_mpmc(c: &mut Criterion) {
    let mut group = c.benchmark_group("mpmc");

    for (num_producers, num_consumers) in [(2, 2), (4, 4), (8, 2)] {
        let total_msgs = MSG_PER_PRODUCER * num_producers as u64;
        group.throughput(Throughput::Elements(total_msgs));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{num_producers}P_{num_consumers}C")),
            &(num_producers, num_consumers),
            |b, &(producers, consumers)| {
                b.iter(|| {
                    let channel = Arc::new(init_chan::<u64>(Config::new(1024, Flavor::Mpmc)));

                    let mut producer_handles = Vec::new();
                    for _ in 0..producers {
                        let channel = Arc::clone(&channel);
                        producer_handles.push(thread::spawn(move || {
                            for i in 0..MSG_PER_PRODUCER {
                                channel.send(i);
                            }
                        }));
                    }

                    let mut consumer_handles = Vec::new();
                    for c in 0..consumers {
                        let channel = Arc::clone(&channel);
                        let share = total_msgs / consumers as u64
                            + u64::from(c < total_msgs % consumers as u64);
                        consumer_handles.push(thread::spawn(move || {
                            for _ in 0..share {
                                black_box(channel.recv());
                            }
                        }));
                    }

                    for handle in producer_handles {
                        handle.join().unwrap();
                    }
                    for handle in consumer_handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_rendezvous(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendezvous");
    const MSGS: u64 = 50_000;
    group.throughput(Throughput::Elements(MSGS));

    group.bench_function("unbuffered_handoff", |b| {
        b.iter(|| {
            let channel = Arc::new(init_chan::<u64>(Config::new(0, Flavor::Mpmc)));

            let producer_channel = Arc::clone(&channel);
            let producer = thread::spawn(move || {
                for i in 0..MSGS {
                    producer_channel.send(i);
                }
            });

            for _ in 0..MSGS {
                black_box(channel.recv());
            }
            producer.join().unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_spsc, bench_mpsc, bench_mpmc, bench_rendezvous);
criterion_main!(benches);
