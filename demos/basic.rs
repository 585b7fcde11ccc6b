use ringchan_rs::{init_chan, Config, Flavor};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn main() {
    println!("ringchan-rs basic example");
    println!("==========================\n");

    let config = Config::new(1024, Flavor::Mpsc);
    let channel = Arc::new(init_chan::<u64>(config));

    const N_PRODUCERS: u64 = 4;
    const ITEMS_PER_PRODUCER: u64 = 1_000_000;

    println!("Configuration:");
    println!("  Producers: {N_PRODUCERS}");
    println!("  Items per producer: {ITEMS_PER_PRODUCER}");
    println!("  Total items: {}\n", N_PRODUCERS * ITEMS_PER_PRODUCER);

    let start = Instant::now();

    let mut handles = Vec::new();
    for id in 0..N_PRODUCERS {
        let channel = Arc::clone(&channel);
        handles.push(thread::spawn(move || {
            for i in 0..ITEMS_PER_PRODUCER {
                channel.send(id * ITEMS_PER_PRODUCER + i);
            }
            println!("Producer {id} finished");
        }));
    }

    let total = N_PRODUCERS * ITEMS_PER_PRODUCER;
    let mut sum = 0u64;
    for _ in 0..total {
        sum += channel.recv();
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let duration = start.elapsed();

    println!("\nResults:");
    println!("  Items consumed: {total}");
    println!("  Sum: {sum}");
    println!("  Duration: {duration:.2?}");
    println!(
        "  Throughput: {:.2} million items/sec",
        total as f64 / duration.as_secs_f64() / 1_000_000.0
    );
}
