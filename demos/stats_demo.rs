use std::collections::hash_map::RandomState;

use clap::Parser;
use probe_set::FixedHashSet;

const CAPACITY: usize = 1 << 12;

#[derive(Parser, Debug)]
struct Args {
    /// Percentage of the arena to fill before erasing.
    #[arg(short = 'l', long = "load_percent", default_value_t = 90)]
    load_percent: usize,

    /// Percentage of the inserted values to erase again.
    #[arg(short = 'e', long = "erase_percent", default_value_t = 25)]
    erase_percent: usize,
}

fn main() {
    let args = Args::parse();

    let mut set: Box<FixedHashSet<u64, CAPACITY, RandomState>> =
        Box::new(FixedHashSet::with_hasher(RandomState::new()));

    let target = (CAPACITY * args.load_percent.min(100)) / 100;
    println!(
        "Filling set of capacity {} to {} values ({}%)",
        set.max_size(),
        target,
        args.load_percent.min(100)
    );

    for i in 0..target {
        set.insert(i as u64);
    }

    println!("Inserted {} values", set.len());
    set.print_probe_histogram();
    set.debug_stats().print();

    let erase = (target * args.erase_percent.min(100)) / 100;
    println!("Erasing every value below {}", erase);
    set.retain(|&v| v >= erase as u64);

    println!("{} values remain, {} slots available", set.len(), set.available());
    set.print_probe_histogram();
    set.debug_stats().print();
}
