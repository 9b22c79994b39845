use std::net::Ipv4Addr;

use radix_lpm::*;

use ipnet::Ipv4Net;
use rand::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut table = LpmTable::<u32>::ipv4();
    let mut rng = thread_rng();
    let mut hits = 0usize;

    for _ in 0..1_000_000 {
        let addr = Ipv4Addr::new(rng.gen(), rng.gen(), 0, 0);
        let prefix = Ipv4Net::new(addr, rng.gen_range(1..=16))?;

        if rng.gen_bool(0.6) {
            table.insert(prefix, rng.gen::<u8>() as u32)?;
        } else if rng.gen_bool(0.5) {
            table.remove(&prefix)?;
        } else if table.lookup(&Ipv4Addr::from(rng.gen::<u32>())).is_some() {
            hits += 1;
        }
    }

    println!(
        "{} prefixes in {} nodes, {} lookup hits",
        table.len(),
        table.node_count(),
        hits
    );
    for (len, entries) in table.group_by_len() {
        println!("/{len}: {}", entries.len());
    }
    Ok(())
}
