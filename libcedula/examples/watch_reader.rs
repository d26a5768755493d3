// Watch a reader for card insertions and print what shows up.
//
// Run with: cargo run --example watch_reader --features pcsc

use libcedula::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let ctx = SmartcardContext::open_pcsc()?;
    let reader = ctx.first_reader()?;
    println!("watching {} (ctrl-c to quit)", reader.name());

    let (monitor, events) = ctx.monitor(reader.name())?;
    for event in events {
        match event {
            CardEvent::Inserted(session) => {
                println!(
                    "card inserted: {} (UID {}, hex {})",
                    session.card_type(),
                    session.uid().to_u64().map(|n| n.to_string()).unwrap_or_default(),
                    session.uid()
                );
            }
            CardEvent::Removed => println!("card removed"),
        }
    }

    monitor.stop()?;
    Ok(())
}
