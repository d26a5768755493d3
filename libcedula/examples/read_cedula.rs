// Read the identity document on the first available reader.
//
// Run with: cargo run --example read_cedula --features pcsc

use libcedula::cedula;
use libcedula::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let ctx = SmartcardContext::open_pcsc()?;
    for reader in ctx.readers() {
        println!("reader: {} ({:?})", reader.name, reader.brand);
    }

    let mut session = ctx.first_reader()?.connect()?;
    println!(
        "card: {} (UID {}, ATR {})",
        session.card_type(),
        session.uid(),
        session.atr_hex()
    );

    let record = cedula::read_document(&mut session)?;
    println!("document number: {}", record.document_number);
    println!(
        "holder: {} {} {}",
        record.given_names, record.first_surname, record.second_surname
    );
    println!("nationality: {}", record.nationality);
    if let Some(birth) = record.birth_date {
        println!("born: {} in {}", birth, record.birth_place);
    }
    if let (Some(issued), Some(expires)) = (record.issue_date, record.expiry_date) {
        println!("valid: {} to {}", issued, expires);
    }
    if !record.remarks.is_empty() {
        println!("remarks: {}", record.remarks);
    }
    if let Some(photo) = &record.photo {
        std::fs::write("photo.jpg", photo)?;
        println!("photo: {} bytes -> photo.jpg", photo.len());
    }

    session.disconnect()?;
    Ok(())
}
