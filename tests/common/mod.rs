#![allow(dead_code)]

use ride_lifecycle::domain::verification::{CodeGenerator, RandomCodeGenerator};
use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const HEADER: &str = "command, subject, code, value";

/// Writes `rows` under the standard header into a temporary CSV file.
pub fn commands_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

/// The first `n` codes the binary will issue when run with `--seed seed`.
pub fn seeded_codes(seed: u64, n: usize) -> Vec<String> {
    let generator = RandomCodeGenerator::seeded(seed);
    (0..n).map(|_| generator.generate().to_string()).collect()
}

/// A code guaranteed to differ from `code`.
pub fn other_code(code: &str) -> String {
    if code == "000000" {
        "000001".to_string()
    } else {
        "000000".to_string()
    }
}

/// Register `users` accounts and create one payment per user, cycling
/// payment statuses through a legal path.
pub fn generate_commands(path: &Path, users: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(["command", "subject", "code", "value"])?;

    for i in 0..users {
        let email = format!("rider{}@example.com", i);
        let payment = uuid::Uuid::from_u128(i as u128 + 1).to_string();
        wtr.write_record(["register", &email, "", "pw"])?;
        wtr.write_record(["forgot-password", &email, "", ""])?;
        wtr.write_record(["create-payment", &payment, "", "9.99"])?;
        wtr.write_record(["update-payment", &payment, "", "processing"])?;
        wtr.write_record(["update-payment", &payment, "", "completed"])?;
    }

    wtr.flush()?;
    Ok(())
}
