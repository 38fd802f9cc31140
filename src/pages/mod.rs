// src/pages/mod.rs

pub mod landing;
pub mod pricing;
pub mod questionnaire;
pub mod results;
pub mod review;

use std::io::{self, Write};

/// Prints `label` and reads one trimmed line from stdin.
pub(crate) fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
