// src/pages/results.rs

use crate::app::AppContext;
use crate::error::AppError;
use crate::models::recommendation::{RecommendationReport, RecommendationsResponse};
use crate::pages::prompt;

/// Renders the recommendation payload and offers a JSON export.
pub async fn run(ctx: &AppContext, payload: &RecommendationsResponse) -> Result<(), AppError> {
    println!();
    println!("Recommended destinations");
    println!("========================");

    for country in &payload.countries {
        println!();
        println!("{} - {}", country.name, country.reason);
        for university in &country.universities {
            let scholarship = if university.scholarship {
                " (scholarship available)"
            } else {
                ""
            };
            println!(
                "  {} - {} - tuition {:.0}{}",
                university.name, university.program, university.tuition, scholarship
            );
            for line in &university.reasoning {
                println!("    - {}", line);
            }
        }
    }

    println!();
    if ctx.session.free_attempts_remaining() > 0 || ctx.session.has_credits() {
        println!(
            "Remaining: {} credit(s), {} free attempt(s)",
            ctx.session.credits(),
            ctx.session.free_attempts_remaining()
        );
    }

    let path = prompt("Export results to file (leave empty to skip) > ")?;
    if !path.is_empty() {
        let report = RecommendationReport::new(payload);
        std::fs::write(&path, report.to_json()?)?;
        println!("Saved to {}", path);
    }
    Ok(())
}
