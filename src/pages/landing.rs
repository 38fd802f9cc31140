// src/pages/landing.rs

use crate::app::AppContext;
use crate::error::AppError;
use crate::models::session::SessionStatus;
use crate::pages::{pricing, prompt, questionnaire, review};

/// Entry menu: entitlement summary plus navigation into the other flows.
pub async fn run(ctx: &AppContext) -> Result<(), AppError> {
    println!("Study Compass - find your study-abroad match");

    loop {
        println!();
        print_entitlements(ctx);
        println!("  [1] Fill in the questionnaire");
        println!("  [2] Review answers and get recommendations");
        println!("  [3] View pricing");
        if ctx.session.identity().is_some() {
            println!("  [4] Sign out");
        } else {
            println!("  [4] Sign in");
        }
        println!("  [5] Start over (clear answers)");
        println!("  [q] Quit");

        match prompt("> ")?.as_str() {
            "1" => questionnaire::run(ctx)?,
            "2" => review::run(ctx).await?,
            "3" => pricing::run(ctx).await?,
            "4" => toggle_sign_in(ctx).await,
            "5" => {
                ctx.questionnaire.reset();
                println!("Answers cleared.");
            }
            "q" | "Q" => return Ok(()),
            other => println!("Unknown choice: {}", other),
        }
    }
}

async fn toggle_sign_in(ctx: &AppContext) {
    let result = if ctx.session.identity().is_some() {
        ctx.session.sign_out().await
    } else {
        ctx.session.sign_in().await
    };
    if let Err(e) = result {
        println!("{}", e.message());
    }
}

fn print_entitlements(ctx: &AppContext) {
    match ctx.session.status() {
        Some(SessionStatus::Authenticated { email, credits }) => {
            let who = email.unwrap_or_else(|| "signed-in user".to_string());
            println!("Signed in as {} - {} credit(s) available", who, credits);
        }
        Some(SessionStatus::Guest {
            free_attempts_remaining,
            ..
        }) => {
            println!(
                "Browsing as guest - {} free attempt(s) remaining",
                free_attempts_remaining
            );
        }
        None => println!("Entitlements unknown (backend unreachable?)"),
    }
}
