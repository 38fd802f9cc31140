// src/pages/review.rs

use crate::app::AppContext;
use crate::error::AppError;
use crate::models::ad::Advertisement;
use crate::models::recommendation::RecommendationsResponse;
use crate::pages::questionnaire::render_answer;
use crate::pages::{pricing, prompt, results};
use crate::timer::{run_countdown, AdTimer};
use crate::workflow::SubmitOutcome;
use std::io::Write;

/// Review-and-submit flow: shows the collected answers, then routes the
/// submission through the access-gating workflow.
pub async fn run(ctx: &AppContext) -> Result<(), AppError> {
    print_summary(ctx);

    if prompt("Submit and get recommendations? [y/N] > ")?.to_lowercase() != "y" {
        return Ok(());
    }

    match ctx.workflow.submit().await {
        Ok(SubmitOutcome::Recommendations(payload)) => results::run(ctx, &payload).await,
        Ok(SubmitOutcome::AdRequired(ad)) => match run_ad_flow(ctx, &ad).await {
            Ok(payload) => results::run(ctx, &payload).await,
            Err(e) => {
                println!("{}", e.message());
                Ok(())
            }
        },
        Ok(SubmitOutcome::PurchaseRequired(reason)) => {
            println!("{}", reason);
            println!("You can purchase credits from the pricing page.");
            pricing::run(ctx).await
        }
        Err(e) => {
            // User-initiated retry only: report and return to the menu.
            println!("{}", e.message());
            Ok(())
        }
    }
}

/// Displays the ad with a live countdown, then completes it with the
/// backend once the gate opens.
async fn run_ad_flow(
    ctx: &AppContext,
    ad: &Advertisement,
) -> Result<RecommendationsResponse, AppError> {
    println!();
    println!("--- Advertisement ---");
    println!("{}", ad.headline);
    println!("[image] {}", ad.image_url);
    // The call-to-action is available regardless of the countdown.
    println!("{}: {}", ad.cta_text, ad.cta_url);

    let mut timer = AdTimer::new(ad);
    println!("Please watch for {} seconds...", timer.remaining());
    run_countdown(&mut timer, |remaining| {
        print!("\r{:>3}s remaining ", remaining);
        let _ = std::io::stdout().flush();
    })
    .await;
    println!("\rAd complete!        ");

    ctx.workflow.complete_ad(&timer).await
}

fn print_summary(ctx: &AppContext) {
    println!();
    println!("Your answers");
    println!("============");

    let answers = ctx.questionnaire.answers();
    for step in ctx.questionnaire.steps() {
        let answered: Vec<_> = step
            .questions
            .iter()
            .filter_map(|q| {
                answers
                    .get(&q.question_key)
                    .filter(|value| !value.is_empty())
                    .map(|value| (q, value))
            })
            .collect();
        if answered.is_empty() {
            continue;
        }

        println!();
        println!("{}", step.title);
        for (question, value) in answered {
            println!(
                "  {}: {}",
                question.question_text,
                render_answer(question, value)
            );
        }
    }
    println!();
}
