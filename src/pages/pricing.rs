// src/pages/pricing.rs

use crate::app::AppContext;
use crate::error::AppError;

/// Lists the purchasable credit bundles. The purchase itself happens in an
/// external flow; this page only presents the plans.
pub async fn run(ctx: &AppContext) -> Result<(), AppError> {
    match ctx.client.get_pricing().await {
        Ok(plans) => {
            println!();
            println!("Pricing");
            println!("=======");
            for plan in plans {
                println!(
                    "{} - {} credit(s) for {}",
                    plan.name, plan.credits, plan.price
                );
                if !plan.description.is_empty() {
                    println!("  {}", plan.description);
                }
            }
            Ok(())
        }
        Err(e) => {
            println!("{}", e.message());
            Ok(())
        }
    }
}
