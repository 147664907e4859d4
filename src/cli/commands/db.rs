//! Database maintenance commands.
//!
//! These open the same store file as the server, out of process.

use console::style;
use diesel_async::SimpleAsyncConnection;

use crate::config::Settings;
use crate::rate_limit::today_utc;

/// Print the pre-launch database report.
pub async fn cmd_stats(settings: &Settings) -> anyhow::Result<()> {
    let db_path = settings.database_path();
    if !db_path.exists() {
        println!(
            "{} Database not found at {}. Start the server first: prelaunch serve",
            style("✗").red(),
            db_path.display()
        );
        return Ok(());
    }

    let signups = settings.signups();
    let generations = settings.generations();

    println!("\n{}\n", style("GitBoost Pre-Launch Database Stats").bold());
    println!("{}", "=".repeat(50));

    let total_emails = signups.count().await?;
    println!("Total Early Access Signups: {}", style(total_emails).green());

    let total_generations = generations.count().await?;
    println!(
        "Total Blueprint Generations: {}",
        style(total_generations).green()
    );

    let today_generations = generations.count_for_day(&today_utc()).await?;
    println!("Today's Generations: {}", style(today_generations).green());

    println!("{}", "=".repeat(50));

    println!("\n{}\n", style("All Email Signups:").bold());
    let all_signups = signups.get_all().await?;
    if all_signups.is_empty() {
        println!("  No signups yet");
    } else {
        for (i, signup) in all_signups.iter().enumerate() {
            println!("  {}. {}", i + 1, signup.email);
            println!("     Signed up: {}", signup.created_at.to_rfc3339());
        }
    }

    println!("\n{}\n", style("Most Popular Blueprints:").bold());
    let top = generations.top_blueprints(5).await?;
    if top.is_empty() {
        println!("  No generations yet");
    } else {
        for (i, entry) in top.iter().enumerate() {
            println!("  {}. {} - {} generates", i + 1, entry.title, entry.count);
        }
    }

    let unique_ips = generations.distinct_ip_count().await?;
    println!("\nUnique IPs: {}", style(unique_ips).green());

    println!("\n{}", "=".repeat(50));
    println!("\nFor detailed queries, use:");
    println!("  sqlite3 {} \"SELECT * FROM emails;\"", db_path.display());
    println!("  sqlite3 {} \"SELECT * FROM generations;\"\n", db_path.display());

    Ok(())
}

/// Reset the pre-launch database.
///
/// Default deletes the file (recreated on next serve); `--truncate` keeps
/// the file, empties both tables, and reclaims space.
pub async fn cmd_reset(settings: &Settings, truncate: bool) -> anyhow::Result<()> {
    let db_path = settings.database_path();

    if truncate {
        if !db_path.exists() {
            println!("No database file found. Nothing to truncate.");
            return Ok(());
        }

        let removed_emails = settings.signups().clear().await?;
        let removed_generations = settings.generations().clear().await?;

        let pool = settings.create_pool();
        let mut conn = pool.get().await?;
        conn.batch_execute("VACUUM").await?;

        println!(
            "{} Tables truncated: emails ({} rows), generations ({} rows)",
            style("✓").green(),
            removed_emails,
            removed_generations
        );
        return Ok(());
    }

    if db_path.exists() {
        std::fs::remove_file(&db_path)?;
        println!(
            "{} Database file deleted. It will be recreated on server start.",
            style("✓").green()
        );
    } else {
        println!("No database file found. Nothing to delete.");
    }

    Ok(())
}
