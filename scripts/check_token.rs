//! Bearer Token Check Script
//!
//! This script asks for an app Bearer Token (or reads `BEARER_TOKEN`) and runs
//! one small recent search with it, so credentials can be verified before a
//! long search is started.

use std::io::{self, Write};

use tweetscope::twitter::{RecentRequest, SearchClient, MIN_PAGE_SIZE};
use tweetscope::{extract::default_tweet_fields, HttpSearchClient, SearchWindow, TwitterConfig};

fn read_token() -> io::Result<String> {
    if let Ok(token) = std::env::var("BEARER_TOKEN") {
        if !token.trim().is_empty() {
            println!("🔑 Using BEARER_TOKEN from the environment");
            return Ok(token.trim().to_string());
        }
    }

    print!("🔑 Enter your Twitter Bearer Token: ");
    io::stdout().flush()?;
    let mut token = String::new();
    io::stdin().read_line(&mut token)?;
    Ok(token.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("🐦 Twitter Bearer Token Check");
    println!("=============================");

    let token = read_token()?;
    if token.is_empty() {
        println!("❌ Bearer token cannot be empty!");
        return Err("Bearer token is required".into());
    }

    let mut config = TwitterConfig::new(token);
    if let Ok(base) = std::env::var("TWITTER_API_BASE") {
        config.api_base = base.trim_end_matches('/').to_string();
    }
    println!("📍 API base: {}", config.api_base);

    let client = HttpSearchClient::new(config);
    let request = RecentRequest {
        query: "twitter".to_string(),
        window: SearchWindow::default(),
        max_results: MIN_PAGE_SIZE,
        next_token: None,
        tweet_fields: default_tweet_fields(),
    };

    println!("\n🚀 Running a {}-tweet recent search...", MIN_PAGE_SIZE);
    match client.fetch_recent(&request).await {
        Ok(page) => {
            println!("\n🎉 Success! The token can reach the search API.");
            println!(
                "📄 Received {} tweets from {} authors",
                page.tweets.len(),
                page.authors.len()
            );
            if page.next_token.is_some() {
                println!("➡️  More pages are available");
            }
        }
        Err(e) => {
            println!("\n💥 Token check failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
