use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::Client;
use serde_json::json;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

const DURATION_SECS: u64 = 20;
const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const BENCH_PASSWORD: &str = "benchmark-secret";

struct Target {
    name: &'static str,
    method: &'static str,
    url: String,
    body: Option<serde_json::Value>,
}

#[tokio::main]
async fn main() {
    let base_url = std::env::var("BENCH_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    println!("{}", "🚀 Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", base_url);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client");

    if client.get(format!("{}/health", base_url)).send().await.is_err() {
        eprintln!("{}", format!("❌ Server is NOT reachable at {}. Please start it first.", base_url).red().bold());
        return;
    }

    println!("\n{}", "⚙️  Setting up benchmark data...".yellow());
    let email = setup_donor(&client, &base_url).await;

    println!("{}", "✅ Data created successfully.".green());
    println!("   Donor: {}", email);

    let targets = vec![
        Target {
            name: "Health Check (Public)",
            method: "GET",
            url: format!("{}/health", base_url),
            body: None,
        },
        Target {
            name: "Campaign Listing (Public Read)",
            method: "GET",
            url: format!("{}/api/campaigns?page=1&limit=10&sort=created_at&order=DESC", base_url),
            body: None,
        },
        Target {
            name: "Featured Campaigns (Public Read)",
            method: "GET",
            url: format!("{}/api/campaigns/featured", base_url),
            body: None,
        },
        Target {
            name: "Login Flow (Crypto Intensive)",
            method: "POST",
            url: format!("{}/api/auth/login", base_url),
            body: Some(json!({
                "email": email,
                "password": BENCH_PASSWORD
            })),
        },
    ];

    let rps_stages = vec![10, 50, 200, 1000];

    for target in targets {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking Endpoint: {}", target.name.cyan().bold());
        println!("URL: {}", target.url);
        println!("{}", "=".repeat(60));

        println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
        println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

        for &rps in &rps_stages {
            run_stage(&client, &target, rps).await;
        }
    }
}

async fn setup_donor(client: &Client, base_url: &str) -> String {
    let email = format!("bench-{}@donatrust.test", Uuid::new_v4());
    let res = client.post(format!("{}/api/auth/register", base_url))
        .json(&json!({
            "full_name": "Benchmark Donor",
            "email": email,
            "password": BENCH_PASSWORD,
            "role": "donor"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Failed to register donor. Status: {}. Body: {}", status, txt);
    }
    email
}

async fn run_stage(client: &Client, target: &Target, rps: u32) {
    let limiter = Arc::new(RateLimiter::direct(
        Quota::per_second(NonZeroU32::new(rps).expect("rps must be non-zero"))
    ));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(DURATION_SECS);

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let client = client.clone();
            let url = target.url.clone();
            let body = target.body.clone();
            let method = target.method;
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let res = match method {
                    "POST" => {
                        let mut req = client.post(&url);
                        if let Some(b) = body {
                            req = req.json(&b);
                        }
                        req.send().await
                    },
                    _ => client.get(&url).send().await,
                };
                let latency = req_start.elapsed();

                let success = match res {
                    Ok(r) => r.status().is_success(),
                    Err(_) => false,
                };

                let _ = tx.send((latency, success)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).expect("valid histogram precision");
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        let _ = histogram.record(latency.as_micros() as u64);
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}%",
        rps,
        mean_ms,
        p99_ms,
        success_rate
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
}
