use chrono::{Duration as ChronoDuration, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::Client;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

const DURATION_SECS: u64 = 20;
const BASE_URL: &str = "http://localhost:8000";

struct Target {
    name: &'static str,
    method: &'static str,
    url: String,
    body: Option<serde_json::Value>,
}

#[tokio::main]
async fn main() {
    println!("{}", "🚀 Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", BASE_URL);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .cookie_store(true)
        .build()
        .unwrap();

    if client.get(format!("{}/health", BASE_URL)).send().await.is_err() {
        eprintln!("{}", "❌ Server is NOT reachable at localhost:8000. Please start it first.".red().bold());
        return;
    }

    println!("\n{}", "⚙️  Setting up benchmark data...".yellow());
    let (organizer_username, organizer_password) = setup_organizer(&client).await;
    let event_id = setup_event(&client, &organizer_username, &organizer_password).await;
    approve_event(&client, &event_id).await;

    println!("{}", "✅ Data created successfully.".green());
    println!("   Organizer: {}", organizer_username);
    println!("   Event ID:  {}", event_id);

    let targets = vec![
        Target {
            name: "Health Check (Public)",
            method: "GET",
            url: format!("{}/health", BASE_URL),
            body: None,
        },
        Target {
            name: "List Approved Events (Public Read)",
            method: "GET",
            url: format!("{}/api/v1/events", BASE_URL),
            body: None,
        },
        Target {
            name: "Get Event Details (Public Read)",
            method: "GET",
            url: format!("{}/api/v1/events/{}", BASE_URL, event_id),
            body: None,
        },
        Target {
            name: "Login Flow (Crypto Intensive)",
            method: "POST",
            url: format!("{}/api/v1/auth/login", BASE_URL),
            body: Some(json!({
                "username": organizer_username,
                "password": organizer_password
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

async fn setup_organizer(client: &Client) -> (String, String) {
    let username = format!("bench-organizer-{}", Uuid::new_v4());
    let password = Uuid::new_v4().to_string();

    let res = client.post(format!("{}/api/v1/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "password": password,
            "display_name": "Benchmark Organizer",
            "role": "ORGANIZER"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    if !res.status().is_success() {
        panic!("Failed to register organizer: status {}", res.status());
    }

    (username, password)
}

async fn login(client: &Client, username: &str, password: &str) -> String {
    let res = client.post(format!("{}/api/v1/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Login failed during setup");

    if !res.status().is_success() {
        panic!("Login failed. Status: {}", res.status());
    }

    let body: Value = res.json().await.unwrap();
    body["csrf_token"].as_str().expect("No csrf_token in login response").to_string()
}

async fn setup_event(client: &Client, username: &str, password: &str) -> String {
    let csrf_token = login(client, username, password).await;

    let event_payload = json!({
        "title": "Benchmark Tech Fest",
        "description": "Load testing",
        "category": "TECH",
        "venue": "Server Room",
        "starts_at": (Utc::now() + ChronoDuration::days(7)).to_rfc3339(),
        "ends_at": (Utc::now() + ChronoDuration::days(7) + ChronoDuration::hours(4)).to_rfc3339(),
        "capacity": 500,
        "price_cents": 1500
    });

    let res = client.post(format!("{}/api/v1/events", BASE_URL))
        .header("X-CSRF-Token", csrf_token)
        .json(&event_payload)
        .send()
        .await
        .expect("Failed to create event");

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Failed to create event data. Status: {}. Body: {}", status, txt);
    }

    let body: Value = res.json().await.unwrap();
    body["id"].as_str().expect("No event id").to_string()
}

async fn approve_event(client: &Client, event_id: &str) {
    let admin_username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let admin_password = std::env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD must be set to approve the benchmark event");

    let csrf_token = login(client, &admin_username, &admin_password).await;

    let res = client.post(format!("{}/api/v1/admin/events/{}/approve", BASE_URL, event_id))
        .header("X-CSRF-Token", csrf_token)
        .send()
        .await
        .expect("Failed to approve event");

    if !res.status().is_success() {
        panic!("Failed to approve benchmark event: status {}", res.status());
    }
}

async fn run_stage(client: &Client, target: &Target, rps: u32) {
    let limiter = Arc::new(RateLimiter::direct(
        Quota::per_second(NonZeroU32::new(rps).unwrap())
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
                    "GET" => client.get(&url).send().await,
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

    let mut histogram = Histogram::<u64>::new(3).unwrap();
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        histogram.record(latency.as_micros() as u64).unwrap();
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
