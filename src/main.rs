use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use reqwest::{Method, Request, Url};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use throttler::{Rate, ThrottleError, Throttler};

/// Demo: fire a batch of GET requests through the throttler and watch them
/// drain at the configured pace.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of requests to queue in parallel
    #[arg(long, default_value = "10")]
    num_requests: usize,

    /// Capacity of the request queue
    #[arg(long, default_value = "10")]
    queue_capacity: usize,

    /// Maximal number of calls per second
    #[arg(long, default_value = "2")]
    max_calls_per_second: i64,

    /// Extra time to wait between two consecutive calls (in milliseconds)
    #[arg(long, default_value = "50")]
    guard_time_ms: u64,

    /// Per-request timeout (in milliseconds)
    #[arg(long, default_value = "10000")]
    request_timeout_ms: u64,

    /// Global timeout for sending all the requests (in milliseconds)
    #[arg(long, default_value = "30000")]
    global_timeout_ms: u64,

    /// Log every request admission
    #[arg(long)]
    verbose: bool,

    /// URL to request
    #[arg(long, default_value = "https://example.com/")]
    url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("throttler=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let started = Instant::now();

    let guard_time = Duration::from_millis(args.guard_time_ms);
    let request_timeout = Duration::from_millis(args.request_timeout_ms);
    let global_timeout = Duration::from_millis(args.global_timeout_ms);
    let url: Url = args.url.parse()?;

    let rate = Rate::by_calls_per_second(args.max_calls_per_second, guard_time)?;
    let client = reqwest::Client::builder().timeout(global_timeout).build()?;
    let mut throttler = Throttler::new(
        rate,
        args.queue_capacity,
        args.verbose,
        Some(Arc::new(client)),
    )?;
    throttler.start();
    let throttler = Arc::new(throttler);

    println!(
        "{} request(s) pending to be processed at a rate of one call per {:?}",
        args.num_requests,
        throttler.rate()
    );

    let ctx = CancellationToken::new();
    let (results_tx, mut results_rx) =
        mpsc::channel::<(String, Result<reqwest::Response, ThrottleError>)>(
            args.num_requests.max(1),
        );

    for i in 0..args.num_requests {
        let throttler = Arc::clone(&throttler);
        let ctx = ctx.clone();
        let results_tx = results_tx.clone();
        let request = Request::new(Method::GET, url.clone());
        tokio::spawn(async move {
            let name = format!("Task {i}");
            let result = throttler.queue(&ctx, &name, request, request_timeout).await;
            let _ = results_tx.send((name, result)).await;
        });
    }
    drop(results_tx);

    let deadline = tokio::time::sleep(global_timeout);
    tokio::pin!(deadline);

    let mut received = 0;
    while received < args.num_requests {
        tokio::select! {
            _ = &mut deadline => {
                println!("timed out after {received}/{} responses", args.num_requests);
                ctx.cancel();
                break;
            }
            next = results_rx.recv() => {
                let Some((name, result)) = next else { break };
                received += 1;
                match result {
                    Ok(response) => {
                        println!("[{:?}] {name}: {}", started.elapsed(), response.status())
                    }
                    Err(err) => println!("[{:?}] {name}: error: {err}", started.elapsed()),
                }
            }
        }
    }

    println!("Elapsed time: {:?}", started.elapsed());
    Ok(())
}
