//! Vanity Wallet Generator CLI
//!
//! Usage:
//!   vanity_wallet -p dead              # Find address starting with "dead"
//!   vanity_wallet -p BeeF -t suffix -c # Find address ending with checksum-cased "BeeF"
//!   vanity_wallet -p abc -a            # Find base58check address whose body starts with "abc"

use std::process;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_channel::RecvTimeoutError;

use vanity_wallet::worker::WorkerEvent;
use vanity_wallet::{Config, SearchMessage, WorkerPool};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::parse();

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    let pattern = config.compiled_pattern();

    if !config.json {
        println!("Vanity Wallet Generator");
        println!("=======================");
        println!(
            "Pattern:    {} ({}, {})",
            pattern.pattern(),
            pattern.pattern_type(),
            pattern.format()
        );
        println!(
            "Case:       {}",
            if pattern.case_sensitive() {
                "sensitive"
            } else {
                "insensitive"
            }
        );
        println!("Curve:      {}", config.curve);
        println!("Difficulty: {}", pattern.difficulty_description());
        println!("Workers:    {}", config.worker_count());
        println!();
    }

    let pool = WorkerPool::new(
        config.worker_count(),
        config.request(),
        config.search_config(),
    );
    let pool = match pool {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Failed to start workers: {}", e);
            process::exit(1);
        }
    };

    let stop_flag = pool.stop_flag_clone();
    if let Err(e) = ctrlc::set_handler(move || {
        stop_flag.store(true, std::sync::atomic::Ordering::Relaxed);
    }) {
        log::warn!("Could not install Ctrl-C handler: {}", e);
    }

    if !config.json {
        println!("Searching... (Press Ctrl+C to stop)\n");
    }

    let report_interval = Duration::from_secs(config.report_interval.max(1));
    let mut last_report = Instant::now();
    let mut reported_keys = 0;
    let mut exit_code = 0;

    loop {
        let wait = report_interval.saturating_sub(last_report.elapsed());
        match pool.wait_for_event(wait) {
            Ok(WorkerEvent {
                worker_id,
                message: message @ SearchMessage::Success { .. },
            }) => {
                print_message(&config, &message, worker_id);
                break;
            }
            Ok(WorkerEvent {
                worker_id,
                message: message @ SearchMessage::Failure { .. },
            }) => {
                print_message(&config, &message, worker_id);
                exit_code = 1;
                break;
            }
            Ok(_) | Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) if pool.is_stopped() => {}
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("All workers exited without a result");
                exit_code = 1;
                break;
            }
        }

        if last_report.elapsed() >= report_interval {
            let keys = pool.total_keys();
            print_progress(&config, &pool, keys - reported_keys);
            reported_keys = keys;
            last_report = Instant::now();
        }

        // Check if we should stop (ctrl-c was pressed)
        if pool.is_stopped() {
            if !config.json {
                println!("\nStopped by user.");
            }
            break;
        }
    }

    if !config.json {
        println!("\n--- Final Statistics ---");
        println!("Total keys generated: {}", format_number(pool.total_keys()));
        println!("Time elapsed:         {:.2}s", pool.elapsed().as_secs_f64());
        println!(
            "Average speed:        {}/s",
            format_number(pool.keys_per_second() as u64)
        );
    }

    pool.join();
    process::exit(exit_code);
}

fn print_message(config: &Config, message: &SearchMessage, worker_id: usize) {
    if config.json {
        match serde_json::to_string(message) {
            Ok(line) => println!("{}", line),
            Err(e) => log::error!("Could not serialize message: {}", e),
        }
        return;
    }

    match message {
        SearchMessage::Success {
            address,
            private_key,
            attempts,
        } => {
            println!("=== Match ===");
            println!("Address:     {}", address);
            println!("Private Key: {}", private_key);
            println!(
                "Worker:      {} ({} attempts since last tick)",
                worker_id, attempts
            );
        }
        SearchMessage::Failure { error } => {
            eprintln!("Search failed on worker {}: {}", worker_id, error);
        }
        SearchMessage::Progress { attempts } => {
            println!("Worker {} tried {} keys", worker_id, attempts);
        }
    }
}

fn print_progress(config: &Config, pool: &WorkerPool, new_keys: u64) {
    if config.json {
        print_message(config, &SearchMessage::Progress { attempts: new_keys }, 0);
        return;
    }

    println!(
        "[{:>4}s] Generated {} keys ({}/s)",
        pool.elapsed().as_secs(),
        format_number(pool.total_keys()),
        format_number(pool.keys_per_second() as u64)
    );
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
