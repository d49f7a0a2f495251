//! ChainRail demo orchestrator
//!
//! Seeds a four-station chain, subscribes to every topic, and drives a
//! scripted trading scenario so each notification path can be watched live.

use anyhow::Result;
use colored::Colorize;
use notification_bus::{BusConfig, NotificationBus};
use station_ledger::{ChainConfig, Config, StationId, StationLedger};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use transfer_engine::{Roster, TransferEngine};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("{}", "=== ChainRail demo: 4-station chain ===".bold());

    let config = Config {
        data_path: None,
        chain: ChainConfig {
            length: 4,
            initial_qty: 100,
            initial_to_sell: 10,
            delivery_time: 2,
        },
    };

    let ledger = StationLedger::open(config)?;
    let bus = Arc::new(NotificationBus::new(BusConfig::default()));
    let engine = TransferEngine::new(ledger.clone(), bus.clone());
    let roster = Roster::new(ledger.clone(), bus.clone());

    spawn_watchers(&bus);

    // Give the watcher tasks a beat to attach
    sleep(Duration::from_millis(50)).await;

    println!("\n{}", "-- Station 1 orders 4 units (supply is ample) --".cyan());
    engine.order(StationId::new(1), 4).await?;

    println!("\n{}", "-- Station 2 orders 25 units (shortfall) --".cyan());
    engine.order(StationId::new(2), 25).await?;

    println!("\n{}", "-- Station 1 sells 6 units downstream --".cyan());
    engine.sell(StationId::new(1), 6).await?;

    println!("\n{}", "-- Station 2 buys 15 units of stock --".cyan());
    let adjustment = engine.adjust_stock(StationId::new(2), 15).await?;
    println!("   engine says: {}", adjustment.message.green());

    println!("\n{}", "-- Participant claims station 1, twice --".cyan());
    let first = roster.claim(StationId::new(1)).await?;
    let second = roster.claim(StationId::new(1)).await?;
    println!(
        "   first claim: {}   second claim: {}",
        first.to_string().green(),
        second.to_string().red()
    );

    sleep(Duration::from_millis(100)).await;

    println!("\n{}", "=== Final chain state ===".bold());
    for station in engine.resources().await? {
        println!(
            "   station {}  toBuy={:<4} toSell={:<4} qty={}",
            station.position, station.to_buy, station.to_sell, station.qty
        );
    }

    ledger.shutdown().await?;
    Ok(())
}

fn spawn_watchers(bus: &Arc<NotificationBus>) {
    let mut available = bus.subscribe_available();
    tokio::spawn(async move {
        while let Ok(event) = available.recv().await {
            println!(
                "   {} {} stations",
                "[snapshot]".yellow(),
                event.payload.len()
            );
        }
    });

    let mut bought = bus.subscribe_bought();
    tokio::spawn(async move {
        while let Ok(event) = bought.recv().await {
            for notice in event.payload {
                println!(
                    "   {} station {} received {} (delivery {})",
                    "[bought]".green(),
                    notice.position,
                    notice.qty,
                    notice.delivery_time
                );
            }
        }
    });

    let mut sold = bus.subscribe_sold();
    tokio::spawn(async move {
        while let Ok(event) = sold.recv().await {
            for notice in event.payload {
                println!(
                    "   {} station {} shipped {}",
                    "[sold]".magenta(),
                    notice.position,
                    notice.qty
                );
            }
        }
    });

    let mut users = bus.subscribe_users_changed();
    tokio::spawn(async move {
        while let Ok(event) = users.recv().await {
            let taken: Vec<String> = event
                .payload
                .iter()
                .filter(|r| r.taken)
                .map(|r| r.id.to_string())
                .collect();
            println!("   {} taken stations: [{}]", "[users]".blue(), taken.join(", "));
        }
    });
}
