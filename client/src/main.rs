use clap::Parser;
use client::cli::{Action, Args};
use client::display::{describe, describe_state};
use client::network::{ClientError, Connection};
use log::{info, warn};
use shared::{ClientMessage, ServerMessage};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let wait = Duration::from_millis(args.timeout_ms);

    let mut connection = Connection::connect(&args.server).await?;
    let state = connection.handshake(wait).await?;

    match args.action.to_message() {
        None => {
            println!("{}", describe_state(&state));
            watch(&mut connection, args.name).await?;
        }
        Some(ClientMessage::SessionSync) => println!("{}", describe_state(&state)),
        Some(message) => {
            let replies = connection.request(&message, wait).await?;
            let rejected = replies
                .iter()
                .any(|event| matches!(event, ServerMessage::Error { .. }));

            for event in &replies {
                println!("{}", describe(event));
            }
            if rejected {
                std::process::exit(1);
            }
        }
    }

    if args.action != Action::Watch {
        connection.close().await?;
    }
    Ok(())
}

async fn watch(connection: &mut Connection, name: Option<String>) -> Result<(), ClientError> {
    connection.send(&ClientMessage::join(name)).await?;
    info!("Watching for events, Ctrl+C to stop");

    loop {
        tokio::select! {
            event = connection.recv() => match event? {
                Some(event) => println!("{}", describe(&event)),
                None => {
                    warn!("Server closed the connection");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
