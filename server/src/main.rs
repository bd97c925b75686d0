mod commentary;
mod game_loop;
mod relay;
mod web_server;
mod ws_handler;

use clap::Parser;

use common::game::SessionRng;
use common::{log, logger, GameConfig};

use commentary::NoCommentary;
use game_loop::{GameLoop, LoopCommand, LoopHandle};
use relay::{EventPolicy, RelayConnector, RelayEffect};
use web_server::{run_web_server, WebServerState};

#[derive(Parser)]
#[command(name = "auto_snake_server")]
struct Args {
    /// YAML config file; defaults apply when omitted.
    #[arg(long)]
    config: Option<String>,

    #[arg(long, default_value_t = 4000)]
    port: u16,

    /// Fixed RNG seed for a reproducible round.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Host".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config = GameConfig::load(args.config.as_deref())?;

    let rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    log!(
        "starting autonomous snake: {0}x{0} grid, {1}ms base tick, seed {2}",
        config.grid_size,
        config.tick_interval_ms,
        rng.seed()
    );

    let (command_tx, command_rx) = tokio::sync::mpsc::channel(64);
    let game = LoopHandle::new(command_tx);
    let (game_loop, snapshots) = GameLoop::new(config, rng, Box::new(NoCommentary));
    tokio::spawn(game_loop.run(command_rx));

    let (connector, mut events) = RelayConnector::new();
    connector.connect();

    // Relay pump: canonical events through the policy, effects to the loop.
    let policy_game = game.clone();
    tokio::spawn(async move {
        let mut policy = EventPolicy::default();
        while let Some(event) = events.recv().await {
            for effect in policy.apply(&event) {
                let command = match effect {
                    RelayEffect::SpawnObstacles(count) => LoopCommand::SpawnObstacles(count),
                    RelayEffect::SpeedBoost { factor, duration } => {
                        LoopCommand::SpeedBoost { factor, duration }
                    }
                };
                policy_game.send(command).await;
            }
        }
    });

    let web_state = WebServerState {
        connector: connector.clone(),
        game,
        snapshots,
    };
    tokio::spawn(run_web_server(web_state, args.port));

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for Ctrl+C");

    log!("shutdown signal received");
    connector.disconnect();

    Ok(())
}
