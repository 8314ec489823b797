//! Terminal demo: create a room, join it, and watch the session sync.
//!
//! ```text
//! word-duel [server-url] [player-name]
//! ```
//!
//! Connects to the server (default `http://localhost:3001`), creates a
//! room over REST, joins it as `player-name` (default "Alice"), toggles
//! ready, and prints the session state every time the store's revision
//! moves. A second instance pointed at the printed room id (joining via
//! the lobby) completes the pair.

use std::env;

use tracing_subscriber::EnvFilter;

use cipherlink::{ClientConfig, ClientError, DuelClient, GameStatus};

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = env::args().skip(1);
    let server_url = args
        .next()
        .unwrap_or_else(|| "http://localhost:3001".to_owned());
    let player_name = args.next().unwrap_or_else(|| "Alice".to_owned());

    let client = DuelClient::new(ClientConfig::new(server_url));

    client.health().await?;
    tracing::info!("server is up");

    client.connect().await?;
    let room_id = client.create_and_join(&player_name).await?;
    println!("joined {room_id} as {player_name}");

    client.set_ready(true).await?;

    let mut revisions = client.subscribe().await;
    loop {
        if revisions.changed().await.is_err() {
            break;
        }

        let store = client.store();
        let store = store.lock().await;
        let game = store.game();
        println!(
            "[rev {}] status={} round={} score={} turn={}",
            store.revision(),
            game.status,
            game.round,
            game.score,
            game.turn
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_owned()),
        );
        if let Some(turn) = store.conversation().last() {
            println!("  last: [{}] {}", turn.kind, turn.content);
        }
        if let Some(error) = store.connection().error.as_deref() {
            println!("  connection: {error}");
        }

        if game.status == GameStatus::Ended {
            println!("game over, final score {}", game.score);
            break;
        }
    }

    client.disconnect().await;
    Ok(())
}
