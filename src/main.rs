use anyhow::Context;
use tracing_subscriber::EnvFilter;
use venuelink::core::kernel::{WsCodec, WsCommand, WsSession};
use venuelink::exchanges::{coinex, gate};
use venuelink::{MarketDataSource, Venue};

const MAX_EVENTS: usize = 5;

/// Usage: `venuelink [coinex|gate] [PAIR]`
///
/// Credentials and endpoint overrides are read from `COINEX_*` / `GATE_*`
/// environment variables (or a `.env` file); without them the demo is read-only.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    #[cfg(feature = "env-file")]
    let _ = dotenv::dotenv();

    let mut args = std::env::args().skip(1);
    let venue: Venue = args.next().as_deref().unwrap_or("coinex").parse()?;

    match venue {
        Venue::Coinex => {
            let pair = args.next().unwrap_or_else(|| "BTCUSDT".to_string());
            let connector = coinex::build_connector_from_env()?;
            print_snapshot(&connector, &pair).await?;

            let session = connector.stream_session();
            let command = session.codec().depth_subscription(&[pair.as_str()], 10, "0", false);
            stream(&session, &command).await?;
        }
        Venue::Gate => {
            let pair = args.next().unwrap_or_else(|| "BTC_USDT".to_string());
            let connector = gate::build_connector_from_env()?;
            print_snapshot(&connector, &pair).await?;

            let session = connector.stream_session();
            let command = session.codec().order_book_update_subscription(&pair, "100ms");
            stream(&session, &command).await?;
        }
    }

    Ok(())
}

async fn print_snapshot<M>(connector: &M, pair: &str) -> anyhow::Result<()>
where
    M: MarketDataSource + Sync,
{
    let book = connector
        .get_order_book(pair, 10)
        .await
        .with_context(|| format!("fetching order book for {}", pair))?;
    println!(
        "{}: {} bids / {} asks, best bid {:?}, best ask {:?}",
        book.pair,
        book.bids.len(),
        book.asks.len(),
        book.bids.first().map(|level| level.price.to_string()),
        book.asks.first().map(|level| level.price.to_string()),
    );
    Ok(())
}

async fn stream<C>(
    session: &WsSession<C>,
    command: &WsCommand,
) -> anyhow::Result<()>
where
    C: WsCodec,
    C::Message: std::fmt::Debug,
{
    let mut events = session.connect().await.context("opening stream")?;
    session.send_command(command).await?;

    let mut seen = 0;
    while let Some(event) = events.recv().await {
        match event {
            Ok(event) => {
                println!("{:?}", event);
                seen += 1;
                if seen == MAX_EVENTS {
                    break;
                }
            }
            Err(e) => {
                eprintln!("stream failed: {}", e);
                break;
            }
        }
    }

    session.close().await?;
    Ok(())
}
