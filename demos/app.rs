//! Print every event of a Yammer feed.
//!
//! `OAUTH_TOKEN=... FEED_CONFIG='{"type": "topic", "topic": "123"}' cargo run --example app`
//!
//! Set `MOCK_DELAY_MS` to use the mock source with `demos/data/mock.json` instead.

use std::time::Duration;

use futures_util::StreamExt;
use yammer_push::{
    realtime::{Client, Event},
    Config, MockSource, PushSource,
};

async fn print_events<S: PushSource>(source: S) {
    let mut events = source.start();

    while let Some(event) = events.next().await {
        match event {
            Event::Data(data) => println!("new data received: {}", data.as_value()),
            Event::Error(data) => println!("error received: {}", data.as_value()),
            Event::Fatal(err) => println!("fatal error received: {}", err),
        }
    }
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    if let Ok(delay) = std::env::var("MOCK_DELAY_MS") {
        let delay = Duration::from_millis(delay.parse().unwrap_or(1000));
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/data/mock.json");
        let mock = MockSource::from_file(path, delay).unwrap();

        print_events(mock).await;
        return;
    }

    let token = std::env::var("OAUTH_TOKEN")
        .map_err(|_| {
            println!("No OAUTH_TOKEN env var or invalid");
            std::process::exit(1);
        })
        .unwrap();

    let config = std::env::var("FEED_CONFIG")
        .ok()
        .map(|c| Config::from_json(&c).unwrap())
        .unwrap_or_default();

    let client = Client::new(&token, config).unwrap();

    print_events(client).await;
}
