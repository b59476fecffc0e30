//! Console transport — a stdin/stdout stand-in for the real chat
//! network, used for local runs and demos. Every line typed becomes a
//! direct message from a fixed sender ID; replies print to stdout.

use aqari_core::{error::BotError, message::InboundMessage, traits::MessageTransport};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

const CONSOLE_SENDER: &str = "console@local";

pub struct ConsoleTransport;

impl ConsoleTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessageTransport for ConsoleTransport {
    fn name(&self) -> &str {
        "console"
    }

    async fn start(&self) -> Result<mpsc::Receiver<InboundMessage>, BotError> {
        let (tx, rx) = mpsc::channel(64);

        info!("console transport ready — type a message and press enter");

        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if line.trim().is_empty() {
                    continue;
                }
                let msg = InboundMessage::direct(CONSOLE_SENDER, line);
                if tx.send(msg).await.is_err() {
                    break;
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, sender_id: &str, text: &str) -> Result<(), BotError> {
        println!("→ {sender_id}\n{text}\n");
        Ok(())
    }

    async fn stop(&self) -> Result<(), BotError> {
        Ok(())
    }
}
