//! Terminal chat (`sbot chat`).
//!
//! Drives the [`ChatWidget`] state machine from stdin. The panel is opened
//! on start; `/quit` or end of input closes it. Suggested questions are
//! listed while the conversation is empty and can be picked by number.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::assistant::Assistant;
use crate::client::HttpTransport;
use crate::config::Config;
use crate::widget::{ChatMessage, ChatTransport, ChatWidget, LocalTransport, WELCOME_TEXT};

pub async fn run_chat(config: &Config, url: Option<String>, local: bool) -> Result<()> {
    let transport: Box<dyn ChatTransport> = if local {
        Box::new(LocalTransport::new(Arc::new(Assistant::from_config(config))))
    } else {
        let base = url.unwrap_or_else(|| format!("http://{}", config.server.bind));
        let transport = HttpTransport::new(&base);
        println!("Connected to {}", transport.endpoint());
        Box::new(transport)
    };

    let mut widget = ChatWidget::new();
    widget.toggle();

    println!("bot: {}", WELCOME_TEXT);
    print_suggestions(&widget);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while widget.is_open() {
        print!("you: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line == "/quit" {
            break;
        }

        let text = match line.parse::<usize>() {
            Ok(n) if n >= 1 && n <= widget.suggestions().len() => {
                widget.suggestions()[n - 1].to_string()
            }
            _ => line.to_string(),
        };

        if let Some(reply) = widget.send(transport.as_ref(), &text).await {
            print_reply(reply);
        }
    }

    widget.toggle();
    Ok(())
}

fn print_suggestions(widget: &ChatWidget) {
    let suggestions = widget.suggestions();
    if suggestions.is_empty() {
        return;
    }
    println!("Suggested questions:");
    for (i, q) in suggestions.iter().enumerate() {
        println!("  {}. {}", i + 1, q);
    }
}

fn print_reply(message: &ChatMessage) {
    println!("bot [{}]: {}", message.time_label(), message.text);
    if message.shows_escalation_form() {
        println!(
            "     (contact form: POST /api/contact with name, email and message; \
             we reply within one business day)"
        );
    }
}
