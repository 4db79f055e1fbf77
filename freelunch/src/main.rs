#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::io::Write;

use args::Args;
use clap::Parser;
use freelunch_router::{CallOptions, ChatRequest, Menu, StreamEvent};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let menu = Menu::load_with_env(&args.config, &args.env_file)?;
    let chain = menu.capability(&args.capability)?;

    tracing::debug!(
        capability = %args.capability,
        models = chain.models().count(),
        "invoking capability"
    );

    // Ctrl-C cancels the in-flight attempt instead of killing the process
    let cancellation = CancellationToken::new();
    let cancel = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling call");
            cancel.cancel();
        }
    });

    let options = CallOptions {
        timeout: args.timeout,
        cancellation: Some(cancellation),
    };
    let request = ChatRequest::from_prompt(&args.prompt);

    if args.stream {
        let mut stream = chain.stream_with(&request, options).await?;
        let mut stdout = std::io::stdout();
        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::Delta(delta) => {
                    if let Some(content) = delta.content {
                        stdout.write_all(content.as_bytes())?;
                        stdout.flush()?;
                    }
                }
                StreamEvent::Usage(_) => {}
                StreamEvent::Done => break,
            }
        }
        stdout.write_all(b"\n")?;
    } else {
        let response = chain.invoke_with(&request, options).await?;
        tracing::debug!(model = %response.model, "response served");
        println!("{}", response.content);
    }

    Ok(())
}
