use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    CookieTokenProvider, FormGate, HeadlessMap, HttpStatusSource, InMemoryFormFields, MapConfig,
    MapEvent, PollerConfig, RequestMap, RideRequestClient, RideRequestForm, StatusPoller,
    StatusRenderer, StaticTokenProvider, TokenProvider,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, COOKIE},
    Client,
};
use shared::domain::{Coordinate, PaymentMethod, RequestId};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::{load_settings, Settings};
use terminal::{FlagGeolocation, StderrNotifier, TerminalStatusView};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "rider.toml")]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Follow the matching status of an existing ride request.
    Poll {
        #[arg(long)]
        request_id: i64,
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Pick two points, submit a ride request and optionally follow it.
    Request {
        #[arg(long)]
        pickup: Coordinate,
        #[arg(long)]
        dropoff: Coordinate,
        #[arg(long, default_value = "")]
        pickup_address: String,
        #[arg(long, default_value = "")]
        dropoff_address: String,
        #[arg(long, default_value = "cash")]
        payment_method: PaymentMethod,
        /// Current position used to centre the map.
        #[arg(long)]
        here: Option<Coordinate>,
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    let http = build_http_client(&settings)?;

    match args.command {
        Command::Poll {
            request_id,
            interval_ms,
        } => {
            if let Some(interval_ms) = interval_ms {
                settings.poll_interval_ms = interval_ms;
            }
            follow_status(&settings, http, RequestId(request_id)).await
        }
        Command::Request {
            pickup,
            dropoff,
            pickup_address,
            dropoff_address,
            payment_method,
            here,
            watch,
        } => {
            let mut map = RequestMap::mount(
                Some(HeadlessMap::new()),
                &MapConfig::default(),
                Box::new(InMemoryFormFields::default()),
                Some(&FlagGeolocation(here)),
            )
            .ok_or_else(|| anyhow!("map widget unavailable"))?;
            map.handle_event(MapEvent::Click(pickup));
            map.handle_event(MapEvent::Click(dropoff));

            let tokens: Arc<dyn TokenProvider> = match &settings.session_cookie {
                Some(cookie) => Arc::new(CookieTokenProvider::new(
                    cookie.clone(),
                    settings.csrf_cookie_name.clone(),
                )),
                None => Arc::new(StaticTokenProvider(None)),
            };
            let client = RideRequestClient::new(http.clone(), &settings.server_url, tokens)?;
            let form = RideRequestForm {
                pickup_address,
                dropoff_address,
                payment_method,
                ..RideRequestForm::default()
            };
            let mut gate = FormGate::new(StderrNotifier);
            let request_id = client
                .submit(&mut gate, &map.selection(), form)
                .await
                .context("ride request submission failed")?;
            println!("Created ride request {request_id}");

            if watch {
                follow_status(&settings, http, request_id).await?;
            }
            Ok(())
        }
    }
}

fn build_http_client(settings: &Settings) -> Result<Client> {
    let mut headers = HeaderMap::new();
    if let Some(cookie) = &settings.session_cookie {
        headers.insert(
            COOKIE,
            HeaderValue::from_str(cookie).context("session cookie is not a valid header value")?,
        );
    }
    Client::builder()
        .default_headers(headers)
        .build()
        .context("failed to build http client")
}

async fn follow_status(settings: &Settings, http: Client, request_id: RequestId) -> Result<()> {
    let source = HttpStatusSource::new(http, &settings.server_url)?;
    let renderer = Arc::new(Mutex::new(StatusRenderer::new(TerminalStatusView::default())));
    let mut poller = StatusPoller::start(
        PollerConfig {
            interval: settings.poll_interval(),
        },
        Some(request_id),
        Arc::new(source),
        renderer,
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!(request_id = request_id.0, "shutting down status poller");
    poller.stop();
    Ok(())
}
