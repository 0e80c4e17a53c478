use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use apocalypse_bot::commands::{CommandContext, CommandDispatcher};
use apocalypse_bot::core::{Config, GatewayControl, GatewayPhase};
use apocalypse_bot::features::{
    AssetLibrary, BroadcastScheduler, CipherEngine, CipherKey, IdentityShifter, MessageCatalog,
    NightLog, StateStore, TriggerDetector,
};
use apocalypse_bot::transport::{ChatTransport, SerenityTransport};

/// The broadcast loop is started on the first READY only, not on reconnects
static SCHEDULER_STARTED: AtomicBool = AtomicBool::new(false);

#[derive(Clone)]
struct Handler {
    detector: Arc<TriggerDetector>,
    dispatcher: Arc<CommandDispatcher>,
    scheduler: Arc<BroadcastScheduler>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.id == ctx.cache.current_user_id() {
            return;
        }

        let is_command = self.dispatcher.is_command(&msg.content);
        let inbound = SerenityTransport::to_inbound(&ctx, &msg, is_command).await;
        self.detector.inspect(&inbound).await;

        if let Err(e) = self.dispatcher.dispatch(&inbound).await {
            error!("Error handling command message: {e}");
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());

        if !SCHEDULER_STARTED.swap(true, Ordering::SeqCst) {
            let scheduler = Arc::clone(&self.scheduler);
            tokio::spawn(async move {
                scheduler.run().await;
            });
        } else {
            info!("🔁 Gateway resumed; broadcast loop already running");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
            error!("❌ Fatal configuration error: {e}");
            return Err(e);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting apocalypse broadcaster...");

    let state = Arc::new(StateStore::open(&config.state_path));
    let catalog = Arc::new(MessageCatalog::load(&config.messages_path));
    info!("📄 Catalog loaded with {} templates", catalog.templates().len());
    let cipher = Arc::new(CipherEngine::new(CipherKey::load_or_generate(
        &config.cipher_key_path,
    )));
    let assets = AssetLibrary::new(&config.assets_dir);
    info!(
        "🖼️ Assets loaded: {:?}",
        assets
            .list()
            .iter()
            .map(|p| apocalypse_bot::features::assets::file_name(p).to_string())
            .collect::<Vec<_>>()
    );

    let gateway = GatewayControl::new();
    let http = Arc::new(Http::new(&config.discord_token));
    let transport: Arc<dyn ChatTransport> =
        Arc::new(SerenityTransport::new(http, gateway.clone()));
    let identity = IdentityShifter::new(transport.clone(), assets.clone());

    let detector = TriggerDetector::new(
        state.clone(),
        cipher.clone(),
        identity.clone(),
        transport.clone(),
        NightLog::new(&config.night_log_path),
    );
    let dispatcher = CommandDispatcher::new(
        config.command_prefix.clone(),
        CommandContext::new(
            state.clone(),
            cipher.clone(),
            catalog.clone(),
            assets.clone(),
            identity,
            transport.clone(),
        ),
    );
    let scheduler = BroadcastScheduler::new(
        state,
        catalog,
        cipher,
        assets,
        transport,
        config.channel_id,
    );

    let handler = Handler {
        detector: Arc::new(detector),
        dispatcher: Arc::new(dispatcher),
        scheduler: Arc::new(scheduler),
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    loop {
        let mut client = Client::builder(&config.discord_token, intents)
            .event_handler(handler.clone())
            .await
            .map_err(|e| {
                error!("Failed to create Discord client: {e}");
                anyhow::anyhow!("Client creation failed: {}", e)
            })?;
        gateway.attach(client.shard_manager.clone()).await;

        info!("Establishing WebSocket connection to Discord gateway...");
        let result = client.start().await;
        drop(client);

        if matches!(
            gateway.phase(),
            GatewayPhase::Blackout | GatewayPhase::Reconnecting
        ) {
            info!("🌑 Gateway closed for blackout; waiting to reconnect");
            gateway.wait_until_resumable().await;
            continue;
        }

        match result {
            Ok(()) => {
                warn!("Gateway connection ended");
                return Ok(());
            }
            Err(why) => {
                error!("Gateway connection failed: {why:?}");
                return Err(anyhow::anyhow!(
                    "Failed to establish gateway connection: {}",
                    why
                ));
            }
        }
    }
}
