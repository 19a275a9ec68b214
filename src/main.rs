use clap::Parser;
use std::io::Write;
use stonewalker::core::command::Command;
use stonewalker::core::map::MapStatus;
use stonewalker::core::readiness::PollPolicy;
use stonewalker::domain::ports::{ConfigProvider, SearchBackend};
use stonewalker::render;
use stonewalker::utils::logger;
use stonewalker::{ApiClient, ChatSession, CliConfig, Settings, StonewalkerError};
use tokio::io::{AsyncBufReadExt, BufReader};

fn exit_code(e: &StonewalkerError) -> i32 {
    e.severity().exit_code()
}

fn report(e: &StonewalkerError) {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

fn prompt() {
    print!("stonewalker> ");
    let _ = std::io::stdout().flush();
}

fn static_map_url(session: &ChatSession, settings: &Settings) -> Option<url::Url> {
    let key = settings.maps_api_key()?;
    match session.map_view().static_map_url(key) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    }
}

fn print_map(session: &ChatSession, settings: &Settings) {
    let url = static_map_url(session, settings);
    println!(
        "{}",
        render::render_map(&session.map_view(), session.map_status(), url.as_ref())
    );
}

async fn ask(session: &mut ChatSession, client: &ApiClient, query: &str) {
    println!("… {}", render::LOADING_LINE);

    let reply = match session.send_message(client, query).await {
        Ok(reply) => reply.cloned(),
        Err(e) => {
            report(&e);
            return;
        }
    };

    if let Some(reply) = reply {
        let offset = session.all_places().len() - reply.places.len();
        println!("{}", render::render_message(&reply, session.selected_place_id(), offset));
        if session.debug_mode() {
            println!("{}", render::render_debug_panel(session.current_debug()));
        }
    }
}

/// 回傳 false 代表結束
async fn handle(
    command: Command,
    session: &mut ChatSession,
    client: &ApiClient,
    settings: &Settings,
) -> bool {
    match command {
        Command::Quit => return false,
        Command::Query(query) => {
            if !query.is_empty() {
                ask(session, client, &query).await;
            }
        }
        Command::Help => println!("{}", render::help_text()),
        Command::Debug => {
            if session.toggle_debug() {
                println!("{}", render::render_debug_panel(session.current_debug()));
            } else {
                println!("Debug panel closed.");
            }
        }
        Command::Places => {
            println!(
                "{}",
                render::render_places(&session.all_places(), session.selected_place_id())
            );
        }
        Command::Select(index) => match session.select_place_by_index(index) {
            Some(place) => {
                println!("{}", render::render_place_card(place, index, true));
                print_map(session, settings);
            }
            None => println!("No location #{}. Use /places to list them.", index),
        },
        Command::Map => print_map(session, settings),
        Command::Center { lat, lng, zoom } => {
            let zoom = zoom.unwrap_or(session.viewport().zoom);
            session.set_viewport((lat, lng), zoom);
            print_map(session, settings);
        }
        Command::Health => match client.health().await {
            Ok(health) => println!("{}", render::render_health(&health)),
            Err(e) => report(&e),
        },
        Command::Stream(query) => {
            let result = client
                .stream_events(&query, |event| println!("⇢ {}", event))
                .await;
            match result {
                Ok(count) => println!("Stream closed after {} event(s).", count),
                Err(e) => report(&e),
            }
        }
        Command::Invalid(reason) => println!("{}", reason),
    }
    true
}

async fn one_shot(
    session: &mut ChatSession,
    client: &ApiClient,
    query: &str,
    as_json: bool,
) -> Result<i32, StonewalkerError> {
    let Some(pending) = session.submit(query)? else {
        eprintln!("❌ Query is empty");
        return Ok(1);
    };

    let outcome = client.search(pending.query(), session.force()).await;
    let code = outcome.as_ref().err().map(exit_code).unwrap_or(0);
    let reply = session.resolve(pending, outcome).clone();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("{}", render::render_message(&reply, session.selected_place_id(), 0));
        if session.debug_mode() {
            println!("{}", render::render_debug_panel(session.current_debug()));
        }
    }
    Ok(code)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::info!("Starting stonewalker CLI");

    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            report(&e);
            std::process::exit(exit_code(&e));
        }
    };
    tracing::debug!(
        "Backend {} (timeout {}s, force {}, maps key {})",
        settings.api_base(),
        settings.timeout_seconds,
        settings.force_refresh(),
        if settings.maps_api_key().is_some() { "set" } else { "unset" }
    );

    let client = ApiClient::from_config(&settings)?;
    let mut session = ChatSession::new(settings.viewport)
        .with_force(settings.force_refresh())
        .with_debug_mode(settings.debug);

    if let Some(query) = cli.query.as_deref() {
        session.set_map_status(MapStatus::Ready);
        let code = match one_shot(&mut session, &client, query, cli.json).await {
            Ok(code) => code,
            Err(e) => {
                report(&e);
                exit_code(&e).max(1)
            }
        };
        std::process::exit(code);
    }

    println!("{}", render::welcome_banner());

    if cli.wait_for_backend {
        match session.wait_for_backend(&client, PollPolicy::default()).await {
            Ok(elapsed) => tracing::info!("✅ Backend ready after {:?}", elapsed),
            Err(e) => eprintln!("⚠️  {}; the map will stay in loading state", e),
        }
    } else {
        session.set_map_status(MapStatus::Ready);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt();
    while let Some(line) = lines.next_line().await? {
        if !handle(Command::parse(&line), &mut session, &client, &settings).await {
            break;
        }
        prompt();
    }

    println!("Farewell, traveller.");
    Ok(())
}
