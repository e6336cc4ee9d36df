use clap::Parser;
use tradedesk::application::csv_export::export_file_name;
use tradedesk::application::query_builder::FilterState;
use tradedesk::application::staged_script::parse_script;
use tradedesk::cli::commands::{Cli, Commands, FilterArgs};
use tradedesk::config::AppConfig;
use tradedesk::domain::entities::trade::TradeInput;
use tradedesk::logging::init_logging;
use tradedesk::TradeDesk;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    init_logging(&config.log_level, config.log_dir.as_deref());

    let desk = match TradeDesk::new(&config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error initializing tradedesk: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(desk, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = AppConfig::from_env()?;
    if let Some(store) = &cli.store {
        config.store = store.parse()?;
    }
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(url) = &cli.url {
        config.base_url = url.clone();
    }
    Ok(config)
}

async fn run_command(desk: TradeDesk, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::List {
            filter,
            page,
            page_size,
        } => {
            let state = FilterState {
                page,
                page_size: Some(page_size),
                ..to_filter_state(&filter)?
            };
            let result = desk.list(&state).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Get { id } => {
            let trade = desk.get(&id).await?;
            println!("{}", serde_json::to_string_pretty(&trade)?);
        }
        Commands::Add { json } => {
            let trade = desk.add(TradeInput::from_json(&json)?).await?;
            println!("{}", serde_json::to_string_pretty(&trade)?);
        }
        Commands::Update { id, json } => {
            let trade = desk.update(&id, TradeInput::from_json(&json)?).await?;
            println!("{}", serde_json::to_string_pretty(&trade)?);
        }
        Commands::Delete { id } => {
            desk.delete(&id).await?;
            println!("Trade {id} deleted");
        }
        Commands::Export { filter, output } => {
            let editor = desk.editor(to_filter_state(&filter)?).await?;
            let csv = editor.export_csv()?;
            let path = output
                .unwrap_or_else(|| export_file_name(chrono::Local::now().naive_local()));
            std::fs::write(&path, csv.as_bytes())?;
            println!("Exported {} trades to {path}", editor.rows().len());
        }
        Commands::Apply { json } => {
            let actions = parse_script(&json)?;
            let today = chrono::Local::now().date_naive();
            let report = desk.apply(&actions, today).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Seed => {
            let trades = desk.seed().await?;
            println!("Seeded {} trades", trades.len());
        }
        Commands::Serve { addr } => {
            let addr: std::net::SocketAddr = addr.parse()?;
            tradedesk::infrastructure::http::server::serve(desk.store(), addr).await?;
        }
    }
    Ok(())
}

fn to_filter_state(args: &FilterArgs) -> Result<FilterState, String> {
    Ok(FilterState {
        q: args.q.clone(),
        status: args.status.clone(),
        from: parse_date(&args.from)?,
        to: parse_date(&args.to)?,
        ..Default::default()
    })
}

fn parse_date(s: &Option<String>) -> Result<Option<chrono::NaiveDate>, String> {
    match s {
        None => Ok(None),
        Some(s) => chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("Invalid date format: {s}. Use YYYY-MM-DD")),
    }
}
