mod app;

use app::NoteDexApp;
use notedex::{AppConfig, DeckStore, SqliteStorage};

fn main() -> eframe::Result<()> {
    init_logging();

    let config = AppConfig::load().expect("Failed to load configuration");
    let storage = SqliteStorage::open(&config.database_path).expect("Failed to open deck storage");
    let mut store = DeckStore::new(storage);

    let decks = store.list_decks().expect("Failed to load decks");
    tracing::info!(
        decks = decks.len(),
        path = %config.database_path.display(),
        "loaded decks"
    );
    for deck in &decks {
        tracing::info!("  - {} ({} cards)", deck.name, deck.cards.len());
    }

    let study_config = config.study.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(config.window_size),
        ..Default::default()
    };
    eframe::run_native(
        "NoteDex",
        options,
        Box::new(move |_cc| Ok(Box::new(NoteDexApp::new(store, study_config)))),
    )
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,notedex=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
