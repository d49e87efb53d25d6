use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use effects::{Card, Gallery, ImageSource};
use renderer::{run_gallery, RenderPolicy, RendererConfig};

use crate::cli::Cli;
use crate::deck::{builtin_deck, DeckManifest};

const DEFAULT_WINDOW_SIZE: (u32, u32) = (393, 852);

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let deck = load_deck(cli.deck.as_deref())?;

    if cli.list_deck {
        print_deck(&deck);
        return Ok(());
    }

    let policy = match cli.still {
        Some(time) => RenderPolicy::Still { time },
        None => RenderPolicy::Animate {
            target_fps: cli.fps,
        },
    };
    let surface_size = cli.size.unwrap_or(DEFAULT_WINDOW_SIZE);

    let gallery = Gallery::new(deck, Instant::now()).context("failed to build gallery")?;
    tracing::info!(
        cards = gallery.len(),
        width = surface_size.0,
        height = surface_size.1,
        animated = policy.is_animated(),
        "starting gallery"
    );

    let config = RendererConfig {
        surface_size,
        title: "Deckshade".to_string(),
        policy,
    };
    run_gallery(config, gallery)
}

fn load_deck(path: Option<&Path>) -> Result<Vec<Card>> {
    match path {
        Some(path) => {
            let input = fs::read_to_string(path)
                .with_context(|| format!("failed to read deck manifest {}", path.display()))?;
            let manifest = DeckManifest::from_toml_str(&input)
                .with_context(|| format!("failed to load deck manifest {}", path.display()))?;
            let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
            Ok(manifest.into_cards(base_dir))
        }
        None => Ok(builtin_deck()),
    }
}

fn print_deck(deck: &[Card]) {
    for card in deck {
        let source = match &card.image {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Gradient { .. } => "gradient".to_string(),
        };
        println!(
            "{:>3}  {:<24} {:<12} {:<10} {:<16} {}",
            card.id, card.title, card.size_label, card.kind_label, card.date_label, source
        );
    }
}
