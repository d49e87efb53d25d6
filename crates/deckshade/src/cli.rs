use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "deckshade",
    author,
    version,
    about = "Card gallery that layers toggleable GPU shader effects over each card",
    arg_required_else_help = false
)]
pub struct Cli {
    /// Deck manifest (TOML). Omit to use the built-in demo deck.
    #[arg(long, value_name = "FILE")]
    pub deck: Option<PathBuf>,

    /// Initial window size (e.g. `393x852`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Render every card once at a fixed timestamp instead of animating.
    #[arg(
        long,
        value_name = "SECONDS",
        num_args = 0..=1,
        default_missing_value = "0"
    )]
    pub still: Option<f32>,

    /// Optional FPS cap while animating (0 = uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Print the resolved deck to stdout and exit without opening a window.
    #[arg(long)]
    pub list_deck: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid width in window size".to_string())?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid height in window size".to_string())?;
    if width == 0 || height == 0 {
        return Err("window size must be greater than zero".into());
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_window_sizes() {
        assert_eq!(parse_size("393x852"), Ok((393, 852)));
        assert_eq!(parse_size("1280X720"), Ok((1280, 720)));
        assert!(parse_size("393").is_err());
        assert!(parse_size("0x852").is_err());
    }

    #[test]
    fn still_flag_defaults_to_time_zero() {
        let cli = Cli::parse_from(["deckshade", "--still"]);
        assert_eq!(cli.still, Some(0.0));

        let cli = Cli::parse_from(["deckshade", "--still", "2.5"]);
        assert_eq!(cli.still, Some(2.5));

        let cli = Cli::parse_from(["deckshade"]);
        assert_eq!(cli.still, None);
    }
}
