use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use startpage_weather::{Config, DisplayBlock, fetch_weather, provider_from_config};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "startpage", version, about = "Daily start page weather blocks")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the default city and request timeout.
    Configure,

    /// Show the weather blocks for a city.
    Show {
        /// City name; falls back to $CITY, then the configured city.
        #[arg(env = "CITY")]
        city: Option<String>,

        /// Print the blocks as publisher JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, json } => show(city, json).await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let current_city = cfg.city.clone().unwrap_or_default();
    let city = Text::new("Default city:")
        .with_default(&current_city)
        .prompt()
        .context("Failed to read city")?;

    let timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(cfg.open_meteo.timeout_secs)
        .prompt()
        .context("Failed to read timeout")?;

    let city = city.trim();
    cfg.city = (!city.is_empty()).then(|| city.to_string());
    cfg.open_meteo.timeout_secs = timeout_secs;

    let path = cfg.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(city: Option<String>, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let city = cfg.resolve_city(city)?;
    let provider = provider_from_config(&cfg)?;

    let blocks = fetch_weather(provider.as_ref(), &city)
        .await
        .with_context(|| format!("Could not fetch weather for {city}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&blocks)?);
    } else {
        print!("{}", render_text(&blocks));
    }

    Ok(())
}

fn render_text(blocks: &[DisplayBlock]) -> String {
    blocks
        .iter()
        .map(|block| format!("{}\n", block.text()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_show_with_city_and_json() {
        let cli = Cli::try_parse_from(["startpage", "show", "London", "--json"]).unwrap();
        match cli.command {
            Command::Show { city, json } => {
                assert_eq!(city.as_deref(), Some("London"));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["startpage", "config-path", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::ConfigPath));
    }

    #[test]
    fn text_output_is_one_line_per_block() {
        let blocks = [
            DisplayBlock::Heading2("🌤 London".into()),
            DisplayBlock::Paragraph("2°C - 7°C".into()),
        ];
        assert_eq!(render_text(&blocks), "🌤 London\n2°C - 7°C\n");
    }
}
