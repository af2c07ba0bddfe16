mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use readme_card::api::ApiClient;
use readme_card::config::{CardQuery, CardTarget, ServerConfig};
use readme_card::{FontStorage, card, server};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "readme-card",
    version,
    about = "Render mod statistics cards as PNG images."
)]
struct Cli {
    /// Path to configuration file.
    #[arg(long, global = true, default_value = "config.json")]
    config: PathBuf,

    /// Debug logging for the card renderer.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve cards over HTTP (default).
    Serve {
        /// Ignore stdin instead of waiting for a `quit` command.
        #[arg(long)]
        no_stdin: bool,
    },
    /// Render a single card to a file.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Author card for this Steam ID.
    #[arg(long, conflicts_with = "modname", required_unless_present = "modname")]
    steamid64: Option<String>,
    /// Mod card for this internal mod name.
    #[arg(long)]
    modname: Option<String>,
    /// Output PNG path.
    #[arg(long, short)]
    out: PathBuf,
    #[arg(long)]
    text_color: Option<String>,
    #[arg(long)]
    bg_color: Option<String>,
    #[arg(long)]
    border_color: Option<String>,
    #[arg(long)]
    border_width: Option<String>,
    #[arg(long)]
    corner_radius: Option<String>,
    /// `Andy` or `Sans`.
    #[arg(long)]
    font: Option<String>,
    /// Game version, `1.4` or `1.3`.
    #[arg(long)]
    game_version: Option<String>,
    #[arg(long)]
    outline: bool,
}

impl RenderArgs {
    fn query(&self) -> CardQuery {
        CardQuery {
            steamid64: self.steamid64.clone(),
            modname: self.modname.clone(),
            text_color: self.text_color.clone(),
            bg_color: self.bg_color.clone(),
            border_color: self.border_color.clone(),
            border_width: self.border_width.clone(),
            corner_radius: self.corner_radius.clone(),
            font: self.font.clone(),
            v: self.game_version.clone(),
            outline: self.outline.then(|| "true".to_string()),
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = try_main().await {
        error!(error = ?err, "readme-card exited with error");
        std::process::exit(1);
    }
}

async fn try_main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    let config = ServerConfig::load(&cli.config)?;
    info!(
        command = ?cli.command,
        config = %cli.config.display(),
        effective = %serde_json::to_string(&config)?,
        "starting readme-card"
    );

    let fonts = Arc::new(load_fonts(&config));

    match cli.command.unwrap_or(Commands::Serve { no_stdin: false }) {
        Commands::Serve { no_stdin } => server::run(config, fonts, !no_stdin).await?,
        Commands::Render(args) => render_to_file(&config, &fonts, &args).await?,
    }

    Ok(())
}

fn load_fonts(config: &ServerConfig) -> FontStorage {
    let mut fonts = FontStorage::new();
    if config.fonts_dir.is_dir() {
        fonts.load_fonts_dir(&config.fonts_dir);
    } else {
        warn!(dir = %config.fonts_dir.display(), "fonts directory not found");
    }
    if config.system_fonts {
        fonts.load_system_fonts();
    }
    if fonts.is_empty() {
        warn!("no font faces loaded; every render will fail");
    }
    fonts
}

async fn render_to_file(
    config: &ServerConfig,
    fonts: &FontStorage,
    args: &RenderArgs,
) -> Result<()> {
    let api = ApiClient::new(
        &config.api_base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let query = args.query();
    let card_config = query.card_config();

    let png = match query.target()? {
        CardTarget::Author { steam_id } => {
            let author = api.fetch_author(card_config.version, &steam_id).await?;
            card::render_author_card(&author, &card_config, fonts)?
        }
        CardTarget::Mod { name } => {
            let data = api.fetch_mod_card(card_config.version, &name).await?;
            card::render_mod_card(&data, &card_config, fonts)?
        }
    };

    write_png(&args.out, &png)?;
    info!(out = %args.out.display(), bytes = png.len(), "card written");
    Ok(())
}

fn write_png(path: &Path, png: &[u8]) -> Result<()> {
    std::fs::write(path, png).with_context(|| format!("failed to write {}", path.display()))
}
