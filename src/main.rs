use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use lumina_wardrobe::{
    capture::{CaptureProvider, Facing, StillFrameCamera},
    config::Config,
    gateway::{EnvCredentials, GeminiGateway},
    share,
    wardrobe::{JsonFileStore, StyleLibrary},
    StepKind, Studio,
};

#[derive(Parser)]
#[command(
    name = "lumina",
    version,
    about = "Try on AI-generated outfits from a single photo",
    long_about = "Lumina analyzes what you are wearing in a photo, restyles the outfit with a preset or your own prompt, and can turn the result into a short fashion video."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the style catalog
    Styles {
        /// Only show favorites
        #[arg(long)]
        favorites: bool,
    },

    /// Toggle a style as favorite
    Favorite { id: String },

    /// Save a custom style to your collection
    SaveStyle {
        #[arg(long)]
        name: String,

        #[arg(long)]
        prompt: String,
    },

    /// Delete a custom style
    DeleteStyle { id: String },

    /// Print a share link for a style or a custom prompt
    Share(ShareArgs),

    /// Restyle a photo
    Run(RunArgs),
}

#[derive(Args)]
struct ShareArgs {
    /// Style id to share
    #[arg(long, conflicts_with = "prompt", required_unless_present = "prompt")]
    style: Option<String>,

    /// Custom prompt to share
    #[arg(long)]
    prompt: Option<String>,

    /// Page the link points at
    #[arg(long, default_value = share::DEFAULT_BASE_URL)]
    base: String,
}

#[derive(Args)]
struct RunArgs {
    /// Photo to use as the camera frame (PNG or JPEG)
    #[arg(short, long)]
    photo: PathBuf,

    /// Preset style id
    #[arg(short, long, conflicts_with_all = ["prompt", "link"])]
    style: Option<String>,

    /// Custom outfit prompt
    #[arg(long, conflicts_with = "link")]
    prompt: Option<String>,

    /// Shared link to take the style from
    #[arg(long)]
    link: Option<String>,

    /// Override the detected outfit description
    #[arg(short, long)]
    description: Option<String>,

    /// Blur the background
    #[arg(long)]
    blur: bool,

    /// Treat the photo as taken with the back camera (no mirroring)
    #[arg(long)]
    back_camera: bool,

    /// Also generate a short video of the result
    #[arg(long)]
    animate: bool,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!("Starting Lumina v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };
    config.validate()?;

    let store_path = config.wardrobe.resolve_path();
    debug!("Wardrobe: {:?}", store_path);
    let mut library = StyleLibrary::load(Box::new(JsonFileStore::new(&store_path)))?;

    match cli.command {
        Command::Styles { favorites } => {
            for style in library.visible_styles(favorites) {
                let marker = if library.is_favorite(&style.id) { "★" } else { " " };
                println!("{} {} {:<12} {:<16} {}", marker, style.icon, style.id, style.name, style.description);
            }
        }
        Command::Favorite { id } => {
            if !library.catalog().has_style(&id) {
                bail!("Unknown style: {}", id);
            }
            let now = library.toggle_favorite(&id)?;
            info!("{} {}", if now { "★ Added to favorites:" } else { "Removed from favorites:" }, id);
        }
        Command::SaveStyle { name, prompt } => {
            let style = library.create_custom_style(&name, &prompt)?;
            println!("{}", style.id);
        }
        Command::DeleteStyle { id } => {
            library.delete_custom_style(&id)?;
        }
        Command::Share(args) => {
            let base = share::parse_base(&args.base)?;
            let link = match (&args.style, &args.prompt) {
                (Some(id), _) => {
                    let style = library
                        .catalog()
                        .get_style(id)
                        .ok_or_else(|| anyhow!("Unknown style: {}", id))?;
                    share::style_link(&base, style)
                }
                (None, Some(prompt)) => share::custom_link(&base, prompt)?,
                (None, None) => bail!("Nothing to share"),
            };
            println!("{}", link);
        }
        Command::Run(args) => run(config, library, args).await?,
    }

    Ok(())
}

async fn run(config: Config, library: StyleLibrary, args: RunArgs) -> Result<()> {
    info!("Photo: {:?}", args.photo);
    info!("Output: {:?}", args.out);

    let credentials = Arc::new(EnvCredentials::new(&config.gateway.api_key_env).interactive(true));
    let gateway = Arc::new(GeminiGateway::new(config.gateway.clone(), credentials.clone())?);
    let studio = Studio::new(&config, library, gateway, credentials)?;

    if let Some(link) = &args.link {
        if studio.open_link(link).await == share::DeepLink::None {
            warn!("Link did not carry a usable style");
        }
    }

    // Capture and analysis
    let mut capture_config = config.capture.clone();
    if args.back_camera {
        capture_config.default_facing = Facing::Back;
    }
    let mut camera = CaptureProvider::new(Box::new(StillFrameCamera::new(&args.photo)), capture_config);

    studio.start_camera(&mut camera).await?;
    studio.capture(&mut camera).await?;

    {
        let mut machine = studio.machine().await;
        info!("👕 Wearing: {}", machine.session().drafts().base_description);

        if let Some(description) = &args.description {
            machine.set_base_description(description.as_str());
        }
        if args.blur && !machine.session().drafts().blur_background {
            machine.toggle_blur();
        }
        if let Some(prompt) = &args.prompt {
            machine.set_custom_prompt(prompt.as_str());
        }
    }
    if let Some(id) = &args.style {
        studio.select_style(id).await?;
    }

    let progress = spawn_progress_log(&studio).await;

    // Transform
    info!("🎨 Styling: {}", studio.session().await.style_label());
    if studio.transform().await? != StepKind::Result {
        progress.abort();
        let session = studio.session().await;
        bail!("{}", session.error().unwrap_or("Transformation did not finish"));
    }
    save_artifact(&studio, &args.out).await?;

    // Animate
    if args.animate {
        if studio.animate().await? != StepKind::Result {
            bail!("Video generation did not finish");
        }
        let session = studio.session().await;
        match session.error() {
            Some(message) => warn!("{}", message),
            None => save_artifact(&studio, &args.out).await?,
        }
    }

    progress.abort();
    info!("✨ Done!");
    Ok(())
}

async fn spawn_progress_log(studio: &Studio) -> tokio::task::JoinHandle<()> {
    let mut feed = studio.progress().await;
    tokio::spawn(async move {
        while feed.changed().await.is_ok() {
            let message = feed.borrow_and_update().clone();
            info!("⏳ {}", message);
        }
    })
}

async fn save_artifact(studio: &Studio, out: &std::path::Path) -> Result<()> {
    let artifact = studio
        .artifact()
        .await
        .ok_or_else(|| anyhow!("Nothing to save"))?;
    let path = artifact.save(out)?;
    println!("{}", path.display());
    Ok(())
}
