use clap::{Parser, Subcommand};
use pm25_map::{config, render::RenderSummary, scene, server, tiles};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the readings into a scene file and raster tiles
    Generate {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Serve the interactive map
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate { config } => {
            println!("Generating map with config: {:?}", config);
            let app_config = config::AppConfig::load_from_file(config)?;

            // 1. Load, sanitize and render into a scene
            let (scene, summary) = scene::build_scene(&app_config).await?;
            print_summary(&summary);

            // 2. Persist the scene for the web page
            scene.write_to_file(&app_config.output.scene_file)?;

            // 3. Rasterize tiles
            tiles::generate_tiles(&app_config, &scene)?;

            println!("Generation complete!");
        }
        Commands::Serve { config } => {
            println!("Serving map with config: {:?}", config);
            let app_config = config::AppConfig::load_from_file(config)?;

            let (scene, summary) = scene::build_scene(&app_config).await?;
            print_summary(&summary);

            server::start_server(app_config, scene).await?;
        }
    }

    Ok(())
}

fn print_summary(summary: &RenderSummary) {
    println!(
        "Drew {} points, value range {:.2} to {:.2} ({:?} scale, {} legend entries)",
        summary.points_drawn,
        summary.scale.min(),
        summary.scale.max(),
        summary.scale_kind(),
        summary.legend.len()
    );
}
