use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use protrack::{DrawSettings, draw, extract_phospho_sites, table_io::read_feature_table};
use protrack_render::SvgRenderer;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "protrack_cli")]
#[command(version)]
#[command(about = "Draw stacked protein feature tracks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Draw a feature table (CSV or TSV) as SVG or as a JSON scene
    Draw {
        /// Feature table with type, description, begin, end, length,
        /// accession, entryName, taxid and order columns
        input: String,

        /// Draw settings JSON (layer order and options)
        #[arg(long, value_name = "JSON")]
        config: Option<String>,

        /// Output path; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
        format: OutputFormat,

        /// Plot title
        #[arg(long)]
        title: Option<String>,
    },
    /// Print the default draw settings
    DefaultConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Rendered SVG document
    Svg,
    /// Scene as pretty-printed JSON
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::DefaultConfig => {
            let text = serde_json::to_string_pretty(&DrawSettings::default())
                .context("Could not serialize default settings")?;
            println!("{text}");
            Ok(())
        }
        Commands::Draw {
            input,
            config,
            output,
            format,
            title,
        } => {
            let mut settings = match &config {
                Some(path) => DrawSettings::load_from_path(path)
                    .with_context(|| format!("Could not load settings '{path}'"))?,
                None => DrawSettings::default(),
            };
            if title.is_some() {
                settings.svg.title = title;
            }

            let loaded = read_feature_table(&input)
                .with_context(|| format!("Could not read feature table '{input}'"))?;
            let sites = extract_phospho_sites(&loaded.modified_residues);
            let scene = draw(&loaded.table, &sites, &settings.layers)
                .with_context(|| format!("Could not lay out '{input}'"))?;

            let text = match format {
                OutputFormat::Svg => SvgRenderer::new(settings.svg.clone()).render(&scene),
                OutputFormat::Json => scene.to_json_pretty().context("Could not serialize scene")?,
            };
            match &output {
                Some(path) => {
                    fs::write(path, text).with_context(|| format!("Could not write '{path}'"))?;
                    info!(
                        tracks = loaded.table.orders().len(),
                        layers = scene.shape_layers().len(),
                        "wrote {path}"
                    );
                }
                None => println!("{text}"),
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_checked_by_the_parser() {
        let cli = Cli::try_parse_from(["protrack_cli", "draw", "in.csv", "--format", "json"])
            .unwrap();
        let Commands::Draw { format, .. } = cli.command else {
            panic!("expected draw");
        };
        assert_eq!(format, OutputFormat::Json);

        let cli = Cli::try_parse_from(["protrack_cli", "draw", "in.csv"]).unwrap();
        let Commands::Draw { format, .. } = cli.command else {
            panic!("expected draw");
        };
        assert_eq!(format, OutputFormat::Svg);

        let unknown = ["protrack_cli", "draw", "in.csv", "--format", "png"];
        assert!(Cli::try_parse_from(unknown).is_err());
    }
}
