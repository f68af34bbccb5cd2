//! bxd-export - command line robot model exporter
//!
//! Reads a robot description, applies the joint configuration and writes the
//! legacy skeleton and/or the JSON document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bxd_core::{
    ConfigData, ExportFormat, ExportSettings, RobotDescription, RobotTree, StlMeshWriter,
    export_json, export_legacy,
};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "bxd-export")]
#[command(about = "Export robot models for the simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a robot description
    Export {
        /// Robot description (.ron or .json)
        description: PathBuf,
        /// Joint configuration (.ron or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Export settings file
        #[arg(short, long, default_value = ExportSettings::FILE_NAME)]
        settings: PathBuf,
        /// Output directory (overrides the settings file)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Formats to write (overrides the settings file)
        #[arg(short, long, value_enum)]
        format: Vec<FormatArg>,
        /// Robot name (overrides the settings file)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Print the node tree of a robot description
    Info {
        /// Robot description (.ron or .json)
        description: PathBuf,
    },
    /// Write a settings file with default values
    InitSettings {
        #[arg(default_value = ExportSettings::FILE_NAME)]
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Legacy,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Legacy => ExportFormat::Legacy,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bxd_cli=info,bxd_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            description,
            config,
            settings: settings_path,
            out,
            format,
            name,
        } => {
            let mut settings = ExportSettings::load(&settings_path).with_context(|| {
                format!("Failed to load settings {}", settings_path.display())
            })?;
            if let Some(out) = out {
                settings.output_dir = out;
            }
            if !format.is_empty() {
                settings.formats = format.into_iter().map(ExportFormat::from).collect();
            }
            if name.is_some() {
                settings.robot_name = name;
            }
            export(&description, config.as_deref(), &settings)?;
        }
        Commands::Info { description } => {
            show_info(&description)?;
        }
        Commands::InitSettings { path } => {
            ExportSettings::default()
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote default settings to {}", path.display());
        }
    }

    Ok(())
}

fn load_tree(path: &Path) -> Result<RobotTree> {
    let description = RobotDescription::load(path)
        .with_context(|| format!("Failed to read robot description {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    description
        .into_tree(base_dir)
        .with_context(|| format!("Invalid robot description {}", path.display()))
}

fn export(description: &Path, config: Option<&Path>, settings: &ExportSettings) -> Result<()> {
    let mut tree = load_tree(description)?;
    tree.name = settings.robot_name(&tree.name).to_string();
    tracing::info!("Exporting '{}' ({} node(s))", tree.name, tree.len());

    let config = match config {
        Some(path) => ConfigData::load(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?,
        None => {
            tracing::info!("No configuration given, joints are exported unconfigured");
            ConfigData::new()
        }
    };
    tree.apply_config(&config)
        .context("Failed to apply joint configuration")?;

    if settings.formats.is_empty() {
        anyhow::bail!("No export format selected");
    }

    if settings.wants(ExportFormat::Legacy) {
        let files = export_legacy(&tree, &settings.output_dir, &mut StlMeshWriter)
            .context("Legacy export failed")?;
        println!("Wrote {}", files.skeleton.display());
    }

    if settings.wants(ExportFormat::Json) {
        let path = settings.json_path();
        export_json(&tree, &path, settings.pretty_json).context("JSON export failed")?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn show_info(description: &Path) -> Result<()> {
    let tree = load_tree(description)?;

    println!("Robot: {}", tree.name);
    println!("Nodes: {}", tree.len());
    for (id, node) in tree.traverse() {
        let depth = std::iter::successors(tree.parent(id), |&p| tree.parent(p)).count();
        let joint = node
            .joint()
            .map(|j| format!(" <- {} '{}'", j.kind.type_save(), j.name))
            .unwrap_or_default();
        println!(
            "{}{} ({} triangles){}",
            "  ".repeat(depth),
            node.name,
            node.mesh.triangle_count(),
            joint
        );
    }

    Ok(())
}
