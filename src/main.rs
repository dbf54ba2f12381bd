use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use sqlproj_gen::{generate, GenerateOptions, GeneratorConfig, PackageMap};

#[derive(Parser)]
#[command(name = "sqlproj-gen")]
#[command(author, version, about = "Generate SQL Server database projects from a definition file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate scripts, .sqlproj files and a .sln from a definition
    Generate {
        /// Path to the XML definition file
        #[arg(short, long)]
        input: PathBuf,

        /// Directory receiving one folder per solution
        #[arg(short, long)]
        output: PathBuf,

        /// Base directory for include folders and dacpacs (defaults to the input's directory)
        #[arg(long)]
        project_dir: Option<PathBuf>,

        /// Visual Studio edition used for system dependency paths (e.g. Enterprise)
        #[arg(short, long)]
        edition: Option<String>,

        /// Package content directory as Name=Path; may be repeated
        #[arg(long = "package", value_parser = parse_package)]
        packages: Vec<(String, PathBuf)>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn parse_package(arg: &str) -> Result<(String, PathBuf)> {
    let (name, path) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected Name=Path, got '{}'", arg))?;
    if name.is_empty() || path.is_empty() {
        return Err(anyhow!("expected Name=Path, got '{}'", arg));
    }
    Ok((name.to_string(), PathBuf::from(path)))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            project_dir,
            edition,
            packages,
            verbose,
        } => {
            tracing_subscriber::fmt()
                .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
                .with_target(false)
                .init();

            let project_dir = project_dir.unwrap_or_else(|| {
                input
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| PathBuf::from("."))
            });

            let config = GeneratorConfig {
                output_dir: output,
                project_dir,
                visual_studio_edition: edition,
            };

            let options = GenerateOptions {
                definition_path: input,
                config,
                packages: packages.into_iter().collect::<PackageMap>(),
            };

            for solution in generate(options)? {
                match &solution.solution_path {
                    Some(path) => println!(
                        "{}: {} projects, {} scripts -> {}",
                        solution.name,
                        solution.projects.len(),
                        solution.script_count,
                        path.display()
                    ),
                    None => println!("{}: no projects requested", solution.name),
                }
            }
        }
    }

    Ok(())
}
