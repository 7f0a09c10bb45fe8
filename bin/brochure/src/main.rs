//! Brochure CLI
//!
//! Static site generator with a small session-protected admin server.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Brochure.
#[derive(Parser)]
#[command(
    name = "brochure",
    version,
    about = "A small static site generator with an admin server"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "brochure.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the static site
    Build {
        /// Output directory, overriding the configured one
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Serve the API handlers and the built site
    Serve {
        /// Address to bind, overriding the configured one
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Print an argon2 hash for ADMIN_PASSWORD_HASH
    HashPassword {
        /// Password to hash (read from stdin when omitted)
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    brochure::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { output } => {
            brochure::cmd::build::run(&cli.config, output.as_deref())?;
        }
        Commands::Serve { bind } => {
            brochure::cmd::serve::run(&cli.config, bind.as_deref()).await?;
        }
        Commands::HashPassword { password } => {
            brochure::cmd::hash::run(password.as_deref())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let cli = Cli::parse_from(["brochure", "build"]);

        assert_eq!(cli.config, std::path::PathBuf::from("brochure.toml"));
        assert_eq!(cli.verbose, 0);
        assert!(matches!(cli.command, Commands::Build { output: None }));
    }

    #[test]
    fn test_cli_build_output_override() {
        let cli = Cli::parse_from(["brochure", "build", "--output", "dist"]);

        match cli.command {
            Commands::Build { output } => {
                assert_eq!(output, Some(std::path::PathBuf::from("dist")));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_serve_command_parsing() {
        let cli = Cli::parse_from(["brochure", "serve", "--bind", "0.0.0.0:9000"]);

        match cli.command {
            Commands::Serve { bind } => {
                assert_eq!(bind.as_deref(), Some("0.0.0.0:9000"));
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_serve_default_bind() {
        let cli = Cli::parse_from(["brochure", "serve"]);

        match cli.command {
            Commands::Serve { bind } => assert!(bind.is_none()),
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_hash_password_parsing() {
        let cli = Cli::parse_from(["brochure", "hash-password", "s3cret"]);

        match cli.command {
            Commands::HashPassword { password } => {
                assert_eq!(password.as_deref(), Some("s3cret"));
            }
            _ => panic!("Expected HashPassword command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let cli = Cli::parse_from(["brochure", "-vvv", "build"]);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let cli = Cli::parse_from(["brochure", "--config", "site.toml", "build"]);
        assert_eq!(cli.config, std::path::PathBuf::from("site.toml"));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["brochure"]).is_err());
    }
}
