use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Config file. Defaults to `config.toml` in the platform config directory.
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// GitHub username, overrides the configured one.
    #[clap(long, global = true, env = "FOLIO_USERNAME")]
    pub username: Option<String>,

    #[clap(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the portfolio page from a template.
    Build {
        /// Page template.
        #[clap(long, default_value = "index.html")]
        template: PathBuf,

        /// Where to write the rendered page.
        #[clap(long, default_value = "dist/index.html")]
        out: PathBuf,
    },
    /// Print profile statistics.
    Stats {},
    /// Print top repositories.
    Repos {},
    /// Print recent activity.
    Activity {},
    /// Print the contribution calendar bootstrap script.
    Calendar {},
}

pub fn cmd() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::parse_from(["folio", "build", "--template", "site/index.html"]);
        assert!(cli.config.is_none());
        match cli.cmd {
            Command::Build { template, out } => {
                assert_eq!(template, PathBuf::from("site/index.html"));
                assert_eq!(out, PathBuf::from("dist/index.html"));
            }
            cmd => panic!("unexpected command {cmd:?}"),
        }
    }

    #[test]
    fn test_parse_global_options_after_subcommand() {
        let cli = Cli::parse_from(["folio", "repos", "--username", "kafji", "--config", "f.toml"]);
        assert_eq!(cli.username.as_deref(), Some("kafji"));
        assert_eq!(cli.config, Some(PathBuf::from("f.toml")));
        assert!(matches!(cli.cmd, Command::Repos {}));
    }
}
