use std::path::PathBuf;

use clap::{Parser, Subcommand};

use a1_cli::cli::{run_publish, run_render, run_seo, run_watch, PublishArgs, SeoArgs};
use a1_core::blog::PostStatus;
use a1_core::tracing_setup::init_tracing_with_service;
use a1_core::A1Config;

#[derive(Parser)]
#[command(name = "a1-cli")]
#[command(about = "Headless A1 Tools client: chat notifications and blog publishing")]
struct Cli {
    /// Path to JSON config file (defaults to <config dir>/a1-tools/config.json)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll for unread chat messages and show notifications until Ctrl-C
    Watch {
        /// User to poll as (overrides the config file)
        #[arg(long, short = 'u')]
        username: Option<String>,
    },

    /// Convert an editor op log (.json) to HTML
    Render {
        input: PathBuf,
    },

    /// Score a post against a focus keyword
    Seo {
        /// Editor op log (.json) or HTML file
        input: PathBuf,
        #[arg(long, short = 'k')]
        keyword: String,
        #[arg(long, short = 't')]
        title: String,
        #[arg(long, short = 'm', default_value = "")]
        meta: String,
        #[arg(long, short = 's', default_value = "")]
        slug: String,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create or update a WordPress post from an op log or HTML file
    Publish {
        input: PathBuf,
        #[arg(long, short = 't')]
        title: String,
        /// draft, publish, pending or private
        #[arg(long, default_value = "draft")]
        status: PostStatus,
        /// Update this post instead of creating a new one
        #[arg(long)]
        post_id: Option<u64>,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        excerpt: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing_with_service("a1-cli");

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = A1Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Watch { username } => run_watch(&config, username).await?,
        Commands::Render { input } => print!("{}", run_render(&input)?),
        Commands::Seo {
            input,
            keyword,
            title,
            meta,
            slug,
            json,
        } => {
            let report = run_seo(&SeoArgs {
                input,
                keyword,
                title,
                meta,
                slug,
                json,
            })?;
            println!("{}", report.trim_end());
        }
        Commands::Publish {
            input,
            title,
            status,
            post_id,
            slug,
            excerpt,
        } => {
            let post = run_publish(
                &config,
                &PublishArgs {
                    input,
                    title,
                    status,
                    post_id,
                    slug,
                    excerpt,
                },
            )
            .await?;
            println!("Saved post {} ({}): {}", post.id, post.status, post.link);
        }
    }

    Ok(())
}
