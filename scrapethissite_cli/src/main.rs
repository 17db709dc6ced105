mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use scrapethissite_lib::scrapethissite_browser::BrowserKind;
use scrapethissite_lib::ScrapeConfig;

use crate::commands::Backend;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "scrapethissite")]
#[command(about = "Scrape the hockey and Oscar sandboxes of scrapethissite.com into JSON files")]
struct Cli {
    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Directory the JSON files are written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Site root, e.g. https://www.scrapethissite.com
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// WebDriver endpoint (chromedriver or geckodriver)
    #[arg(long, global = true)]
    webdriver_url: Option<String>,

    /// Browser to start: chrome or firefox
    #[arg(long, global = true)]
    browser: Option<BrowserKind>,

    /// Run the browser without a window
    #[arg(long, global = true)]
    headless: bool,

    /// Fetch server-rendered HTML instead of driving a browser (no JavaScript)
    #[arg(long = "static", global = true)]
    static_html: bool,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the hockey and Oscar jobs with default parameters
    Run,
    /// Collect hockey teams whose win percentage passes a filter
    Hockey(commands::hockey::HockeyArgs),
    /// Collect the top films of every Oscar year
    Oscars(commands::oscars::OscarsArgs),
}

impl Cli {
    /// Defaults, then the config file, then environment, then flags.
    fn scrape_config(&self) -> Result<ScrapeConfig> {
        let mut config = match &self.config {
            Some(path) => ScrapeConfig::load(path)?,
            None => ScrapeConfig::default(),
        };
        config.apply_env();

        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }
        if let Some(browser) = self.browser {
            config.browser = browser;
        }
        if self.headless {
            config.headless = true;
        }

        config.validate()?;
        Ok(config)
    }

    fn backend(&self) -> Backend {
        if self.static_html {
            Backend::Static
        } else {
            Backend::WebDriver
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scrapethissite=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from_flag(&cli.output);
    let config = cli.scrape_config()?;
    let backend = cli.backend();

    match &cli.command {
        Commands::Run => commands::run::run(backend, &config, &format).await?,
        Commands::Hockey(args) => commands::hockey::run(args, backend, &config, &format).await?,
        Commands::Oscars(args) => commands::oscars::run(args, backend, &config, &format).await?,
    }

    Ok(())
}
