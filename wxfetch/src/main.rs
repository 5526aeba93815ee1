use anyhow::Result;
use wxfetch::{command, Args, Config, Error, GithubClient};

fn main() -> Result<()> {
    use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};
    tracing_log::LogTracer::init().ok();
    let env = std::env::var("WXFETCH_LOG").unwrap_or_else(|_| "error".into());
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::new(env))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
    log_panics::init();
    let args = match Args::from_env() {
        Ok(args) => args,
        Err(Error::Cli(err)) => err.exit(),
        Err(err) => return Err(err.into()),
    };
    let config = Config::from_env(args)?;
    let client = GithubClient::from_config(&config)?;
    command::fetch(&config, &client)?;
    Ok(())
}
