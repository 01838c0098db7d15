use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use placehold::{
    Config, Dpr, FontSource, Format, HttpServer, PlaceholdError, Renderer, Response, Service,
    ServiceOpts, service::DEFAULT_CACHE_MAX_AGE,
};

#[derive(Parser, Debug)]
#[command(name = "placehold", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve placeholders over HTTP at `GET /<token>`.
    Serve(ServeArgs),
    /// Render one token to a file.
    Render(RenderArgs),
    /// Validate a token and print the resulting parameters as JSON.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON config file; flags below override its values.
    #[arg(long, env = "PLACEHOLD_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "PLACEHOLD_MAX_WIDTH")]
    max_width: Option<u32>,

    #[arg(long, env = "PLACEHOLD_MAX_HEIGHT")]
    max_height: Option<u32>,

    #[arg(long, env = "PLACEHOLD_MAX_DPR")]
    max_dpr: Option<Dpr>,

    #[arg(long, env = "PLACEHOLD_DEFAULT_FORMAT")]
    default_format: Option<Format>,

    /// Comma-separated list of formats requests may ask for.
    #[arg(long, env = "PLACEHOLD_FORMATS", value_delimiter = ',')]
    formats: Option<Vec<Format>>,
}

#[derive(Args, Debug)]
struct FontArgs {
    /// Font file path or http(s) URL, read on every render.
    #[arg(long, env = "PLACEHOLD_FONT")]
    font: FontSource,

    /// Load the font once at startup instead of on every render.
    #[arg(long)]
    preload_font: bool,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "PLACEHOLD_ADDR", default_value = "127.0.0.1:8080")]
    addr: String,

    /// Concurrent renders (defaults to the number of CPUs).
    #[arg(long, env = "PLACEHOLD_CONCURRENCY")]
    concurrency: Option<usize>,

    /// Per-request budget in milliseconds.
    #[arg(long, env = "PLACEHOLD_TIMEOUT_MS", default_value_t = 10_000)]
    timeout_ms: u64,

    #[arg(long, env = "PLACEHOLD_CACHE_MAX_AGE", default_value_t = DEFAULT_CACHE_MAX_AGE)]
    cache_max_age: u64,

    #[command(flatten)]
    font: FontArgs,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    token: String,

    /// Output path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    font: FontArgs,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug)]
struct CheckArgs {
    token: String,

    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Serve(args) => cmd_serve(args),
        Command::Render(args) => cmd_render(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<Config> {
    let mut cfg = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(v) = args.max_width {
        cfg.max_width = v;
    }
    if let Some(v) = args.max_height {
        cfg.max_height = v;
    }
    if let Some(v) = args.max_dpr {
        cfg.max_dpr = v;
    }
    if let Some(v) = args.default_format {
        cfg.default_format = v;
    }
    if let Some(v) = &args.formats {
        cfg.supported_formats = v.iter().copied().collect();
    }
    cfg.validate()?;
    Ok(cfg)
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_context(|| "build tokio runtime")
}

async fn make_renderer(args: &FontArgs) -> anyhow::Result<Renderer> {
    let renderer = Renderer::new(args.font.clone())?;
    if !args.preload_font {
        return Ok(renderer);
    }
    let font = args
        .font
        .load(&reqwest::Client::new(), &placehold::RetryPolicy::default())
        .await?;
    tracing::info!(family = font.family(), "preloaded font");
    Ok(Renderer::new(FontSource::Static(font.bytes().into()))?)
}

/// Print the 422 body for a token error and turn it into a process error.
fn report_rejection(err: PlaceholdError) -> anyhow::Error {
    if err.is_user_error() {
        let message = err.to_string();
        let resp = Response::from_error(err);
        println!("{}", String::from_utf8_lossy(resp.body.as_bytes()));
        anyhow::anyhow!(message)
    } else {
        err.into()
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.config)?;
    let rt = runtime()?;
    let renderer = rt.block_on(make_renderer(&args.font))?;

    let mut opts = ServiceOpts {
        timeout: Duration::from_millis(args.timeout_ms),
        cache_max_age: args.cache_max_age,
        ..ServiceOpts::default()
    };
    if let Some(n) = args.concurrency {
        opts.concurrency = n;
    }

    let service = Service::new(cfg, renderer, opts)?;
    let server = HttpServer::bind(&args.addr, service)?;
    server.run(rt.handle());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.config)?;
    let params = placehold::parse(&args.token, &cfg).map_err(report_rejection)?;

    let rt = runtime()?;
    let artifact = rt.block_on(async {
        let renderer = make_renderer(&args.font).await?;
        Ok::<_, anyhow::Error>(renderer.render(&params).await?)
    })?;

    std::fs::write(&args.out, &artifact.bytes)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    tracing::info!(
        token = %params,
        canvas = %artifact.canvas,
        bytes = artifact.bytes.len(),
        out = %args.out.display(),
        "wrote placeholder"
    );
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.config)?;
    let params = placehold::parse(&args.token, &cfg).map_err(report_rejection)?;

    let report = serde_json::json!({
        "token": params.to_string(),
        "parameters": params,
        "canvas": params.canvas(),
        "media_type": params.format().entry().media_type,
        "description": params.description(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
