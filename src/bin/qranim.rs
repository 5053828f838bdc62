use clap::{Parser, Subcommand};
use qr_reveal::config;
use qr_reveal::tools::{LengthHint, ascii_preview, plan_reveal};
use qr_reveal::{
    AnimationMode, DEFAULT_FILE_NAME, ECLevel, GenerateRequest, ImageSurface, MAX_MODULE_SIZE, QrcodegenEncoder,
    Session, SessionEvent,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qranim", version, about = "Animated QR code reveal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Animate the reveal in real time and save the finished symbol
    Animate {
        #[arg(long)]
        text: String,
        /// sequential, spiral, random, wave or corners
        #[arg(long)]
        mode: Option<String>,
        /// L, M, Q or H
        #[arg(long)]
        level: Option<ECLevel>,
        /// Pixels per module, 1-64
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_MODULE_SIZE as i64))]
        module_size: Option<u32>,
        #[arg(long)]
        delay_ms: Option<u64>,
        #[arg(long, default_value = DEFAULT_FILE_NAME)]
        out: PathBuf,
        /// Draw the symbol in the terminal as it fills in
        #[arg(long)]
        preview: bool,
        /// Only log the outcome, not the progress
        #[arg(long)]
        quiet: bool,
    },
    /// Print the reveal order as `row col x y` lines
    Order {
        #[arg(long)]
        text: String,
        #[arg(long)]
        mode: Option<String>,
        #[arg(long)]
        level: Option<ECLevel>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print symbol size and dark-module count for a text
    Inspect {
        #[arg(long)]
        text: String,
        #[arg(long)]
        level: Option<ECLevel>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("qr_reveal=info,qranim=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Animate {
            text,
            mode,
            level,
            module_size,
            delay_ms,
            out,
            preview,
            quiet,
        } => {
            let mut request = GenerateRequest::new(text);
            if let Some(mode) = mode {
                request = request.mode(AnimationMode::from(mode.as_str()));
            }
            if let Some(level) = level {
                request = request.level(level);
            }
            if let Some(size) = module_size {
                request = request.module_size(size);
            }
            if let Some(ms) = delay_ms {
                request = request.delay(Duration::from_millis(ms));
            }
            animate_cmd(&request, &out, preview, quiet)
        }
        Command::Order {
            text,
            mode,
            level,
            limit,
        } => order_cmd(&text, mode.as_deref(), level, limit),
        Command::Inspect { text, level } => inspect_cmd(&text, level),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn animate_cmd(request: &GenerateRequest, out: &Path, preview: bool, quiet: bool) -> qr_reveal::Result<()> {
    let hint = LengthHint::for_text(&request.text);
    info!("{} characters ({})", request.text.chars().count(), hint.message());

    let mut session = Session::new(QrcodegenEncoder, ImageSurface::new());
    let generation = session.generate(request)?;
    let n = generation.settings.module_count;
    info!(
        "QR code {n}×{n} (version {}, level {}), {} dark modules, mode {}",
        generation.version.number(),
        generation.level,
        generation.dark_modules,
        generation.mode,
    );

    let started = Instant::now();
    let mut last_tick = Instant::now();
    let mut last_logged = 0u32;
    while let Some(wait) = session.next_due_in() {
        std::thread::sleep(wait);
        let now = Instant::now();
        session.advance(now - last_tick);
        last_tick = now;

        for event in session.take_events() {
            match event {
                SessionEvent::Progress(progress) => {
                    // One line per 10% is plenty for a terminal
                    let decile = progress.percent() / 10;
                    if !quiet && decile > last_logged {
                        last_logged = decile;
                        info!("{}", session.status());
                    }
                }
                SessionEvent::Completed { .. } => info!("{}", session.status()),
                SessionEvent::Error { message, .. } => error!("{message}"),
            }
        }

        if preview {
            let drawn = session.progress().current_step;
            print!(
                "\x1b[H\x1b[2J{}",
                ascii_preview(session.scheduler().pattern(), generation.settings.module_count, drawn)
            );
        }
    }

    info!("animation took {:.2?}", started.elapsed());
    session.save_to(out)?;
    info!("QR code saved successfully! ({})", out.display());
    Ok(())
}

fn order_cmd(text: &str, mode: Option<&str>, level: Option<ECLevel>, limit: Option<usize>) -> qr_reveal::Result<()> {
    let mode = mode.map(AnimationMode::from).unwrap_or_else(config::default_mode);
    let level = level.unwrap_or_else(config::default_ec_level);
    let plan = plan_reveal(&QrcodegenEncoder, text, mode, level, config::default_module_size())?;

    println!("# mode={} level={} modules={}", mode, level, plan.order.len());
    for m in plan.order.iter().take(limit.unwrap_or(usize::MAX)) {
        println!("{} {} {} {}", m.row, m.col, m.x, m.y);
    }
    Ok(())
}

fn inspect_cmd(text: &str, level: Option<ECLevel>) -> qr_reveal::Result<()> {
    let level = level.unwrap_or_else(config::default_ec_level);
    let plan = plan_reveal(
        &QrcodegenEncoder,
        text,
        AnimationMode::Insertion,
        level,
        config::default_module_size(),
    )?;
    let hint = LengthHint::for_text(text);
    println!("Text: {} characters ({})", text.chars().count(), hint.message());
    println!(
        "Symbol: version {} ({n}×{n}), level {}",
        plan.symbol.version.number(),
        plan.symbol.error_correction,
        n = plan.settings.module_count
    );
    println!("Dark modules: {}", plan.order.len());
    println!("Canvas: {}px (module {}px)", plan.settings.total_size, plan.settings.module_size);
    if let Some(lower) = level.lower() {
        println!("Lower level available: {lower}");
    }
    Ok(())
}
