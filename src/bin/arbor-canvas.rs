use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context as _;
use arbor_canvas::{
    AssistantWorker, CanvasEngine, DirAssetSource, DrawingSession, EngineOpts, Locale,
    OfflineAssistant, PointerEvent, Reflection, Rgb8, StageCatalog, Tool,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "arbor-canvas", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON script of host events and write the final canvas as a PNG.
    Replay(ReplayArgs),
    /// Print the stage catalog.
    Stages(StagesArgs),
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Directory holding `<part>-guide.svg` / `<part>-fill.svg` template assets.
    #[arg(long)]
    templates: PathBuf,

    /// Event script (JSON array of steps).
    #[arg(long)]
    script: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Stage catalog JSON. Defaults to the built-in tree of life.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Engine options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// UI language for chat messages.
    #[arg(long, value_enum, default_value_t = LocaleChoice::En)]
    locale: LocaleChoice,

    /// Abort on the first rejected step instead of logging it.
    #[arg(long)]
    strict: bool,

    /// Print the conversation log after the replay.
    #[arg(long)]
    dump_chat: bool,
}

#[derive(Parser, Debug)]
struct StagesArgs {
    /// Stage catalog JSON. Defaults to the built-in tree of life.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// UI language.
    #[arg(long, value_enum, default_value_t = LocaleChoice::En)]
    locale: LocaleChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LocaleChoice {
    En,
    Zh,
}

impl From<LocaleChoice> for Locale {
    fn from(c: LocaleChoice) -> Self {
        match c {
            LocaleChoice::En => Locale::En,
            LocaleChoice::Zh => Locale::Zh,
        }
    }
}

/// One host event in a replay script.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Step {
    Pointer { event: PointerEvent },
    Stroke { points: Vec<[f64; 2]> },
    Tool { tool: Tool },
    Color { color: Rgb8 },
    Width { width: f64 },
    Opacity { opacity: f32 },
    Fill,
    Text { content: String },
    ConfirmText,
    CancelText,
    Undo,
    Redo,
    Resize { width: u32, height: u32 },
    Submit,
    Advance,
    Reedit,
    Say { text: String },
    Complete { reflection: Reflection },
    Snapshot { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("arbor_canvas=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Replay(args) => cmd_replay(args),
        Command::Stages(args) => cmd_stages(args),
    }
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<Arc<StageCatalog>> {
    let catalog = match path {
        Some(p) => StageCatalog::from_json_file(p)?,
        None => StageCatalog::tree_of_life(),
    };
    catalog.validate()?;
    Ok(Arc::new(catalog))
}

fn read_script(path: &Path) -> anyhow::Result<Vec<Step>> {
    let f = File::open(path).with_context(|| format!("open script '{}'", path.display()))?;
    let steps: Vec<Step> =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse script JSON")?;
    Ok(steps)
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let opts = match &args.opts {
        Some(p) => EngineOpts::from_json_file(p)?,
        None => EngineOpts::default(),
    };
    let steps = read_script(&args.script)?;

    let mut engine = CanvasEngine::new(catalog, opts)?;
    engine.load_templates(&DirAssetSource::new(&args.templates));
    let worker = AssistantWorker::inline(Arc::new(OfflineAssistant));
    let mut session = DrawingSession::new(engine, worker, args.locale.into())?;

    for (i, step) in steps.into_iter().enumerate() {
        if let Err(e) = apply_step(&mut session, step) {
            if args.strict {
                return Err(e.context(format!("script step {i}")));
            }
            tracing::warn!(step = i, error = %e, "script step rejected");
        }
        session.poll();
    }
    session.wait_for_replies(Duration::from_secs(30));

    let locale: Locale = args.locale.into();
    for notice in session.take_notices() {
        eprintln!("notice: {} ({})", notice.message(locale), notice.detail);
    }
    if args.dump_chat {
        for m in session.conversation() {
            eprintln!("[{:?}] {}", m.role, m.text);
        }
    }

    write_png(&session, &args.out)?;
    eprintln!(
        "wrote {} (stage {}, {} history entries)",
        args.out.display(),
        session.stage(),
        session.engine().history().len()
    );
    Ok(())
}

fn apply_step(session: &mut DrawingSession, step: Step) -> anyhow::Result<()> {
    match step {
        Step::Pointer { event } => session.engine_mut().pointer(event),
        Step::Stroke { points } => {
            let Some((&[x, y], rest)) = points.split_first() else {
                anyhow::bail!("stroke needs at least one point");
            };
            let engine = session.engine_mut();
            engine.pointer(PointerEvent::Down { x, y });
            for &[x, y] in rest {
                engine.pointer(PointerEvent::Move { x, y });
            }
            engine.pointer(PointerEvent::Leave);
        }
        Step::Tool { tool } => session.engine_mut().set_tool(tool),
        Step::Color { color } => session.engine_mut().set_color(color),
        Step::Width { width } => session.engine_mut().set_brush_width(width),
        Step::Opacity { opacity } => session.engine_mut().set_brush_opacity(opacity),
        Step::Fill => {
            let engine = session.engine_mut();
            let color = engine.brush().color();
            if !engine.fill_current_part(color) {
                anyhow::bail!("nothing to fill on stage {}", engine.stage());
            }
        }
        Step::Text { content } => session.engine_mut().place_text(&content)?,
        Step::ConfirmText => {
            if !session.engine_mut().confirm_text() {
                anyhow::bail!("no pending text to confirm");
            }
        }
        Step::CancelText => {
            if !session.engine_mut().cancel_text() {
                anyhow::bail!("no pending text to cancel");
            }
        }
        Step::Undo => {
            session.engine_mut().undo();
        }
        Step::Redo => {
            session.engine_mut().redo();
        }
        Step::Resize { width, height } => session.engine_mut().resize(width, height)?,
        Step::Submit => {
            session.submit()?;
        }
        Step::Advance => {
            session.advance()?;
        }
        Step::Reedit => session.reedit()?,
        Step::Say { text } => {
            session.say(&text)?;
        }
        Step::Complete { reflection } => session.complete(reflection)?,
        Step::Snapshot { path } => write_png(session, &path)?,
    }
    Ok(())
}

fn write_png(session: &DrawingSession, path: &Path) -> anyhow::Result<()> {
    session.engine().snapshot()?.save_png(path)?;
    Ok(())
}

fn cmd_stages(args: StagesArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let locale: Locale = args.locale.into();
    for stage in catalog.stages() {
        let part = stage
            .part
            .and_then(|p| catalog.parts().get(p))
            .map(|p| p.name.as_str())
            .unwrap_or("-");
        let gate = if catalog.is_gated(stage.index) {
            "gated"
        } else {
            "open"
        };
        println!(
            "{:>2}  {:<24} part={:<10} {}",
            stage.index,
            stage.title.get(locale),
            part,
            gate
        );
    }
    Ok(())
}
