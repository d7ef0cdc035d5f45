use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "marionette", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate up to a frame and write it as a PNG.
    Frame(FrameArgs),
    /// Write every frame of a run as a numbered PNG sequence.
    Frames(FramesArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Input rig description JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Surface width in pixels.
    #[arg(long, default_value_t = 1100)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 1100)]
    height: u32,

    /// Toggle the pointer button every N frames (0 keeps it up).
    #[arg(long, default_value_t = 0)]
    press_every: u64,

    /// Pointer x in pixels.
    #[arg(long, requires = "pointer_y")]
    pointer_x: Option<f64>,

    /// Pointer y in pixels.
    #[arg(long, requires = "pointer_x")]
    pointer_y: Option<f64>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct FramesArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Number of frames to write.
    #[arg(long)]
    count: u64,

    /// Output directory; files are named `frame_00000.png` and so on.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut run = Run::new(&args.scene)?;
    for _ in 0..args.frame {
        run.advance()?;
    }
    let frame = run.advance()?;
    write_png(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    let mut run = Run::new(&args.scene)?;
    for i in 0..args.count {
        let frame = run.advance()?;
        write_png(&args.out_dir.join(format!("frame_{i:05}.png")), &frame)?;
    }
    eprintln!("wrote {} frames to {}", args.count, args.out_dir.display());
    Ok(())
}

/// A stage plus the scripted input driving it.
struct Run {
    stage: marionette::Stage,
    press_every: u64,
    frame: u64,
}

impl Run {
    fn new(args: &SceneArgs) -> anyhow::Result<Self> {
        let desc = marionette::RigDescription::from_path(&args.in_path)?;
        let viewport = marionette::Viewport::new(args.width, args.height)?;
        let mut stage = marionette::Stage::new(viewport, marionette::StageOpts::default());
        stage.add_rig(&desc)?;
        if !stage.finish_loading()? {
            for rig in stage.rigs() {
                for (ci, key, err) in rig.load_status().failed {
                    tracing::warn!(constraint = ci, art = %key, error = %err, "art failed to decode");
                }
            }
        }
        if let (Some(x), Some(y)) = (args.pointer_x, args.pointer_y) {
            stage.pointer_move(x, y);
        }
        Ok(Self {
            stage,
            press_every: args.press_every,
            frame: 0,
        })
    }

    fn advance(&mut self) -> anyhow::Result<marionette::FrameRGBA> {
        if self.press_every > 0 && self.frame > 0 && self.frame % self.press_every == 0 {
            if self.stage.input().is_down() {
                self.stage.release();
            } else {
                self.stage.press();
            }
        }
        self.frame += 1;
        Ok(self.stage.render_frame()?)
    }
}

fn write_png(path: &Path, frame: &marionette::FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let data = if frame.premultiplied {
        unpremultiply(&frame.data)
    } else {
        frame.data.clone()
    };
    image::save_buffer_with_format(
        path,
        &data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn unpremultiply(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}
