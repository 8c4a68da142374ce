use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use blitstream::{
    BatchFlag, BatchHandle, BlendCode, BlendSpec, BlitContext, BlitRequest, BufferDesc, BufferId,
    ContextOpts, FormatCode, Mirror, Operation, Rect, Rotation, ScaleQuality, SimDevice,
    SurfaceGeom, SurfaceRef,
    blend::{Side, decode_coefficient, resolve_blend},
    filter::{PHASES, generate_kernel, scale_factor},
    format::parse_format,
    hw::listing,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "blitstream", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a JSON blit script against the simulated device and print each submission.
    Run(RunArgs),
    /// Print a generated scaling kernel.
    Kernel(KernelArgs),
    /// Resolve a blend code into hardware factors.
    Blend(BlendArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Context options JSON; defaults apply when omitted.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Print a disassembly of every submitted command buffer.
    #[arg(long)]
    disasm: bool,
}

#[derive(Parser, Debug)]
struct KernelArgs {
    /// Kernel size (1, 3, 5, 7 or 9).
    #[arg(long)]
    taps: u32,

    /// Source length in pixels.
    #[arg(long)]
    src: u32,

    /// Destination length in pixels.
    #[arg(long)]
    dst: u32,
}

#[derive(Parser, Debug)]
struct BlendArgs {
    /// Porter-Duff name (`src_over`) or numeric code (`0x…`).
    #[arg(long)]
    code: String,

    #[arg(long, default_value_t = 0xFF)]
    global_src_alpha: u8,

    #[arg(long, default_value_t = 0xFF)]
    global_dst_alpha: u8,
}

#[derive(serde::Deserialize, Debug)]
struct Script {
    #[serde(default)]
    buffers: Vec<BufferSpec>,
    blits: Vec<BlitSpec>,
}

#[derive(serde::Deserialize, Debug)]
struct BufferSpec {
    id: u64,
    virt_addr: u64,
    length: usize,
    #[serde(default)]
    cpu_cached: bool,
    /// 32-bit little-endian word repeated over the buffer's host bytes.
    #[serde(default)]
    fill: Option<u32>,
}

#[derive(serde::Deserialize, Debug)]
struct SurfaceSpec {
    buffer: u64,
    width: u32,
    height: u32,
    /// Defaults to a tightly packed row.
    #[serde(default)]
    stride: Option<u32>,
    format: String,
    #[serde(default)]
    rotation: Rotation,
    #[serde(default)]
    mirror: Mirror,
    /// Defaults to the whole logical surface.
    #[serde(default)]
    rect: Option<Rect>,
}

#[derive(serde::Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum BatchStep {
    #[default]
    None,
    Begin,
    Continue,
    End,
}

#[derive(serde::Deserialize, Debug)]
struct BlitSpec {
    dst: SurfaceSpec,
    src: SurfaceSpec,
    #[serde(default)]
    background: Option<SurfaceSpec>,
    #[serde(default)]
    clip: Option<Rect>,
    #[serde(default)]
    op: Operation,
    #[serde(default)]
    quality: ScaleQuality,
    #[serde(default)]
    batch: BatchStep,
}

#[derive(serde::Serialize)]
struct SubmissionReport<'a> {
    index: usize,
    buffers: usize,
    words: usize,
    ops: &'a [blitstream::OpSummary],
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Kernel(args) => cmd_kernel(args),
        Command::Blend(args) => cmd_blend(args),
    }
}

fn read_script(path: &Path) -> anyhow::Result<Script> {
    let f = File::open(path).with_context(|| format!("open script '{}'", path.display()))?;
    let script: Script = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse script JSON '{}'", path.display()))?;
    Ok(script)
}

fn build_buffer(spec: &BufferSpec) -> BufferDesc {
    let desc = BufferDesc::new(BufferId(spec.id), spec.virt_addr, spec.length)
        .cpu_cached(spec.cpu_cached);
    match spec.fill {
        Some(word) => {
            let bytes: Vec<u8> = word
                .to_le_bytes()
                .into_iter()
                .cycle()
                .take(spec.length)
                .collect();
            desc.with_host_bytes(Arc::from(bytes))
        }
        None => desc,
    }
}

fn build_surface(spec: &SurfaceSpec, buffers: &[BufferDesc]) -> anyhow::Result<SurfaceRef> {
    let buffer = buffers
        .iter()
        .find(|b| b.id == BufferId(spec.buffer))
        .with_context(|| format!("surface references unknown buffer {}", spec.buffer))?
        .clone();
    let format: FormatCode = spec.format.parse()?;
    let stride = match spec.stride {
        Some(s) => s,
        None => {
            let desc = parse_format(format)?;
            if desc.is_planar() {
                spec.width
            } else {
                spec.width * desc.bits_per_pixel / 8
            }
        }
    };
    let geom = SurfaceGeom::new(spec.width, spec.height, stride, format)
        .rotated(spec.rotation)
        .mirrored(spec.mirror);
    Ok(match spec.rect {
        Some(rect) => SurfaceRef::new(buffer, geom, rect),
        None => SurfaceRef::whole(buffer, geom),
    })
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let script = read_script(&args.in_path)?;
    let opts = match &args.opts {
        Some(path) => ContextOpts::from_path(path)?,
        None => ContextOpts::default(),
    };

    let sim = Arc::new(SimDevice::new());
    let ctx = BlitContext::with_device(opts, sim.clone())?;
    let buffers: Vec<BufferDesc> = script.buffers.iter().map(build_buffer).collect();

    let mut open: Option<BatchHandle> = None;
    for (i, spec) in script.blits.iter().enumerate() {
        let flag = match spec.batch {
            BatchStep::None => BatchFlag::None,
            BatchStep::Begin => BatchFlag::Begin,
            BatchStep::Continue => {
                BatchFlag::Continue(open.with_context(|| format!("blit {i}: no open batch"))?)
            }
            BatchStep::End => {
                BatchFlag::End(open.take().with_context(|| format!("blit {i}: no open batch"))?)
            }
        };
        let mut req = BlitRequest::copy(
            build_surface(&spec.dst, &buffers)?,
            build_surface(&spec.src, &buffers)?,
        )
        .with_op(spec.op)
        .with_quality(spec.quality)
        .with_flag(flag);
        if let Some(bg) = &spec.background {
            req = req.with_background(build_surface(bg, &buffers)?);
        }
        if let Some(clip) = spec.clip {
            req = req.with_clip(clip);
        }

        let outcome = ctx
            .blit(&req)
            .with_context(|| format!("blit {i} failed"))?;
        if spec.batch == BatchStep::Begin {
            open = outcome.batch;
        }
        eprintln!("blit {i}: {:?}", outcome.route);
    }
    if let Some(handle) = open {
        tracing::warn!(?handle, "script left a batch open, discarding it");
        ctx.discard_batch(handle)?;
    }

    for (index, sub) in sim.submissions().iter().enumerate() {
        let report = SubmissionReport {
            index,
            buffers: sub.buffers.len(),
            words: sub.word_count(),
            ops: &sub.ops,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        if args.disasm {
            for (b, words) in sub.buffers.iter().enumerate() {
                println!("-- submission {index} buffer {b}");
                println!("{}", listing(words)?);
            }
        }
    }

    let stats = ctx.pool_stats();
    eprintln!(
        "buffers allocated {} / free {}, fixup chunks allocated {}",
        stats.buffers_allocated, stats.buffers_free, stats.fixup_chunks_allocated
    );
    Ok(())
}

fn cmd_kernel(args: KernelArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.src > 0 && args.dst > 0, "lengths must be non-zero");
    let scale = scale_factor(args.src, args.dst);
    let kernel = generate_kernel(args.taps, scale)?;
    println!("taps {} scale {:#010x}", kernel.size(), kernel.scale());
    for p in 0..PHASES {
        let row: Vec<String> = kernel
            .phase(p)
            .iter()
            .map(|c| format!("{c:6}"))
            .collect();
        println!("{p:2}: {}  sum {:#06x}", row.join(" "), kernel.phase_sum(p));
    }
    Ok(())
}

fn cmd_blend(args: BlendArgs) -> anyhow::Result<()> {
    let code: BlendCode = args.code.parse()?;
    println!(
        "{} = {:#010x}",
        code.name().unwrap_or("custom"),
        u32::from(code)
    );
    println!(
        "C = {} * C2 + {} * C1",
        decode_coefficient(code.k1()),
        decode_coefficient(code.k2())
    );
    println!(
        "A = {} * A2 + {} * A1",
        decode_coefficient(code.k3()),
        decode_coefficient(code.k4())
    );

    let spec = BlendSpec {
        code,
        global_src_alpha: args.global_src_alpha,
        global_dst_alpha: args.global_dst_alpha,
    };
    let cfg = resolve_blend(spec)?;
    println!(
        "background: {:?} reverse={} -> {}",
        cfg.dst.mode,
        cfg.dst.reverse,
        cfg.dst.symbolic(Side::Background)
    );
    println!(
        "source:     {:?} reverse={} -> {}",
        cfg.src.mode,
        cfg.src.reverse,
        cfg.src.symbolic(Side::Source)
    );
    println!(
        "src1_used={} src2_used={} global_alpha={:?}",
        cfg.src1_used, cfg.src2_used, cfg.global_alpha
    );
    Ok(())
}
