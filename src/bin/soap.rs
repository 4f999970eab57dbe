use soap_cells::{
    Canvas, DecompositionMode, DVec2, InputEvent, MouseButton, ReferenceImage, RegionPolicy,
    Rgb, ScriptedEvents, Session, SimulationWorld, SoapConfigBuilder, SoapError,
};

use clap::{Parser, ValueEnum};

use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Voronoi,
    Delaunay,
}

impl From<Mode> for DecompositionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Voronoi => DecompositionMode::Voronoi,
            Mode::Delaunay => DecompositionMode::Delaunay,
        }
    }
}

/// Run the cell simulation without a window and log what each frame draws
#[derive(Parser, Debug)]
struct Args {
    /// Reference image the cells are painted from
    #[arg(short, long)]
    image: PathBuf,

    /// Number of centers
    #[arg(short, long, default_value_t = 500)]
    cells: usize,

    /// Frames to run
    #[arg(short, long, default_value_t = 120)]
    frames: u64,

    /// RNG seed for center placement; random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Initial decomposition
    #[arg(short, long, value_enum, default_value_t = Mode::Voronoi)]
    mode: Mode,

    /// Poke at X,Y; repeat to poke on successive frames
    #[arg(short, long, value_parser = parse_point)]
    poke: Vec<DVec2>,

    /// Close border cells against the image rectangle instead of dropping them
    #[arg(long)]
    clip: bool,
}

fn parse_point(s: &str) -> Result<DVec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in '{s}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in '{s}': {e}"))?;
    Ok(DVec2::new(x, y))
}

/// Counts draw calls instead of rasterizing
#[derive(Default)]
struct CountingCanvas {
    frames: u64,
    polygons: u64,
    vertices: u64,
}

impl Canvas for CountingCanvas {
    fn clear(&mut self, _color: Rgb) {
        self.frames += 1;
    }

    fn fill_polygon(&mut self, vertices: &[DVec2], _color: Rgb) {
        self.polygons += 1;
        self.vertices += vertices.len() as u64;
    }
}

fn main() -> Result<(), SoapError> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    // load before building anything else; a bad image ends the run here
    let image = ReferenceImage::open(&args.image)?;

    let mut builder = SoapConfigBuilder::new()
        .cell_count(args.cells)?
        .initial_mode(args.mode.into());
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if args.clip {
        builder = builder.region_policy(RegionPolicy::ClipToBounds);
    }
    let config = builder.build()?;

    let world = SimulationWorld::new(config, image.bounds())?;
    tracing::info!(
        seed = config.seed,
        cells = config.cell_count,
        mode = config.initial_mode.name(),
        width = image.width(),
        height = image.height(),
        "world ready"
    );

    let mut events = ScriptedEvents::new(args.poke.iter().map(|&position| {
        vec![InputEvent::MouseDown {
            button: MouseButton::Left,
            position,
        }]
    }));
    let mut canvas = CountingCanvas::default();
    let mut session = Session::new(world, image);

    for _ in 0..args.frames {
        let report = session.step(&mut canvas, &mut events);
        let world = session.world();
        tracing::debug!(
            tick = world.ticks(),
            polygons = report.polygons,
            commands = report.commands,
            energy = world.kinetic_energy(),
            "frame"
        );
        if !report.running {
            break;
        }
    }

    tracing::info!(
        frames = canvas.frames,
        polygons = canvas.polygons,
        vertices = canvas.vertices,
        energy = session.world().kinetic_energy(),
        "done"
    );

    Ok(())
}
