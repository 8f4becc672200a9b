use clap::{Parser, ValueEnum};
use tracing::info;

// Import from the library crate
use skyrunner::{
    logging, CameraControl, ControlState, FlightConfig, FlightSim, FrameInput, ModelKind,
};

/// Headless flight: runs a scripted sortie through the simulation core
/// and logs what the renderer would be handed.
#[derive(Parser, Debug)]
#[command(name = "skyrunner", version, about)]
struct Args {
    /// RON config file; defaults are used if it is missing or invalid
    #[arg(short, long, default_value = "config/flight.ron")]
    config: String,

    /// Override the motion model from the config
    #[arg(long, value_enum)]
    model: Option<ModelArg>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u32,

    /// Simulated refresh rate in Hz
    #[arg(long, default_value_t = 60.0)]
    hz: f32,

    /// Log a snapshot every N frames
    #[arg(long, default_value_t = 60)]
    every: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModelArg {
    Kinematic,
    #[value(alias = "rigid")]
    RigidBody,
}

impl From<ModelArg> for ModelKind {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Kinematic => ModelKind::Kinematic,
            ModelArg::RigidBody => ModelKind::RigidBody,
        }
    }
}

/// Thrust throughout, a slow weave on the mouse, a zoom tap every two
/// seconds and a short camera raise.
fn scripted_input(frame: u32) -> FrameInput {
    let t = frame as f32 / 60.0;
    FrameInput {
        control: ControlState {
            forward: true,
            backward: frame % 300 > 270,
            mouse_x: (t * 0.7).sin() * 6.0,
            mouse_y: (t * 0.3).cos() * 2.0,
        },
        camera: CameraControl {
            up: (90..120).contains(&(frame % 600)),
            down: false,
            zoom_toggle: frame % 120 < 3,
        },
    }
}

fn main() {
    logging::init();
    let args = Args::parse();

    let mut config = FlightConfig::load_or_default(&args.config);
    if let Some(model) = args.model {
        config.model = model.into();
    }

    let mut sim = match FlightSim::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            tracing::error!(error = %e, "cannot start simulation");
            std::process::exit(1);
        }
    };

    let dt = 1.0 / args.hz.max(1.0);
    let every = args.every.max(1);
    let mut warnings = 0u32;

    for frame in 0..args.frames {
        let snap = sim.frame(dt, scripted_input(frame));
        if snap.near_boundary {
            warnings += 1;
        }
        if frame % every == 0 {
            info!(
                frame,
                pos = %snap.craft_position,
                speed = snap.speed,
                camera = %snap.camera_position,
                zoom = ?snap.zoom,
                boundary = snap.boundary_distance,
                "snapshot"
            );
        }
    }

    let last = sim.snapshot();
    info!(
        frames = sim.frame_count(),
        warnings,
        pos = %last.craft_position,
        speed = last.speed,
        "sortie complete"
    );
}
