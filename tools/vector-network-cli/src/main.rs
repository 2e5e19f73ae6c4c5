use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fern::colors::{Color, ColoredLevelConfig};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use vector_network::consts::DEFAULT_STAR_INNER_RADIUS;
use vector_network::{OptimizationConfig, PlanarizeConfig, Rect, StarPolygon, VectorNetwork};

#[derive(Parser)]
#[command(name = "vector-network")]
#[command(about = "Import, planarize and inspect vector networks stored as JSON")]
struct Cli {
	/// JSON file with `optimize` and `planarize` settings; command line flags take precedence
	#[arg(short, long, global = true)]
	config: Option<PathBuf>,

	/// Log more detail to stderr (repeat for more)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Convert SVG path data into a network
	Import {
		/// Path data, or `-` to read it from stdin
		path_data: String,
	},
	/// Convert a network into SVG path data
	Export {
		/// Network JSON file, or `-` for stdin
		input: PathBuf,
	},
	/// Split every crossing so that segments only meet at vertices
	Planarize {
		input: PathBuf,
		/// Use exact subdivision tangents even for straight segments
		#[arg(long)]
		exact: bool,
	},
	/// Print the path data of every closed region, one per line
	Loops {
		input: PathBuf,
		/// Skip planarization because the network has no crossings
		#[arg(long)]
		assume_planar: bool,
	},
	/// Merge duplicate vertices and segments
	Optimize {
		input: PathBuf,
		/// Merge vertices closer than this on both axes
		#[arg(long)]
		tolerance: Option<f64>,
		/// Keep vertices that no segment references
		#[arg(long)]
		keep_unused: bool,
	},
	/// Print the bounding box
	Bbox {
		input: PathBuf,
		/// Bound the control points instead of the curves
		#[arg(long)]
		approx: bool,
	},
	/// Generate a shape
	Shape {
		#[arg(value_enum)]
		kind: ShapeKind,
		#[command(flatten)]
		rect: RectArgs,
		/// Corners of a polygon or tips of a star
		#[arg(long, default_value_t = 5)]
		points: usize,
		/// Inner radius of a star as a fraction of its outer radius
		#[arg(long, default_value_t = DEFAULT_STAR_INNER_RADIUS)]
		inner_radius: f64,
		/// Print path data instead of JSON
		#[arg(long)]
		path_data: bool,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShapeKind {
	Rect,
	Ellipse,
	Polygon,
	Star,
}

#[derive(Debug, Clone, Copy, Args)]
struct RectArgs {
	#[arg(long, default_value_t = 0.)]
	x: f64,
	#[arg(long, default_value_t = 0.)]
	y: f64,
	#[arg(long, default_value_t = 100.)]
	width: f64,
	#[arg(long, default_value_t = 100.)]
	height: f64,
}

impl From<RectArgs> for Rect {
	fn from(args: RectArgs) -> Self {
		Rect::new(args.x, args.y, args.width, args.height)
	}
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct Settings {
	optimize: OptimizationConfig,
	planarize: PlanarizeConfig,
}

fn init_logging(verbosity: u8) -> Result<()> {
	let colors = ColoredLevelConfig::new().debug(Color::Magenta).info(Color::Green).warn(Color::Yellow).error(Color::Red);
	let level = match verbosity {
		0 => log::LevelFilter::Warn,
		1 => log::LevelFilter::Info,
		2 => log::LevelFilter::Debug,
		_ => log::LevelFilter::Trace,
	};

	fern::Dispatch::new()
		.chain(std::io::stderr())
		.level(level)
		.format(move |out, message, record| {
			out.finish(format_args!(
				"[{}]{} {}",
				// Only the level is colored
				colors.color(record.level()),
				chrono::Utc::now().format("[%Y-%m-%d %H:%M:%S]"),
				message
			))
		})
		.apply()
		.context("Failed to install the logger")
}

fn read_input(path: &Path) -> Result<String> {
	if path == Path::new("-") {
		let mut input = String::new();
		std::io::stdin().read_to_string(&mut input).context("Failed to read stdin")?;
		return Ok(input);
	}
	fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_network(path: &Path) -> Result<VectorNetwork> {
	let network: VectorNetwork = serde_json::from_str(&read_input(path)?).with_context(|| format!("Failed to parse the network in {}", path.display()))?;
	network.validate().with_context(|| format!("Invalid network in {}", path.display()))?;
	log::info!("Read {} vertices and {} segments from {}", network.vertices.len(), network.segments.len(), path.display());
	Ok(network)
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
	let Some(path) = path else { return Ok(Settings::default()) };
	serde_json::from_str(&read_input(path)?).with_context(|| format!("Failed to parse the settings in {}", path.display()))
}

fn to_json(network: &VectorNetwork) -> Result<String> {
	serde_json::to_string_pretty(network).context("Failed to serialize the network")
}

fn run(command: Command, settings: Settings) -> Result<String> {
	match command {
		Command::Import { path_data } => {
			let path_data = if path_data == "-" { read_input(Path::new("-"))? } else { path_data };
			to_json(&VectorNetwork::from_svg_path_data(path_data.trim())?)
		}
		Command::Export { input } => Ok(read_network(&input)?.to_svg_path_data()),
		Command::Planarize { input, exact } => {
			let config = PlanarizeConfig {
				preserve_zero: settings.planarize.preserve_zero && !exact,
			};
			to_json(&read_network(&input)?.planarize(&config))
		}
		Command::Loops { input, assume_planar } => {
			let mut network = read_network(&input)?;
			if !assume_planar {
				network = network.planarize(&settings.planarize);
			}
			let lines = network.loops().iter().map(|face| network.loop_path_data(face)).collect::<Result<Vec<_>, _>>()?;
			Ok(lines.join("\n"))
		}
		Command::Optimize { input, tolerance, keep_unused } => {
			let config = OptimizationConfig {
				vertex_tolerance: tolerance.unwrap_or(settings.optimize.vertex_tolerance),
				remove_unused_vertices: settings.optimize.remove_unused_vertices && !keep_unused,
			};
			to_json(&read_network(&input)?.optimize(&config))
		}
		Command::Bbox { input, approx } => {
			let network = read_network(&input)?;
			let bbox = if approx { network.bbox_approx() } else { network.bbox() };
			serde_json::to_string(&bbox).context("Failed to serialize the bounding box")
		}
		Command::Shape {
			kind,
			rect,
			points,
			inner_radius,
			path_data,
		} => {
			let rect = Rect::from(rect);
			let network = match kind {
				ShapeKind::Rect => VectorNetwork::from_rect(rect),
				ShapeKind::Ellipse => VectorNetwork::from_ellipse(rect),
				ShapeKind::Polygon => VectorNetwork::from_regular_polygon(rect, points),
				ShapeKind::Star => VectorNetwork::from_regular_star_polygon(StarPolygon { rect, points, inner_radius }),
			};
			if path_data { Ok(network.to_svg_path_data()) } else { to_json(&network) }
		}
	}
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.verbose)?;

	let settings = load_settings(cli.config.as_deref())?;
	log::debug!("Using {settings:?}");

	let output = run(cli.command, settings)?;
	println!("{output}");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn verify_cli() {
		use clap::CommandFactory;
		Cli::command().debug_assert();
	}

	#[test]
	fn test_parse_arguments() {
		let cli = Cli::try_parse_from(["vector-network", "-vv", "optimize", "net.json", "--tolerance", "0.5"]).unwrap();
		assert_eq!(cli.verbose, 2);
		assert!(matches!(cli.command, Command::Optimize { tolerance: Some(0.5), keep_unused: false, .. }));

		let cli = Cli::try_parse_from(["vector-network", "shape", "star", "--points", "7", "--width", "50"]).unwrap();
		let Command::Shape { kind, rect, points, inner_radius, .. } = cli.command else { panic!("Expected a shape command") };
		assert!(matches!(kind, ShapeKind::Star));
		assert_eq!((rect.width, rect.height, points, inner_radius), (50., 100., 7, DEFAULT_STAR_INNER_RADIUS));
	}

	#[test]
	fn test_settings() {
		let settings: Settings = serde_json::from_str(r#"{ "optimize": { "vertex_tolerance": 0.25 } }"#).unwrap();
		assert_eq!(settings.optimize.vertex_tolerance, 0.25);
		assert!(settings.optimize.remove_unused_vertices);
		assert_eq!(settings.planarize, PlanarizeConfig::default());

		assert_eq!(load_settings(None).unwrap(), Settings::default());
	}

	#[test]
	fn test_import_and_shape() {
		let json = run(Command::Import { path_data: "M0 0 L10 0 L10 10 Z".to_string() }, Settings::default()).unwrap();
		let network: VectorNetwork = serde_json::from_str(&json).unwrap();
		assert_eq!(network.vertices.len(), 3);
		assert_eq!(network.segments.len(), 3);

		let rect = RectArgs { x: 0., y: 0., width: 10., height: 10. };
		let json = run(
			Command::Shape {
				kind: ShapeKind::Rect,
				rect,
				points: 5,
				inner_radius: DEFAULT_STAR_INNER_RADIUS,
				path_data: false,
			},
			Settings::default(),
		)
		.unwrap();
		let shape: VectorNetwork = serde_json::from_str(&json).unwrap();
		assert_eq!(shape, VectorNetwork::from_rect(Rect::new(0., 0., 10., 10.)));

		assert!(run(Command::Import { path_data: "M0 0 Q1 1 2 0".to_string() }, Settings::default()).is_err());
	}
}
