use std::error::Error;
use std::path::{Path, PathBuf};

use campusnav::{Coord, Mode, Stop};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] campusnav::osm::Error);

#[derive(Debug, thiserror::Error)]
#[error("invalid stop {0:?}: expected NAME:LAT,LON")]
struct StopParseError(String);

#[derive(Parser)]
struct Cli {
    /// The path to the OSM file
    osm_file: PathBuf,

    /// Format of the OSM file
    #[arg(long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Auto,
    Xml,
    XmlGz,
    XmlBz2,
}

#[derive(Subcommand)]
enum Command {
    /// List all named locations
    Locations,

    /// Find the shortest path between two positions
    Path {
        /// Latitude of the start point
        start_lat: f64,

        /// Longitude of the start point
        start_lon: f64,

        /// Latitude of the end point
        end_lat: f64,

        /// Longitude of the end point
        end_lon: f64,

        /// Travel mode ("walk" or "bike"). If missing, both modes are compared.
        #[arg(long)]
        mode: Option<Mode>,
    },

    /// Visit multiple stops, nearest first
    Tour {
        /// Latitude of the start point
        start_lat: f64,

        /// Longitude of the start point
        start_lon: f64,

        /// Travel mode ("walk" or "bike")
        #[arg(long, default_value_t = Mode::Walk)]
        mode: Mode,

        /// Stop to visit, as NAME:LAT,LON. May be repeated.
        #[arg(long = "stop", value_parser = parse_stop, required = true)]
        stops: Vec<Stop>,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let engine = load_engine(&cli.osm_file, cli.format)?;

    match cli.command {
        Command::Locations => {
            for l in engine.locations() {
                println!(
                    "{}\t{}\t{}\t{} outline points",
                    l.name,
                    l.anchor.lat,
                    l.anchor.lon,
                    l.polygon.len()
                );
            }
        }

        Command::Path {
            start_lat,
            start_lon,
            end_lat,
            end_lon,
            mode,
        } => {
            let start = Coord::new(start_lat, start_lon);
            let end = Coord::new(end_lat, end_lon);

            let (mode, path) = match mode {
                Some(mode) => (mode, engine.find_path(start, end, mode)),
                None => {
                    let c = engine.compare_modes(start, end);
                    log::info!(
                        "walk: {:.0} m, bike: {:.0} m - recommended: {}",
                        c.walk.distance,
                        c.bike.distance,
                        c.recommended
                    );
                    match c.recommended {
                        Mode::Walk => (Mode::Walk, c.walk),
                        Mode::Bike => (Mode::Bike, c.bike),
                    }
                }
            };

            if !path.is_found() {
                return Err(format!("no {} path between the given positions", mode).into());
            }

            print_geojson(
                &path.coords,
                &[
                    ("mode", format!("\"{}\"", mode)),
                    ("distance", format!("{:.1}", path.distance)),
                    ("time", format!("{:.0}", mode.travel_time(path.distance))),
                ],
            );
        }

        Command::Tour {
            start_lat,
            start_lon,
            mode,
            stops,
        } => {
            let tour = engine.find_tour(Coord::new(start_lat, start_lon), mode, &stops);
            for name in &tour.unreachable {
                log::warn!("{} can't be reached in {} mode", name, mode);
            }

            let sequence = tour
                .sequence
                .iter()
                .map(|name| format!("{:?}", name))
                .collect::<Vec<_>>()
                .join(", ");

            print_geojson(
                &tour.coords,
                &[
                    ("mode", format!("\"{}\"", mode)),
                    ("distance", format!("{:.1}", tour.distance)),
                    ("time", format!("{:.0}", mode.travel_time(tour.distance))),
                    ("sequence", format!("[{}]", sequence)),
                ],
            );
        }
    }

    Ok(())
}

fn print_geojson(coords: &[Coord], properties: &[(&str, String)]) {
    println!("{{");
    println!("  \"type\": \"FeatureCollection\",");
    println!("  \"features\": [");
    println!("    {{");
    println!("      \"type\": \"Feature\",");

    println!("      \"properties\": {{");
    let mut props = properties.iter().peekable();
    while let Some((key, value)) = props.next() {
        let suffix = if props.peek().is_some() { "," } else { "" };
        println!("        \"{}\": {}{}", key, value, suffix);
    }
    println!("      }},");

    println!("      \"geometry\": {{");
    println!("        \"type\": \"LineString\",");
    println!("        \"coordinates\": [");

    let mut coords = coords.iter().peekable();
    while let Some(c) = coords.next() {
        let suffix = if coords.peek().is_some() { "," } else { "" };
        println!("          [{}, {}]{}", c.lon, c.lat, suffix);
    }

    println!("        ]");
    println!("      }}");
    println!("    }}");
    println!("  ]");
    println!("}}");
}

fn parse_stop(s: &str) -> Result<Stop, StopParseError> {
    let err = || StopParseError(s.to_string());
    let (name, pos) = s.rsplit_once(':').ok_or_else(err)?;
    let (lat, lon) = pos.split_once(',').ok_or_else(err)?;
    let lat: f64 = lat.trim().parse().map_err(|_| err())?;
    let lon: f64 = lon.trim().parse().map_err(|_| err())?;
    Ok(Stop::new(name, Coord::new(lat, lon)))
}

fn load_engine<P: AsRef<Path>>(path: P, format: Format) -> Result<campusnav::Engine, GraphLoadError> {
    let options = campusnav::osm::Options {
        file_format: match format {
            Format::Auto => campusnav::osm::FileFormat::Unknown,
            Format::Xml => campusnav::osm::FileFormat::Xml,
            Format::XmlGz => campusnav::osm::FileFormat::XmlGz,
            Format::XmlBz2 => campusnav::osm::FileFormat::XmlBz2,
        },
        ..campusnav::osm::Options::default()
    };
    match campusnav::osm::load_from_file(&options, path.as_ref()) {
        Ok(engine) => Ok(engine),
        Err(e) => Err(GraphLoadError(PathBuf::from(path.as_ref()), e)),
    }
}
