//! Entry point for the `waypoint-tour` binary.
#![forbid(unsafe_code)]

fn main() {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();
    if let Err(err) = tour_cli::run() {
        eprintln!("waypoint-tour: {err}");
        std::process::exit(1);
    }
}
