use tracing_subscriber::EnvFilter;

fn main() {
    // stdout carries the transcript and the card summary
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    if let Err(err) = atm_engine::app::run(std::env::args()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
