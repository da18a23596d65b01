mod app;
mod event;
mod ui;

use crate::{
    app::{App, AppEvent},
    event::app_send,
};
use clap::Parser;
use sortviz::{
    Config, CoreOptions,
    model::{DEFAULT_DELAY_MS, DEFAULT_SIZE},
};

#[derive(Parser, Debug)]
struct Args {
    /// Number of values in generated arrays.
    #[arg(long, short = 'n', default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Delay between steps, in milliseconds.
    #[arg(long, short = 's', default_value_t = DEFAULT_DELAY_MS)]
    speed: u64,

    /// Seed for generated arrays.
    #[arg(long)]
    seed: Option<u64>,

    /// Initial values instead of a generated array, e.g. `--values 5,3,4,1,2`.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    values: Option<Vec<i64>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // initialize app
    let app = App::new(CoreOptions {
        init_logging: false,
        config: Config::new(args.size, args.speed),
        seed: args.seed,
        values: args.values,
    })?;

    // set up global logger
    let logger = AppLogger::new_with_default("warn,sortviz_tui=debug,sortviz=debug");
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(log::LevelFilter::Debug);

    // run tui
    let terminal = ratatui::init();
    let app_result = app.run(terminal).await;
    ratatui::restore();
    app_result
}

/// Logger that writes records to the log screen.
struct AppLogger {
    filter: env_filter::Filter,
}

impl AppLogger {
    fn new_with_default(default: &str) -> Self {
        let mut filter_builder = env_filter::Builder::new();
        match std::env::var("RUST_LOG") {
            Ok(filter) => filter_builder.parse(&filter),
            Err(_) => filter_builder.parse(default),
        };
        Self {
            filter: filter_builder.build(),
        }
    }
}

impl log::Log for AppLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if self.filter.matches(record) {
            app_send!(AppEvent::Log(format!(
                "[{}] {}",
                record.level(),
                record.args()
            )));
        }
    }

    fn flush(&self) {}
}
