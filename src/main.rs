use std::io;
use std::sync::Arc;

use clap::Parser;

use tile_wall::app::App;
use tile_wall::config::{Cli, EditorConfig};
use tile_wall::drivers::OutputDriver;
use tile_wall::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use tile_wall::log_buffer::{LogBufferHandle, set_global_log_buffer};
use tile_wall::probe::ImageProbe;
use tile_wall::tracing_sub;

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = EditorConfig::try_from(&cli)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let logs = LogBufferHandle::default();
    set_global_log_buffer(logs.clone());
    tracing_sub::init(config.log_level);
    tracing::info!(
        canvases = config.monitors.len() + 1,
        sources = config.sources.len(),
        "tile-wall starting"
    );

    let mut app = App::new(&config, Arc::new(ImageProbe)).with_log_buffer(logs);
    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let result = app.run(ConsoleInputDriver::new(), &mut output);
    output.exit()?;
    result
}
