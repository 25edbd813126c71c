// zramtracker: compact and write back zram pages when memory pressure thresholds are crossed

use std::process::ExitCode;
use zramwatch::worker::Mode;
use zramwatch::{app, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();
    app::run(Mode::Control).await
}
