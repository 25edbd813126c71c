// zraminfo: print zram capacity and backing-device statistics every minute

use std::process::ExitCode;
use zramwatch::worker::Mode;
use zramwatch::{app, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();
    app::run(Mode::Report).await
}
