//! Entry point for the `gemdex` binary.

use clap::Parser;
use gemdex_cli::{CliArgs, GemdexApp};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let app = match GemdexApp::from_args("gemdex", &args) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = app.run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
