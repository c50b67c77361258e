//! wms main entrypoint.

use wms::run;

fn main() {
    println!();
    if let Err(e) = run() {
        if e.is_internal() {
            tracing::error!(error = %e, "command failed");
        }
        eprintln!("Error: {}", e.public_message());
        std::process::exit(1);
    }
}
