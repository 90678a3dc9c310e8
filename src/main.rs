//! Shipwright binary entry point.

fn main() {
    if let Err(error) = shipwright::cli::run() {
        shipwright::ui::output::error(format!("{error:#}"));
        std::process::exit(1);
    }
}
