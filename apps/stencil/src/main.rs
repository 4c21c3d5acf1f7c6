fn main() {
    if let Err(e) = stencil_cli::run_cli() {
        stencil_logger::error(&e.to_string());
        std::process::exit(1);
    }
}
