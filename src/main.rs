fn main() {
    if let Err(err) = shotextract::cli::run() {
        if !shotextract::exit::is_reported(&err) {
            shotextract::ui::eprintln_error(&err);
        }
        std::process::exit(shotextract::exit::exit_code(&err));
    }
}
