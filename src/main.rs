fn main() {
    if let Err(err) = chord_grid::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
