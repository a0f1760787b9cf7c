fn main() {
    if let Err(err) = pdataviewer_chord::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
