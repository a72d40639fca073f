fn main() {
    if let Err(e) = mediscript_lib::run() {
        eprintln!("mediscript: {e}");
        std::process::exit(1);
    }
}
