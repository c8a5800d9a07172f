fn main() {
    if let Err(err) = connected_scatter::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
