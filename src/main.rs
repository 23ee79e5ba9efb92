fn main() {
    if let Err(err) = candidate_refine::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
