fn main() {
    if let Err(err) = spend_bench::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
