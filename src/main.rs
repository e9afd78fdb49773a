fn main() {
    if let Err(err) = wage_clean::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
