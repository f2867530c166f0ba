use bricky::config::Config;

fn main() {
    serde_json::to_writer_pretty(std::io::stdout(), &Config::classic()).unwrap();
}
