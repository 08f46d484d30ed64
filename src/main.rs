use std::process;

fn main() {
    if let Err(err) = flowscope::app::run() {
        eprintln!("flowscope: {err:#}");
        process::exit(1);
    }
}
