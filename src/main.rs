use clap::Parser;
use env_logger::{Builder, Env};
use log::{warn, LevelFilter};
use pwgen::{Args, PasswordGenerator};

fn main() {
    let args = Args::parse();
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if args.debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    if let Err(e) = ctrlc::set_handler(|| {
        eprintln!("Keyboard interrupt - exiting");
        std::process::exit(130);
    }) {
        warn!("could not install interrupt handler: {e}");
    }

    let pw = match PasswordGenerator::new(args) {
        Ok(pw) => pw,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };
    if let Err(e) = pw.run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
