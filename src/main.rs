extern crate env_logger;
#[macro_use]
extern crate log;

extern crate sequential_utility_rules;

use std::env;
use std::io::Write;
use std::process;
use std::time::Instant;

use sequential_utility_rules::config::USAGE;
use sequential_utility_rules::{run, Config, Error};

fn main() {
    let start = Instant::now();
    env_logger::Builder::from_default_env()
        .format(move |buf, record| {
            let elapsed = start.elapsed();
            writeln!(
                buf,
                "{}, {}.{:09}, {}, {}",
                record.level(),
                elapsed.as_secs(),
                elapsed.subsec_nanos(),
                record.module_path().unwrap_or("-"),
                record.args()
            )
        })
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(Error::Usage(message)) => {
            eprintln!("{}\n{}", message, USAGE);
            process::exit(2);
        }
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    };
    debug!("{:?}", config);

    match run(&config) {
        Ok(summary) => {
            info!("{:?}", summary);
            println!("High-Utility Partial Ordered Sequential Rules Mining completed successfully!");
            println!("Tree nodes: {}, Rules: {}", summary.tree.nodes, summary.rules);
            println!("Execution Time: {} seconds", summary.elapsed.as_secs_f64());
        }
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    }
}
