use balanced_trees::avl_tree::AvlTree;
use balanced_trees::red_black_tree::RedBlackTree;
use balanced_trees::workload::{self, Config, Error, Report, USAGE};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{
    ColorChoice, CombinedLogger, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::env;
use std::fs::File;
use std::process;

fn init_logging(config: &Config) -> workload::Result<()> {
    let level = if config.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(ref path) = config.log_file {
        let file = File::create(path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        loggers.push(WriteLogger::new(LevelFilter::Debug, simplelog::Config::default(), file));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}

fn run(config: &Config) -> workload::Result<()> {
    let keys = workload::read_keys_or_empty(&config.data_path);
    if keys.is_empty() {
        error!(
            "Unable to get keys from `{}`. Check that the file exists and holds a list of integers.",
            config.data_path.display(),
        );
        process::exit(1);
    }

    let mut avl = AvlTree::new();
    let mut red_black = RedBlackTree::new();

    let timings = workload::fill_trees(&mut avl, &mut red_black, &keys);
    info!("Time to fill avl tree: {:?}.", timings.avl);
    info!("Time to fill red black tree: {:?}.", timings.red_black);

    if config.print_sorted {
        println!("Ordered keys from avl tree:");
        for key in avl.iter() {
            println!("{}", key);
        }
        println!("Ordered keys from red black tree:");
        for key in red_black.iter() {
            println!("{}", key);
        }
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!("Running {} random operations.", config.operations);
    let stats = workload::random_operations(&mut avl, &mut red_black, &mut rng, config.operations);

    let report = Report::new(keys.len(), timings, stats, &avl, &red_black);
    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        info!("{:?}", report);
    }
    Ok(())
}

fn main() {
    let config = match Config::from_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(Error::Usage(ref message)) if message == USAGE => {
            println!("{}", USAGE);
            return;
        },
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("{}", USAGE);
            process::exit(2);
        },
    };

    if let Err(err) = init_logging(&config) {
        eprintln!("{}", err);
        process::exit(1);
    }

    if let Err(err) = run(&config) {
        error!("{}", err);
        process::exit(1);
    }
}
