use clap::Parser;
use color_print::cprintln;
use std::path::{Path, PathBuf};

use jackc::project::{self, Options, Output};
use jackc::util::display::{print_class, print_diag};
use jackc::{Config, Error};

#[derive(Debug, clap::Parser)]
#[clap(author, version, about)]
struct Args {
    /// Source file, or directory of source files
    input: String,

    /// Output directory [default: next to each source]
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Write every unit into one <dirname>.vm
    #[clap(short, long)]
    combine: bool,

    /// Number of worker threads
    #[clap(short, long)]
    jobs: Option<usize>,

    /// YAML config file
    #[clap(long)]
    config: Option<String>,

    /// Write <Name>T.xml token listings
    #[clap(short, long)]
    tokens: bool,

    /// Print the production trace of each unit as YAML
    #[clap(long)]
    trace: bool,

    /// Reject identifiers declared twice in one scope
    #[clap(long)]
    strict: bool,

    /// Enable verbose output
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    println!("Jack Compiler by kanade-k-1228");

    // 0. Settings: config file first, flags on top
    let config = match settings(&args) {
        Ok(config) => config,
        Err(e) => fail(&e, args.config.as_deref().unwrap_or_default()),
    };
    let opts = Options {
        strict: config.strict,
        tokens: args.tokens,
        trace: args.trace,
    };

    // 1. Collect source files
    println!("1. Collect Sources");
    let root = Path::new(&args.input);
    let sources = match project::collect_sources(root, &config.source_ext) {
        Ok(sources) => sources,
        Err(e) => fail(&e, &args.input),
    };
    for source in &sources {
        println!("  < {}", source.display());
    }

    // 2. Compile every unit
    println!("2. Compile ({} jobs)", config.workers());
    let units = project::compile_all(&sources, opts, config.workers());
    let mut failed = 0;
    for unit in &units {
        match &unit.result {
            Ok(compiled) => {
                cprintln!(
                    "  <g>ok</> {} ({} instructions)",
                    compiled.class.name,
                    compiled.class.insts.len()
                );
                if args.verbose {
                    print_class(&compiled.class);
                }
                if let Some(trace) = &compiled.trace {
                    match trace.to_yaml() {
                        Ok(yaml) => print!("{}", yaml),
                        Err(e) => cprintln!("<r,s>Failed to serialize trace</>: {}", e),
                    }
                }
            }
            Err(e) => {
                failed += 1;
                print_diag(e, &unit.name(), &unit.code);
            }
        }
    }

    // 3. Write outputs
    println!("3. Write Output");
    for output in project::write_outputs(&units, root, &config) {
        match output {
            Output::Written(path) => println!("  > {}", path.display()),
            Output::Skipped(path) => cprintln!(
                "  <y>skip</> {}, {} unit(s) failed",
                path.display(),
                failed
            ),
            Output::Failed(file, e) => {
                failed += 1;
                print_diag(&e, &file, "");
            }
        }
    }

    if failed > 0 {
        cprintln!("<red,bold>error</>: {} of {} unit(s) failed", failed, units.len());
        std::process::exit(1);
    }
    println!(
        "Successfully compiled {} unit(s) from {}",
        units.len(),
        args.input
    );
}

fn settings(args: &Args) -> Result<Config, Error> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(dir) = &args.output {
        config.output = Some(dir.clone());
    }
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }
    config.combine |= args.combine;
    config.strict |= args.strict;
    Ok(config)
}

fn fail(err: &Error, file: &str) -> ! {
    print_diag(err, file, "");
    std::process::exit(1);
}
