use ansi_term::Colour;
use anyhow::{bail, Context, Result};
use clap::Parser;
use mips_pipe_rs::{assemble, render_record, render_record_tty, AssembleOption, PipeSim};

/// Upper bound on the source file size.
const MAX_SOURCE_SIZE: u64 = 1 << 20;

// MIPS-subset pipeline hazard simulator written in rust
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// input file path
    input: String,

    /// trace output filename (default is input%.trace)
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// print the parsed tables and dependency edges
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let meta = std::fs::metadata(&args.input)
        .with_context(|| format!("could not read file `{}`", &args.input))?;
    if meta.len() > MAX_SOURCE_SIZE {
        bail!(
            "input file `{}` exceeds {} bytes",
            &args.input,
            MAX_SOURCE_SIZE
        );
    }
    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("could not read file `{}`", &args.input))?;

    let prog = assemble(&content, AssembleOption::default().set_verbose(args.verbose))?;

    println!("{}", Colour::Green.bold().paint("==> Pipeline Simulator"));
    println!("    Stages: IF, ID, EX, MEM, WB");
    println!();

    let mut sim = PipeSim::init(prog)?;
    if args.verbose {
        eprintln!("{}", sim.program());
        dbg!(sim.edges());
    }
    while !sim.is_terminate() {
        let _out = sim.step();
    }

    let output_path = if let Some(path) = args.output {
        path
    } else {
        let mut path = std::path::PathBuf::from(&args.input);
        path.set_extension("trace");
        path.to_str().unwrap().to_string()
    };
    let mut text = String::new();
    for record in sim.trace() {
        text.push_str(&render_record(record, sim.program()));
    }
    text.push_str(&format!("Total clocks: {}\n", sim.cycle_count()));
    std::fs::write(&output_path, &text)
        .with_context(|| format!("could not write file `{}`", &output_path))?;

    println!("Total clocks: {}", sim.cycle_count());
    for record in sim.trace() {
        print!("{}", render_record_tty(record, sim.program()));
    }
    Ok(())
}
