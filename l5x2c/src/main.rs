//! l5x2c - Rockwell L5X to C translator CLI

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use l5x2c::Options;

#[derive(Parser)]
#[command(name = "l5x2c")]
#[command(version, about = "Converts a Rockwell L5X file into a C program", long_about = None)]
struct Cli {
    /// L5X input file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// C output file (not required with --list)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Stack size for the generated evaluation stack
    #[arg(
        long = "stack-size",
        visible_alias = "ss",
        value_name = "STACK_SIZE",
        default_value_t = 1000
    )]
    stack_size: u32,

    /// Scan time for the generated scan loop, in milliseconds
    #[arg(
        long = "scan-time",
        visible_alias = "st",
        value_name = "SCAN_TIME",
        default_value_t = 100
    )]
    scan_time: u32,

    /// Print the selected program constructs instead of translating
    #[arg(short = 'L', long = "list", value_enum, value_name = "CONSTRUCT")]
    list: Option<Construct>,

    /// Working program (for --list routines/rungs)
    #[arg(short, long, value_name = "PROGRAM")]
    program: Option<String>,

    /// Working routine (for --list rungs)
    #[arg(short, long, value_name = "ROUTINE")]
    routine: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Construct {
    Programs,
    Routines,
    Rungs,
    Tags,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(construct) = cli.list {
        return run_list(&cli, construct);
    }

    let Some(output) = cli.output.as_ref() else {
        eprintln!("Error: no output file specified");
        eprintln!("Usage: l5x2c INPUT OUTPUT [--stack-size N] [--scan-time MS]");
        return ExitCode::from(1);
    };

    let options = Options {
        stack_size: cli.stack_size,
        scan_time: cli.scan_time,
    };

    match l5x2c::translate_file(&cli.input, output, &options) {
        Ok(diagnostics) => {
            for diagnostic in &diagnostics {
                eprintln!("warning: {}", diagnostic);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run_list(cli: &Cli, construct: Construct) -> ExitCode {
    let extraction = match load_extraction(&cli.input) {
        Ok(e) => e,
        Err(message) => {
            eprintln!("Error: {}", message);
            return ExitCode::from(1);
        }
    };
    let data = &extraction.data;

    match construct {
        Construct::Programs => {
            for program in &data.programs {
                println!("{}", program.name);
            }
        }
        Construct::Routines => {
            let Some(program) = find_program(data, cli.program.as_deref()) else {
                eprintln!("Error: define the working program to list the routines");
                return ExitCode::from(1);
            };
            for routine in &program.routines {
                println!("{}", routine.name);
            }
        }
        Construct::Rungs => {
            let Some(program) = find_program(data, cli.program.as_deref()) else {
                eprintln!("Error: define the working program to list the rungs");
                return ExitCode::from(1);
            };
            let Some(routine) = cli
                .routine
                .as_deref()
                .and_then(|name| program.routines.iter().find(|r| r.name == name))
            else {
                eprintln!("Error: define the working routine to list the rungs");
                return ExitCode::from(1);
            };
            for rung in &routine.rungs {
                println!("{}", rung.logic);
            }
        }
        Construct::Tags => {
            for tag in &data.controller_tags {
                println!("{}", tag.name);
            }
            for program in &data.programs {
                for tag in &program.tags {
                    println!("{}/{}", program.name, tag.name);
                }
            }
        }
    }
    ExitCode::SUCCESS
}

fn find_program<'a>(
    data: &'a l5x::ProjectData,
    name: Option<&str>,
) -> Option<&'a l5x::ProgramData> {
    let name = name?;
    data.programs.iter().find(|p| p.name == name)
}

fn load_extraction(input: &Path) -> Result<l5x::Extraction, String> {
    let xml = std::fs::read_to_string(input)
        .map_err(|e| format!("Failed to read '{}': {}", input.display(), e))?;
    let project = l5x::from_str(&xml).map_err(|e| e.to_string())?;
    l5x::extract(&project).map_err(|e| e.to_string())
}
