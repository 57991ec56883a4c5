use std::io::{self, BufRead};

use clap::{App, Arg};

use reg_thompson::{compile_with_flags, CompileFlags};

fn read_pattern() -> io::Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn main() -> io::Result<()> {
    let matches = App::new("reg_thompson")
        .about("Compiles a regular expression into a Thompson NFA and prints its transitions")
        .arg(
            Arg::with_name("PATTERN")
                .help("Pattern over alphanumerics, '(', ')', '|' and '*'; read from stdin if absent")
                .index(1),
        )
        .arg(
            Arg::with_name("dot")
                .long("dot")
                .help("Print the automaton as GraphViz Dot code"),
        )
        .arg(
            Arg::with_name("explicit-concat")
                .long("explicit-concat")
                .help("The pattern already marks every concatenation with '.'"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Increase logging verbosity"),
        )
        .get_matches();

    // Init logger.
    let verbosity = matches.occurrences_of("verbose") as usize;
    if let Err(err) = stderrlog::new().verbosity(verbosity).init() {
        eprintln!("unable to initialize logging: {}", err);
    }

    let pattern = match matches.value_of("PATTERN") {
        Some(pattern) => pattern.to_string(),
        None => read_pattern()?,
    };

    let mut flags = CompileFlags::NO_FLAG;
    if matches.is_present("explicit-concat") {
        flags |= CompileFlags::EXPLICIT_CONCAT;
    }
    if verbosity > 0 {
        flags |= CompileFlags::DEBUG;
    }

    match compile_with_flags(&pattern, flags) {
        Ok(nfa) => {
            log::info!("{}", nfa.summary());
            if matches.is_present("dot") {
                println!("{}", nfa.to_dot());
            } else {
                print!("{}", nfa.transitions());
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.diagnostic(&pattern));
            std::process::exit(1)
        }
    }
}
