//! Blanket CLI and REPL
//!
//! Usage:
//!   blanket                    - Start interactive REPL
//!   blanket repl               - Start interactive REPL
//!   blanket eval <expr>...     - Evaluate expressions in one session
//!   blanket help               - Show help message

use std::env;
use std::process;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use blanket::{BlanketError, Session, Value, VERSION};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        run_repl();
        return;
    }

    match args[1].as_str() {
        "repl" => run_repl(),
        "eval" => {
            if args.len() < 3 {
                eprintln!("{}: missing expression", "error".red());
                eprintln!("Usage: blanket eval <expr>...");
                process::exit(1);
            }
            run_expressions(&args[2..]);
        }
        "help" | "--help" | "-h" => print_help(),
        "version" | "--version" | "-v" => println!("Blanket {}", VERSION),
        _ => {
            eprintln!("{}: unknown command '{}'", "error".red(), args[1]);
            print_help();
            process::exit(1);
        }
    }
}

fn print_help() {
    println!("{}", "Blanket".cyan().bold());
    println!("A tiny expression language");
    println!("{} {}\n", "Version".cyan(), VERSION);
    println!("{}", "USAGE:".yellow());
    println!("  blanket                  Start interactive REPL");
    println!("  blanket repl             Start interactive REPL");
    println!("  blanket eval <expr>...   Evaluate expressions in one session");
    println!("  blanket help             Show this help message");
    println!("  blanket version          Show version\n");
    println!("{}", "EXAMPLES:".yellow());
    println!("  blanket eval \"sclr x = 4\" \"x ^ 2\"");
    println!("  RUST_LOG=blanket=debug blanket repl\n");
    print_language_help();
}

fn print_language_help() {
    println!("{}", "LANGUAGE FEATURES:".yellow());
    println!("  1 + 2 * 3                Arithmetic, ^ for powers");
    println!("  sclr x = 10              Variable binding");
    println!("  x >= 5 and not x == 7    Comparison and logic");
    println!("  if x > 5 then 1 elif x > 0 then 2 else 3");
    println!("                           Conditional expression");
}

fn run_expressions(sources: &[String]) {
    let mut session = Session::new();

    for source in sources {
        match session.evaluate(source) {
            Ok(value) => print_value(value),
            Err(err) => {
                report(&err);
                process::exit(1);
            }
        }
    }
}

fn run_repl() {
    println!("{} {} - {}",
        "Blanket".cyan().bold(),
        VERSION.cyan(),
        "A tiny expression language".dimmed()
    );
    println!("Type {} to exit, {} for help\n",
        "exit".yellow(),
        "help".yellow()
    );

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("{}: cannot start REPL: {}", "error".red(), err);
            process::exit(1);
        }
    };

    // Bindings persist across REPL lines
    let mut session = Session::new();

    loop {
        match rl.readline(&format!("{} ", "blanket>".green().bold())) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match line {
                    "exit" | "quit" => {
                        println!("{}", "Goodbye!".cyan());
                        break;
                    }
                    "help" => {
                        print_repl_help();
                        continue;
                    }
                    "clear" => {
                        session.reset();
                        println!("{}", "State cleared.".dimmed());
                        continue;
                    }
                    _ => {}
                }

                match session.evaluate(line) {
                    Ok(value) => print_value(value),
                    Err(err) => report(&err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".cyan());
                break;
            }
            Err(err) => {
                eprintln!("{}: {:?}", "error".red(), err);
                break;
            }
        }
    }
}

/// Absent values print nothing
fn print_value(value: Option<Value>) {
    if let Some(value) = value {
        println!("{} {}", "=>".dimmed(), format!("{}", value).cyan());
    }
}

fn report(err: &BlanketError) {
    eprintln!("{}", format!("{}", err).red());
    if let Some(excerpt) = err.excerpt() {
        eprintln!("{}", excerpt.dimmed());
    }
}

fn print_repl_help() {
    println!("{}", "REPL Commands:".yellow());
    println!("  exit, quit   Exit the REPL");
    println!("  clear        Forget all variables");
    println!("  help         Show this help\n");
    print_language_help();
}
