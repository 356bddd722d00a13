//! Compile rung text from stdin and print the C statement sequence.
//!
//! Usage: echo 'XIC(Start)OTE(Motor);' | cargo run --example compile_rung

use std::io::{self, BufRead};

fn main() {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("read error: {}", e);
                std::process::exit(1);
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match rll::compile_rung(&line) {
            Ok(compiled) => {
                for w in &compiled.warnings {
                    eprintln!("warning: {}", w);
                }
                println!("{}", compiled.code);
            }
            Err(e) => {
                eprintln!("{}", e.format_with_context(&line));
            }
        }
    }
}
