//! Synthetic output generator for exercising runcmd.
//!
//! Writes numbered lines to stdout until the requested volume is reached,
//! optionally sleeping first. Useful for testing how runcmd handles large
//! or slow output, e.g. `runcmd -t 5 "genout 100 m"` streams ~100 MB.

use std::io::{BufWriter, Write};
use std::time::Duration;

const LINE_PREFIX: &str = "This is a test line from genout: ";

const USAGE: &str = "Usage: genout <SIZE> <k|m|g> [DELAY_SECS]
  SIZE        amount of output to generate, in UNIT
  k|m|g       unit: kilobytes, megabytes, or gigabytes
  DELAY_SECS  optional delay before any output is written";

fn unit_bytes(unit: &str) -> Option<u64> {
    match unit.to_ascii_lowercase().as_str() {
        "k" => Some(1024),
        "m" => Some(1024 * 1024),
        "g" => Some(1024 * 1024 * 1024),
        _ => None,
    }
}

fn generate(size: u64, out: &mut impl Write) -> std::io::Result<()> {
    let mut written: u64 = 0;
    let mut i: u64 = 0;
    while written < size {
        let line = format!("{}{}\n", LINE_PREFIX, i);
        out.write_all(line.as_bytes())?;
        written += line.len() as u64;
        i += 1;
    }
    writeln!(out, "Written {} bytes.", written)?;
    out.flush()
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let size: u64 = match args[0].parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("genout: size must be an integer");
            std::process::exit(2);
        }
    };
    let Some(unit) = unit_bytes(&args[1]) else {
        eprintln!("genout: unknown unit '{}', expected k, m, or g", args[1]);
        std::process::exit(2);
    };
    let Some(total) = size.checked_mul(unit) else {
        eprintln!("genout: size {} {} overflows", size, args[1]);
        std::process::exit(2);
    };
    if total == 0 {
        eprintln!("genout: size must be > 0");
        std::process::exit(2);
    }

    if let Some(delay) = args.get(2) {
        match delay.parse::<f64>() {
            Ok(secs) if secs > 0.0 => std::thread::sleep(Duration::from_secs_f64(secs)),
            Ok(_) => {}
            Err(_) => {
                eprintln!("genout: delay must be a number of seconds");
                std::process::exit(2);
            }
        }
    }

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if let Err(e) = generate(total, &mut out) {
        // Broken pipe just means the consumer stopped reading.
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            eprintln!("genout: {}", e);
            std::process::exit(1);
        }
    }
}
