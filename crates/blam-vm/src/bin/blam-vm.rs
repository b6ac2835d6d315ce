// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Jan Wedekind

//! Command line driver for the Blam VM.
//!
//! Reads a BLC program bitstream, optionally applies it to a data stream
//! and writes the byte list it produces to stdout. Exits zero on clean
//! termination and nonzero on parse failure or memory exhaustion.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use blam_vm::church::Library;
use blam_vm::codec;
use blam_vm::heap::{Heap, DEFAULT_MAX_CELLS, DEFAULT_MAX_ROOTS};
use blam_vm::stream;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name = "blam-vm",
    version,
    about = "Binary lambda calculus virtual machine"
)]
struct Args {
    /// BLC program bitstream; '-' reads the program from stdin.
    program: PathBuf,
    /// Optional data stream the program is applied to.
    data: Option<PathBuf>,
    /// Arena capacity in cells.
    #[arg(long, default_value_t = DEFAULT_MAX_CELLS)]
    cells: usize,
    /// Root register capacity.
    #[arg(long, default_value_t = DEFAULT_MAX_ROOTS)]
    registers: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut heap = Heap::with_limits(args.cells, args.registers);
    let lib = Library::new(&mut heap).context("bootstrap library")?;

    let expr = if args.program.as_os_str() == "-" {
        codec::read_expr(&mut heap, io::stdin().lock())
    } else {
        let file = File::open(&args.program)
            .with_context(|| format!("open {}", args.program.display()))?;
        codec::read_expr(&mut heap, file)
    }
    .context("parse program")?;

    heap.push(expr).context("root program")?;
    let program = match &args.data {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            let data = stream::from_file(&mut heap, file)?;
            heap.make_call(expr, data)?
        }
        None => expr,
    };
    heap.pop(1);

    let mut stdout = io::stdout().lock();
    stream::output(&mut heap, &lib, program, &mut stdout).context("run program")?;
    Ok(())
}
