//! Look up every packet of a trace in a forwarding table.
//!
//! Usage: `route_lookup FIB InputPacketFile`. The results are written to `InputPacketFile.out`.
//! Set `RUST_LOG=info` (or `debug`) to see the size of the trie before and after compression.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use ipnet::Ipv4Net;
use route_lookup::io::{output_path, FibReader, PacketReader, ResultWriter, Summary};
use route_lookup::{Error, RouteTrie};

#[derive(Parser, Debug, PartialEq)]
#[command(name = "route_lookup", version)]
#[command(about = "Look up every packet of a trace in a forwarding table")]
struct Args {
    /// Forwarding table, one `a.b.c.d/len interface` record per line
    #[arg(value_name = "FIB")]
    fib: PathBuf,

    /// Packet trace, one destination address per line. Results go to `<InputPacketFile>.out`
    #[arg(value_name = "InputPacketFile")]
    packets: PathBuf,
}

impl Args {
    /// Path of the result file.
    fn output(&self) -> PathBuf {
        output_path(&self.packets)
    }
}

fn run(args: &Args) -> Result<Summary, Error> {
    let mut trie: RouteTrie<Ipv4Net> = RouteTrie::new();
    for route in FibReader::open(&args.fib)? {
        let (prefix, out_interface) = route?;
        trie.insert(prefix, out_interface)?;
    }
    log::info!("number of nodes before compression: {}", trie.node_count());
    trie.compress();
    log::info!("number of nodes after compression: {}", trie.node_count());

    let packets = PacketReader::open(&args.packets)?;
    let mut writer = ResultWriter::create(args.output())?;
    for addr in packets {
        let addr = addr?;
        let start = Instant::now();
        let lookup = trie.search(addr);
        let elapsed = start.elapsed();
        writer.record(addr, lookup, elapsed)?;
    }
    let summary = writer.finish()?;

    let released = trie.clear();
    log::debug!("released {released} nodes");
    Ok(summary)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // clap exits with 2 on usage errors
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&args) {
        Ok(summary) => {
            log::info!(
                "processed {} packets, {:.2} accesses and {:.2} ns per lookup on average",
                summary.packets,
                summary.avg_accesses,
                summary.avg_time_ns
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            ExitCode::from(1)
        }
    }
}
