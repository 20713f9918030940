//! Reading forwarding tables and packet traces, and writing lookup results.
//!
//! A forwarding table holds one route per line, made of an IPv4 prefix and an output interface
//! separated by whitespace:
//!
//! ```text
//! 10.0.0.0/8      1
//! 10.1.0.0/16     2
//! ```
//!
//! A packet trace holds one IPv4 address per line. Blank lines are skipped in both formats. For
//! every packet, the [`ResultWriter`] writes a line `address;interface;accesses;nanoseconds`,
//! where the interface is `MISS` if no route matched, and finally a summary.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ipnet::Ipv4Net;

use crate::{Error, Lookup};

/// Iterator over the non-blank lines of a file, keeping track of the line number.
struct NumberedLines<R> {
    path: PathBuf,
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn new(path: PathBuf, reader: R) -> Self {
        Self {
            path,
            lines: reader.lines(),
            line: 0,
        }
    }

    fn next_line(&mut self) -> Option<Result<(usize, String), Error>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(Error::io(&self.path, e))),
            };
            self.line += 1;
            if !line.trim().is_empty() {
                return Some(Ok((self.line, line)));
            }
        }
    }

    fn malformed(&self, line: usize, content: &str) -> Error {
        Error::Parse {
            path: self.path.clone(),
            line,
            content: content.to_string(),
        }
    }
}

/// Reader for the routes of a forwarding table. It yields `(prefix, interface)` records in file
/// order.
///
/// ```
/// # use route_lookup::io::FibReader;
/// # use ipnet::Ipv4Net;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fib = "10.0.0.0/8 1\n\n10.1.0.0/16\t2\n";
/// let routes = FibReader::new("fib.txt", fib.as_bytes()).collect::<Result<Vec<_>, _>>()?;
/// let expected: Vec<(Ipv4Net, u32)> = vec![("10.0.0.0/8".parse()?, 1), ("10.1.0.0/16".parse()?, 2)];
/// assert_eq!(routes, expected);
/// # Ok(())
/// # }
/// ```
pub struct FibReader<R> {
    lines: NumberedLines<R>,
}

impl FibReader<BufReader<File>> {
    /// Open the forwarding table stored at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::new(path, BufReader::new(file)))
    }
}

impl<R: BufRead> FibReader<R> {
    /// Read a forwarding table from `reader`. `path` is only used for error messages.
    pub fn new(path: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            lines: NumberedLines::new(path.into(), reader),
        }
    }
}

impl<R: BufRead> Iterator for FibReader<R> {
    type Item = Result<(Ipv4Net, u32), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line, content) = match self.lines.next_line()? {
            Ok(x) => x,
            Err(e) => return Some(Err(e)),
        };
        Some(parse_route(&content).ok_or_else(|| self.lines.malformed(line, &content)))
    }
}

fn parse_route(line: &str) -> Option<(Ipv4Net, u32)> {
    let mut fields = line.split_whitespace();
    let prefix = fields.next()?.parse::<Ipv4Net>().ok()?;
    let out_interface = fields.next()?.parse::<u32>().ok()?;
    match fields.next() {
        Some(_) => None,
        None => Some((prefix, out_interface)),
    }
}

/// Reader for the destination addresses of a packet trace, yielded as `u32` in file order.
///
/// ```
/// # use route_lookup::io::PacketReader;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let trace = "10.1.2.3\n200.0.0.0\n";
/// let addrs = PacketReader::new("trace.txt", trace.as_bytes()).collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(addrs, vec![0x0a010203, 0xc8000000]);
/// # Ok(())
/// # }
/// ```
pub struct PacketReader<R> {
    lines: NumberedLines<R>,
}

impl PacketReader<BufReader<File>> {
    /// Open the packet trace stored at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::new(path, BufReader::new(file)))
    }
}

impl<R: BufRead> PacketReader<R> {
    /// Read a packet trace from `reader`. `path` is only used for error messages.
    pub fn new(path: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            lines: NumberedLines::new(path.into(), reader),
        }
    }
}

impl<R: BufRead> Iterator for PacketReader<R> {
    type Item = Result<u32, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line, content) = match self.lines.next_line()? {
            Ok(x) => x,
            Err(e) => return Some(Err(e)),
        };
        Some(
            content
                .trim()
                .parse::<Ipv4Addr>()
                .map(u32::from)
                .map_err(|_| self.lines.malformed(line, &content)),
        )
    }
}

/// Aggregated statistics over all processed packets.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Number of processed packets.
    pub packets: usize,
    /// Average number of node accesses per lookup.
    pub avg_accesses: f64,
    /// Average lookup time in nanoseconds.
    pub avg_time_ns: f64,
}

/// Sink for lookup results. Writes one line per packet, and the summary on
/// [`ResultWriter::finish`].
///
/// ```
/// # use route_lookup::Lookup;
/// # use route_lookup::io::ResultWriter;
/// # use std::time::Duration;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut out = Vec::new();
/// let mut writer = ResultWriter::new("trace.txt.out", &mut out);
/// writer.record(0x0a010203, Lookup { interface: 2, accesses: 3 }, Duration::from_nanos(120))?;
/// writer.record(0x0b000001, Lookup { interface: 0, accesses: 1 }, Duration::from_nanos(80))?;
/// let summary = writer.finish()?;
/// assert_eq!(summary.packets, 2);
/// assert_eq!(summary.avg_accesses, 2.0);
/// assert_eq!(summary.avg_time_ns, 100.0);
/// assert_eq!(
///     String::from_utf8(out)?,
///     "10.1.2.3;2;3;120\n\
///      11.0.0.1;MISS;1;80\n\
///      \n\
///      Packets processed= 2\n\
///      Average table accesses= 2.00\n\
///      Average packet processing time (nsecs)= 100.00\n"
/// );
/// # Ok(())
/// # }
/// ```
pub struct ResultWriter<W: Write> {
    path: PathBuf,
    out: W,
    packets: usize,
    total_accesses: u64,
    total_time: Duration,
}

impl ResultWriter<BufWriter<File>> {
    /// Create (or truncate) the output file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::new(path, BufWriter::new(file)))
    }
}

impl<W: Write> ResultWriter<W> {
    /// Write results into `out`. `path` is only used for error messages.
    pub fn new(path: impl Into<PathBuf>, out: W) -> Self {
        Self {
            path: path.into(),
            out,
            packets: 0,
            total_accesses: 0,
            total_time: Duration::ZERO,
        }
    }

    /// Write the result of looking up `addr`, which took `elapsed`.
    pub fn record(&mut self, addr: u32, lookup: Lookup, elapsed: Duration) -> Result<(), Error> {
        self.packets += 1;
        self.total_accesses += lookup.accesses as u64;
        self.total_time += elapsed;
        let addr = Ipv4Addr::from(addr);
        let res = if lookup.is_miss() {
            writeln!(self.out, "{addr};MISS;{};{}", lookup.accesses, elapsed.as_nanos())
        } else {
            writeln!(
                self.out,
                "{addr};{};{};{}",
                lookup.interface,
                lookup.accesses,
                elapsed.as_nanos()
            )
        };
        res.map_err(|e| Error::io(&self.path, e))
    }

    /// Compute the summary, write it, and flush the output.
    pub fn finish(mut self) -> Result<Summary, Error> {
        let summary = self.summary();
        let res = write!(
            self.out,
            "\nPackets processed= {}\n\
             Average table accesses= {:.2}\n\
             Average packet processing time (nsecs)= {:.2}\n",
            summary.packets, summary.avg_accesses, summary.avg_time_ns
        )
        .and_then(|_| self.out.flush());
        res.map_err(|e| Error::io(&self.path, e))?;
        Ok(summary)
    }

    /// Statistics over the packets recorded so far. The averages of an empty trace are zero.
    pub fn summary(&self) -> Summary {
        if self.packets == 0 {
            return Summary::default();
        }
        let n = self.packets as f64;
        Summary {
            packets: self.packets,
            avg_accesses: self.total_accesses as f64 / n,
            avg_time_ns: self.total_time.as_nanos() as f64 / n,
        }
    }
}

/// Path of the output file for the packet trace at `packets`: the same path with `.out` appended.
pub fn output_path(packets: impl AsRef<Path>) -> PathBuf {
    let mut path = packets.as_ref().as_os_str().to_owned();
    path.push(".out");
    path.into()
}
