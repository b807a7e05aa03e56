use std::io::Write;

use crate::dispatcher::UnitConsumer;

/// Streams every binary unit into a sink, by default an in-memory buffer.
///
/// Sink write failures do not abort the read pass; their messages are kept in
/// [`failures`](Self::failures) for the caller to inspect afterwards.
#[derive(Debug, Default)]
pub struct WholeBinaryCollector<W: Write = Vec<u8>> {
    sink: W,
    failures: Vec<String>,
}

impl WholeBinaryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &[u8] {
        &self.sink
    }

    pub fn into_data(self) -> Vec<u8> {
        self.sink
    }
}

impl<W: Write> WholeBinaryCollector<W> {
    pub fn with_sink(sink: W) -> Self {
        Self {
            sink,
            failures: Vec::new(),
        }
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn into_sink(self) -> W {
        self.sink
    }
}

impl<W: Write> UnitConsumer<[u8]> for WholeBinaryCollector<W> {
    fn accept(&mut self, unit: &[u8]) {
        if let Err(err) = self.sink.write_all(unit) {
            self.failures.push(err.to_string());
        }
    }
}

/// Concatenates every text unit.
///
/// Line units arrive without their terminators, so collecting a line-wise read
/// yields the lines run together.
#[derive(Debug, Default)]
pub struct WholeTextCollector {
    text: String,
}

impl WholeTextCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl UnitConsumer<str> for WholeTextCollector {
    fn accept(&mut self, unit: &str) {
        self.text.push_str(unit);
    }
}

/// Keeps the first `limit` text units and ignores the rest.
#[derive(Debug)]
pub struct FirstNLinesCollector {
    limit: usize,
    lines: Vec<String>,
    seen: usize,
}

impl FirstNLinesCollector {
    /// A limit of zero is raised to one.
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            lines: Vec::new(),
            seen: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Units offered so far, including the ignored ones.
    pub fn seen(&self) -> usize {
        self.seen
    }
}

impl UnitConsumer<str> for FirstNLinesCollector {
    fn accept(&mut self, unit: &str) {
        self.seen += 1;
        if self.lines.len() < self.limit {
            self.lines.push(unit.to_string());
        }
    }
}

/// Counts units; for a line-wise read that is the number of lines.
#[derive(Debug, Default)]
pub struct LineCounter {
    count: usize,
}

impl LineCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl UnitConsumer<str> for LineCounter {
    fn accept(&mut self, _unit: &str) {
        self.count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_binary_collector_concatenates() {
        let mut collector = WholeBinaryCollector::new();
        collector.accept(b"ab".as_slice());
        collector.accept(b"".as_slice());
        collector.accept(b"cd".as_slice());
        assert_eq!(collector.data(), b"abcd");
        assert!(collector.failures().is_empty());
    }

    /// Accepts a fixed number of bytes, then refuses.
    struct FullSink {
        room: usize,
        written: Vec<u8>,
    }

    impl Write for FullSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.room == 0 {
                return Err(io::Error::other("sink is full"));
            }
            let len = buf.len().min(self.room);
            self.room -= len;
            self.written.extend_from_slice(&buf[..len]);
            Ok(len)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_binary_collector_records_sink_failures() {
        let mut collector = WholeBinaryCollector::with_sink(FullSink {
            room: 3,
            written: Vec::new(),
        });
        collector.accept(b"ab".as_slice());
        collector.accept(b"cd".as_slice());
        collector.accept(b"ef".as_slice());

        assert_eq!(collector.failures(), ["sink is full", "sink is full"]);
        assert_eq!(collector.into_sink().written, b"abc");
    }

    #[test]
    fn test_text_collector() {
        let mut collector = WholeTextCollector::new();
        collector.accept("Hallo ");
        collector.accept("Welt");
        assert_eq!(collector.into_text(), "Hallo Welt");
    }

    #[test]
    fn test_first_n_lines() {
        let mut collector = FirstNLinesCollector::new(2);
        for line in ["a", "b", "c", "d"] {
            collector.accept(line);
        }
        assert_eq!(collector.lines(), ["a", "b"]);
        assert_eq!(collector.seen(), 4);
    }

    #[test]
    fn test_first_n_lines_limit_at_least_one() {
        let mut collector = FirstNLinesCollector::new(0);
        collector.accept("only");
        collector.accept("ignored");
        assert_eq!(collector.into_lines(), ["only"]);
    }

    #[test]
    fn test_line_counter() {
        let mut counter = LineCounter::new();
        counter.accept("x");
        counter.accept("");
        assert_eq!(counter.count(), 2);
    }
}
