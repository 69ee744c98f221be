/// Line-oriented console sink.
///
/// Implementations receive fully rendered lines (escape codes included) and
/// must not fail; errors are dropped at this level.
pub trait ConsoleWriter: Send + Sync {
    fn write_line(&self, line: &str);
}
