//! Output formatting utilities.
//! 输出格式化工具。
//!
//! Status lines go to stderr so formatted text on stdout stays clean.

const RESET: &str = "\x1b[0m";

/// Wrap `msg` in an ANSI color.
pub fn paint(color: u8, msg: &str) -> String {
    format!("\x1b[{color}m{msg}{RESET}")
}

/// Print a success message in green.
/// 以绿色打印成功消息。
pub fn success(msg: &str) {
    eprintln!("{}", paint(32, msg));
}

/// Print a warning message in yellow.
/// 以黄色打印警告消息。
pub fn warning(msg: &str) {
    eprintln!("{} {msg}", paint(33, "warning:"));
}

/// Print an error message in red.
/// 以红色打印错误消息。
pub fn error(msg: &str) {
    eprintln!("{} {msg}", paint(31, "error:"));
}

/// Print an info message in blue.
pub fn info(msg: &str) {
    eprintln!("{} {msg}", paint(34, "info:"));
}

/// Print a debug or trace record, dimmed, with its log target.
pub fn detail(target: &str, msg: &str) {
    eprintln!("{} {msg}", paint(2, &format!("[{target}]")));
}
