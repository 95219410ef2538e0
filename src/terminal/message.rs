use super::emoji;

/// Emoji-prefixed status lines. Implementors only decide where the text goes.
pub trait Message {
    fn message(msg: &str);

    fn info(msg: &str) {
        Self::message(&format!("{} {}", emoji::INFO, msg));
    }

    fn warn(msg: &str) {
        Self::message(&format!("{} {}", emoji::WARN, msg));
    }

    fn success(msg: &str) {
        Self::message(&format!("{} {}", emoji::SPARKLES, msg));
    }

    fn user_error(msg: &str) {
        Self::message(&format!("{} {}", emoji::EYES, msg));
    }

    fn working(msg: &str) {
        Self::message(&format!("{} {}", emoji::SWIRL, msg));
    }
}

pub struct StdOut;

impl Message for StdOut {
    fn message(msg: &str) {
        println!("{}", msg);
    }
}

pub struct StdErr;

impl Message for StdErr {
    fn message(msg: &str) {
        eprintln!("{}", msg);
    }
}
