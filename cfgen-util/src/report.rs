use std::io::Write as _;
use std::sync::Mutex;

use indicatif::ProgressBar;

use crate::console::{sty_g, Console};
use crate::model::{ContestListing, ProblemCode};
use crate::Error;

/// Receives progress of a batch from worker threads.
///
/// Implementors must be safe to call from several workers at once.
pub trait Report: Sync {
    fn start(&self, _listing: &ContestListing) {}

    fn saved(&self, code: &ProblemCode);

    fn warn(&self, code: &ProblemCode, err: &Error);

    /// Called once for each problem that was not fully saved, after its warnings.
    fn failed(&self, _code: &ProblemCode) {}

    fn finish(&self) {}
}

/// Writes batch progress to a console, with a progress bar on interactive terminals.
///
/// Without a terminal, lines go straight to the console so that warnings are kept
/// when stderr is redirected.
pub struct ConsoleReporter<'a> {
    cnsl: Mutex<&'a mut Console>,
    pb: ProgressBar,
    is_term: bool,
}

impl<'a> ConsoleReporter<'a> {
    pub fn new(cnsl: &'a mut Console) -> Self {
        let pb = cnsl.build_pb_count(0);
        let is_term = cnsl.is_term();
        Self {
            cnsl: Mutex::new(cnsl),
            pb,
            is_term,
        }
    }

    fn println(&self, line: String) {
        if self.is_term {
            self.pb.println(line);
        } else if let Ok(mut cnsl) = self.cnsl.lock() {
            writeln!(cnsl, "{}", line).unwrap_or(());
        }
    }
}

impl Report for ConsoleReporter<'_> {
    fn start(&self, listing: &ContestListing) {
        let len = listing.problem_codes().len() as u64;
        self.println(format!(
            "Contest: {} | Problems: {}",
            listing.name(),
            len
        ));
        self.pb.set_length(len);
    }

    fn saved(&self, code: &ProblemCode) {
        self.println(format!("{} {}", sty_g("Saved"), code));
        self.pb.inc(1);
    }

    fn failed(&self, _code: &ProblemCode) {
        self.pb.inc(1);
    }

    fn warn(&self, code: &ProblemCode, err: &Error) {
        let message = format!("Problem {} : {:#}", code, err);
        if self.is_term {
            self.pb.println(format!("WARN: {}", message));
        } else if let Ok(mut cnsl) = self.cnsl.lock() {
            cnsl.warn(&message).unwrap_or(());
        }
    }

    fn finish(&self) {
        self.pb.finish_and_clear();
    }
}
