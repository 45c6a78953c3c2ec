use std::cell::RefCell;

use colored::Colorize;

use util::Timer;

use crate::settings::Settings;

/// All interactions with the text UI should go through this struct.
pub struct Ui {
    /// -v setting, displays extra text info to user
    pub verbose: bool,
    /// keeps track of time for each stage
    timer: RefCell<Timer>,
}

impl Ui {
    pub fn new(settings: &Settings) -> Self {
        Self {
            verbose: settings.verbose > 0,
            // Refcell so the timer can be reset w/o needing a unique reference:
            timer: RefCell::new(Timer::now()),
        }
    }

    pub fn start_timer(&self) {
        if self.verbose {
            self.timer.borrow_mut().reset();
        }
    }

    pub fn print_elapsed(&self, task: &str) {
        if self.verbose {
            self.timer.borrow().print_elapsed(task);
        }
    }

    pub fn verbose_progress(&self, msg: &str) {
        if self.verbose {
            eprint!("{}... ", msg.magenta());
        }
    }

    pub fn verbose_progress_debug<T: std::fmt::Debug>(&self, msg: &str, arg: T) {
        if self.verbose {
            eprint!("{} {:?}... ", msg.magenta(), arg);
        }
    }

    pub fn done(&self) {
        if self.verbose {
            eprintln!("{}.", "done".green());
        }
    }

    /// Always printed: the one-line outcome of a stage.
    pub fn finished(&self, msg: &str) {
        eprintln!("{}", msg.green());
    }
}
