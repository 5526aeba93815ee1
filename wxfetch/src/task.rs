use console::{style, Term};
use std::time::Instant;

/// Numbered step status on stderr, keeping stdout for results.
pub struct TaskRunner {
    term: Term,
    num_tasks: u32,
    current_task: u32,
    now: Instant,
    descr: String,
    verbose: bool,
    started: bool,
}

impl TaskRunner {
    pub fn new(num_tasks: u32, verbose: bool) -> Self {
        Self {
            term: Term::stderr(),
            num_tasks,
            current_task: 0,
            now: Instant::now(),
            descr: "".into(),
            verbose,
            started: false,
        }
    }

    fn task_id(&self) -> String {
        style(format!("[{}/{}]", self.current_task + 1, self.num_tasks))
            .force_styling(true)
            .to_string()
    }

    pub fn start_task(&mut self, descr: impl Into<String>) {
        if self.started {
            self.finish_task(true, true);
        }
        self.now = Instant::now();
        self.descr = descr.into();
        self.started = true;
        tracing::debug!("{}", self.descr);
        self.term
            .write_line(&format!("{} {}", self.task_id(), &self.descr))
            .ok();
    }

    fn finish_task(&mut self, skipped: bool, clear_last: bool) {
        self.started = false;
        if clear_last && self.term.is_term() {
            self.term.clear_last_lines(1).ok();
        }
        let status = if skipped {
            "[SKIPPED]".to_string()
        } else {
            let time = self.now.elapsed();
            format!("[{}ms]", time.as_millis())
        };
        self.term
            .write_line(&format!("{} {} {}", self.task_id(), &self.descr, status))
            .ok();
        self.current_task += 1;
    }

    pub fn end_task(&mut self) {
        self.finish_task(false, !self.verbose);
    }

    /// Ends a task whose output (e.g. a progress bar) follows its status
    /// line, so the status line is left in place.
    pub fn end_verbose_task(&mut self) {
        self.finish_task(false, false);
    }

    #[cfg(test)]
    fn current_task(&self) -> u32 {
        self.current_task
    }
}
