use colored::Colorize;

/// Per-workflow failures collected over one batch run.
///
/// A failure here never stops the batch; the full list is printed once at the end.
#[derive(Debug)]
pub struct Diagnostics {
    failures: Vec<anyhow::Error>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            // ideally we won't have any,
            // and we don't mind reallocating if we're already in an error state:
            failures: Vec::with_capacity(0),
        }
    }
}

impl Diagnostics {
    pub fn add_context(&mut self, e: anyhow::Error, msg: String) {
        log::error!("{msg}: {e}");
        self.failures.push(e.context(msg));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Print the full list of failures to stderr. Returns how many there were.
    pub fn print_recap(&self, label: &str) -> usize {
        if !self.failures.is_empty() {
            eprintln!(
                "\n{} {} {}:\n",
                self.failures.len().to_string().red(),
                "failures while".red(),
                label.red()
            );
            for e in &self.failures {
                recap(e);
            }
        }
        self.failures.len()
    }
}

fn recap(e: &anyhow::Error) {
    eprint!("{}: {}", "ERROR".red(), e);
    for cause in e.chain().skip(1) {
        eprint!("\nCaused by:\n\t{}", cause);
    }
    eprintln!();
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_collects_without_failing() {
        let mut diagnostics = Diagnostics::default();
        assert_eq!(diagnostics.print_recap("testing"), 0);

        diagnostics.add_context(anyhow::anyhow!("first"), "while processing wf1".into());
        diagnostics.add_context(anyhow::anyhow!("second"), "while processing wf".into());
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.print_recap("testing"), 2);
    }
}
