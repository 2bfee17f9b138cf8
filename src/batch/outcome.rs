use super::state::Disposition;
use colored::Colorize;

/// Partition of a batch's app ids. Each id sits in exactly one list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub published: Vec<String>,
    pub package_failed: Vec<String>,
    pub publish_failed: Vec<String>,
    pub skipped: Vec<String>,
}

impl BatchOutcome {
    fn list_mut(&mut self, disposition: Disposition) -> &mut Vec<String> {
        match disposition {
            Disposition::Published => &mut self.published,
            Disposition::PackageFailed => &mut self.package_failed,
            Disposition::PublishFailed => &mut self.publish_failed,
            Disposition::Skipped => &mut self.skipped,
        }
    }

    /// Record where `app_id` ended up, replacing any earlier disposition
    pub fn record(&mut self, app_id: &str, disposition: Disposition) {
        if let Some(previous) = self.disposition_of(app_id) {
            self.list_mut(previous).retain(|id| id != app_id);
        }
        self.list_mut(disposition).push(app_id.to_string());
    }

    pub fn disposition_of(&self, app_id: &str) -> Option<Disposition> {
        [
            (&self.published, Disposition::Published),
            (&self.package_failed, Disposition::PackageFailed),
            (&self.publish_failed, Disposition::PublishFailed),
            (&self.skipped, Disposition::Skipped),
        ]
        .into_iter()
        .find(|(list, _)| list.iter().any(|id| id == app_id))
        .map(|(_, d)| d)
    }

    pub fn total(&self) -> usize {
        self.published.len()
            + self.package_failed.len()
            + self.publish_failed.len()
            + self.skipped.len()
    }

    pub fn print_summary(&self) {
        println!();
        println!("{} ({} apps)", "Batch summary".cyan().bold(), self.total());
        println!("{}", "─".repeat(60).dimmed());

        let sections = [
            ("✓ Published", &self.published),
            ("✗ Packaging failed", &self.package_failed),
            ("✗ Publishing failed", &self.publish_failed),
            ("! Skipped", &self.skipped),
        ];

        for (label, ids) in sections {
            let heading = format!("{} ({})", label, ids.len());
            let heading = match label.chars().next() {
                Some('✓') => heading.green(),
                Some('✗') => heading.red(),
                _ => heading.yellow(),
            };
            println!("{}", heading);
            for id in ids {
                println!("    {}", id);
            }
        }
    }
}
