//! Nomor tiket generator.
//!
//! Tickets look like `TO/DIV/RE/2024-01-01/123456`: a fixed prefix, the local
//! date and a random 6-8 digit suffix. Uniqueness is best-effort only.

use chrono::{Local, NaiveDate};
use rand::Rng;

pub const DEFAULT_TICKET_PREFIX: &str = "TO/DIV/RE";

const SUFFIX_MIN: u32 = 100_000;
const SUFFIX_MAX: u32 = 99_999_999;

#[derive(Debug, Clone)]
pub struct TicketGenerator {
    prefix: String,
}

impl Default for TicketGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_TICKET_PREFIX)
    }
}

impl TicketGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let prefix = prefix.trim_end_matches('/').to_string();
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Generate a ticket for today's local date.
    pub fn generate(&self) -> String {
        self.generate_at(Local::now().date_naive(), &mut rand::thread_rng())
    }

    pub fn generate_at<R: Rng + ?Sized>(&self, date: NaiveDate, rng: &mut R) -> String {
        let suffix = rng.gen_range(SUFFIX_MIN..=SUFFIX_MAX);
        format!("{}/{}/{}", self.prefix, date.format("%Y-%m-%d"), suffix)
    }

    /// Use the submitted ticket unless it is blank.
    pub fn resolve(&self, submitted: &str) -> String {
        let trimmed = submitted.trim();
        if trimmed.is_empty() {
            self.generate()
        } else {
            trimmed.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_at_uses_date_and_prefix() {
        let generator = TicketGenerator::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let ticket = generator.generate_at(date, &mut StdRng::seed_from_u64(7));

        assert!(ticket.starts_with("TO/DIV/RE/2024-03-09/"));
        let suffix: u32 = ticket.rsplit('/').next().unwrap().parse().unwrap();
        assert!((SUFFIX_MIN..=SUFFIX_MAX).contains(&suffix));
    }

    #[test]
    fn test_trailing_slash_in_prefix_is_dropped() {
        let generator = TicketGenerator::new("NOC/");
        assert_eq!(generator.prefix(), "NOC");
    }

    #[test]
    fn test_resolve_keeps_user_ticket() {
        let generator = TicketGenerator::default();
        assert_eq!(generator.resolve("  INC-42 "), "INC-42");
        assert!(generator.resolve("   ").starts_with("TO/DIV/RE/"));
    }
}
