//! Bounded environment report.
//!
//! A fixed list of facts about the running service: what it is, where it
//! runs, and how it is configured. Nothing is read from the process
//! environment wholesale, and the database password is always redacted.

use std::time::Instant;

use crate::config::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentReport {
    pub facts: Vec<Fact>,
}

impl EnvironmentReport {
    /// Collects the report. `started` is when the service came up.
    pub fn collect(settings: &Settings, started: Instant) -> Self {
        let cpus = std::thread::available_parallelism()
            .map_or_else(|_| "unknown".to_owned(), |n| n.to_string());

        let mut facts = vec![
            fact("Service", env!("CARGO_PKG_NAME")),
            fact("Version", env!("CARGO_PKG_VERSION")),
            fact("Operating system", std::env::consts::OS),
            fact("OS family", std::env::consts::FAMILY),
            fact("Architecture", std::env::consts::ARCH),
            fact("Logical CPUs", cpus),
            fact("Process id", std::process::id().to_string()),
            fact("Uptime", format!("{}s", started.elapsed().as_secs())),
        ];

        facts.extend(
            settings
                .describe()
                .into_iter()
                .map(|(label, value)| Fact { label, value }),
        );

        Self { facts }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.facts
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}

fn fact(label: &'static str, value: impl Into<String>) -> Fact {
    Fact {
        label,
        value: value.into(),
    }
}
