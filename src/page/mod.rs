//! HTML rendering of the status page.
//!
//! Layout, in order: banner, environment table, database line, cache line.
//! Every dynamic string goes through [`escape_html`].

use std::fmt::Write as _;

use crate::report::EnvironmentReport;
use crate::status::{CheckResult, StatusReport};

pub const BANNER_HEADING: &str = "Statamic Docker Environment Test";
pub const BANNER_TEXT: &str =
    "If you can see this message, your web server and application runtime are working correctly.";

const SUCCESS_STYLE: &str = "color: green;";
const ERROR_STYLE: &str = "color: red;";

/// Escapes the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Renders the complete document.
pub fn render(environment: &EnvironmentReport, status: &StatusReport) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{BANNER_HEADING}</title>");
    html.push_str("</head>\n<body>\n");

    let _ = writeln!(html, "<h1>{BANNER_HEADING}</h1>");
    let _ = writeln!(html, "<p>{BANNER_TEXT}</p>");

    render_environment(&mut html, environment);
    render_check(&mut html, &status.database);
    render_check(&mut html, &status.cache);

    html.push_str("</body>\n</html>\n");
    html
}

fn render_environment(html: &mut String, environment: &EnvironmentReport) {
    html.push_str("<h2>Environment</h2>\n<table>\n");
    for fact in &environment.facts {
        let _ = writeln!(
            html,
            "<tr><th>{}</th><td>{}</td></tr>",
            escape_html(fact.label),
            escape_html(&fact.value)
        );
    }
    html.push_str("</table>\n");
}

fn render_check(html: &mut String, result: &CheckResult) {
    let style = if result.is_ok() {
        SUCCESS_STYLE
    } else {
        ERROR_STYLE
    };
    let _ = writeln!(
        html,
        "<p style=\"{style}\">{}</p>",
        escape_html(&result.summary())
    );
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::config::Settings;
    use crate::status::{CheckError, Dependency};

    fn environment() -> EnvironmentReport {
        EnvironmentReport::collect(&Settings::default(), Instant::now())
    }

    fn cache_error(text: &'static str) -> CheckError {
        CheckError::Cache(crate::cache::CacheError::Connect {
            source: redis::RedisError::from((redis::ErrorKind::IoError, text)),
        })
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x&y")</script>'"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;&#39;"
        );
        assert_eq!(escape_html("Hello from Valkey!"), "Hello from Valkey!");
    }

    #[test]
    fn sections_appear_in_order() {
        let status = StatusReport {
            database: CheckResult::passed(Dependency::Database, None),
            cache: CheckResult::passed(Dependency::Cache, Some("Hello from Valkey!".to_owned())),
        };
        let html = render(&environment(), &status);

        let banner = html.find("<h1>Statamic Docker Environment Test</h1>").unwrap();
        let env = html.find("<h2>Environment</h2>").unwrap();
        let db = html
            .find("<p style=\"color: green;\">MySQL connection successful!</p>")
            .unwrap();
        let cache = html
            .find("Valkey connection successful! Retrieved value: Hello from Valkey!")
            .unwrap();
        assert!(banner < env && env < db && db < cache);
        assert!(!html.contains("color: red;"));
    }

    #[test]
    fn failure_text_is_echoed_but_escaped() {
        let status = StatusReport {
            database: CheckResult::passed(Dependency::Database, None),
            cache: CheckResult::failed(Dependency::Cache, &cache_error("<b>refused</b>")),
        };
        let html = render(&environment(), &status);

        assert!(html.contains("<p style=\"color: red;\">Valkey connection failed: &lt;b&gt;refused&lt;/b&gt;"));
        assert!(!html.contains("<b>refused</b>"));
    }
}
