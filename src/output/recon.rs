//! Console reports for the Tor check and site recon

use crate::output::style::paint;
use crate::recon::{ProbeOutcome, SiteReport, TorCheck};
use colored::Color;

/// Formats the Tor check verdict and exit address
pub fn render_tor_check(check: &TorCheck, color: bool) -> String {
    let verdict = if check.uses_tor() {
        Color::Green
    } else {
        Color::Red
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n", paint(&check.header, verdict, color)));
    match &check.ip_address {
        Some(ip) => out.push_str(&format!(
            "Tor IP Address: {}\n",
            paint(ip, Color::Yellow, color)
        )),
        None => out.push_str(&format!("{}\n", check.body)),
    }
    out
}

/// Formats a site recon report, one section per check
pub fn render_site_report(report: &SiteReport, color: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Site Information: {} ===\n\n", report.url));
    out.push_str(&format!("Status: {}\n", report.status));
    out.push_str(&format!(
        "Title: {}\n",
        report.title.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!(
        "Description: {}\n\n",
        report.description().unwrap_or("-")
    ));

    match &report.robots {
        Some(robots) => {
            out.push_str(&format!(
                "robots.txt: found at {} ({} entries)\n",
                robots.url,
                robots.entries.len()
            ));
            for entry in &robots.entries {
                out.push_str(&format!("  {}\n", entry));
            }
            for sitemap in &robots.sitemaps {
                out.push_str(&format!("  sitemap: {}\n", sitemap));
            }
        }
        None => out.push_str("robots.txt: not found\n"),
    }
    out.push('\n');

    out.push_str("Sensitive files:\n");
    for probe in &report.probes {
        let line = match &probe.outcome {
            ProbeOutcome::Exposed { status } => paint(
                &format!("ALERT {} exposed: {} ({})", probe.description, probe.url, status),
                Color::Red,
                color,
            ),
            ProbeOutcome::Forbidden => paint(
                &format!("{} present but forbidden (403)", probe.path),
                Color::Yellow,
                color,
            ),
            ProbeOutcome::Absent { status } => paint(
                &format!("no {} found ({})", probe.path, status),
                Color::Blue,
                color,
            ),
            ProbeOutcome::Failed { message } => {
                format!("{} could not be checked: {}", probe.path, message)
            }
        };
        out.push_str(&format!("  {}\n", line));
    }
    out.push('\n');

    push_list(&mut out, "Intel", &report.intel);
    push_list(&mut out, "Bitcoin addresses", &report.bitcoin_addresses);

    out.push_str(&format!("Meta tags ({}):\n", report.meta.len()));
    for tag in &report.meta {
        out.push_str(&format!("  {}: {}\n", tag.name, tag.content));
    }

    out
}

fn push_list<'a>(out: &mut String, title: &str, values: impl IntoIterator<Item = &'a String>) {
    let values: Vec<&String> = values.into_iter().collect();
    out.push_str(&format!("{} ({}):\n", title, values.len()));
    for value in values {
        out.push_str(&format!("  {}\n", value));
    }
    out.push('\n');
}
