// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! Terminal rendering for API results and build events.

use colored::{ColoredString, Colorize};
use ernest_sdk::{Build, BuildEvent, BuildStatus, Logger, Record, Service};

pub fn format_status(status: &BuildStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        BuildStatus::InProgress => text.yellow(),
        BuildStatus::Done => text.green(),
        BuildStatus::Errored => text.red(),
        BuildStatus::Unknown => text.dimmed(),
        BuildStatus::Other(_) => text.normal(),
    }
}

pub fn print_services(services: &[Service]) {
    if services.is_empty() {
        println!("{}", "No services found".yellow());
        return;
    }

    println!("{} services:", services.len());
    for service in services {
        println!(
            "  {} - {} - {}",
            service.name.bold(),
            service.id,
            format_status(&service.status)
        );
    }
}

pub fn print_service(service: &Service) {
    println!("Service {}", service.name.bold());
    println!("  ID: {}", service.id);
    println!("  Status: {}", format_status(&service.status));
    if let Some(build_id) = service.build_id() {
        println!("  Build: {}", build_id);
    }
    for (key, value) in &service.extra {
        println!("  {}: {}", key, display_value(value));
    }
}

pub fn print_builds(builds: &[Build]) {
    if builds.is_empty() {
        println!("{}", "No builds found".yellow());
        return;
    }

    println!("{} builds:", builds.len());
    for build in builds {
        println!("  {} - {}", build.id, format_status(&build.status));
    }
}

pub fn print_build(build: &Build) {
    println!("Build {}", build.id.bold());
    println!("  Status: {}", format_status(&build.status));
    for (key, value) in &build.extra {
        println!("  {}: {}", key, display_value(value));
    }
}

/// Print opaque records, showing `columns` in order when present.
pub fn print_records(kind: &str, records: &[Record], columns: &[&str]) {
    if records.is_empty() {
        println!("{}", format!("No {} found", kind).yellow());
        return;
    }

    println!("{} {}:", records.len(), kind);
    for record in records {
        let fields: Vec<String> = columns
            .iter()
            .filter_map(|column| record.field(column))
            .collect();
        if fields.is_empty() {
            println!("  {}", serde_json::Value::Object(record.0.clone()));
        } else {
            println!("  {}", fields.join(" - "));
        }
    }
}

pub fn print_loggers(loggers: &[Logger]) {
    if loggers.is_empty() {
        println!("{}", "No loggers configured".yellow());
        return;
    }

    for logger in loggers {
        match logger {
            Logger::Basic { logfile } => {
                println!("  {} logfile={}", "basic".bold(), logfile);
            }
            Logger::Logstash {
                hostname,
                port,
                timeout,
            } => {
                println!(
                    "  {} hostname={} port={} timeout={}",
                    "logstash".bold(),
                    hostname,
                    port,
                    timeout
                );
            }
            Logger::Rollbar { token, environment } => {
                println!(
                    "  {} token={} environment={}",
                    "rollbar".bold(),
                    mask(token),
                    environment
                );
            }
        }
    }
}

/// Render one build event as a single line.
pub fn render_event(event: &BuildEvent) {
    println!("{}", describe_event(event));
}

pub fn describe_event(event: &BuildEvent) -> String {
    let kind = event.kind();
    let action = event.action().unwrap_or("update");
    let target = event
        .name
        .as_deref()
        .or(event.component_id.as_deref())
        .unwrap_or_default();

    let label = if target.is_empty() {
        format!("{} {}", capitalize(kind), action)
    } else {
        format!("{} {} {}", capitalize(kind), target, action)
    };

    match event.result() {
        Some("done") => format!("{} {}", label, "done".green()),
        Some("error") => format!(
            "{} {} {}",
            label,
            "failed".red(),
            event.error.as_deref().unwrap_or_default()
        )
        .trim_end()
        .to_string(),
        _ => format!("{} {}", label, "started".yellow()),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn mask(secret: &str) -> String {
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", secret.chars().take(4).collect::<String>())
    }
}
