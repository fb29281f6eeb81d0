//! `vox health` -- platform service status.

use anyhow::Result;

use vox_console::Console;
use vox_records::{ServiceHealth, ServiceStatus, SystemHealth};

/// Exit code when any service is down.
pub const EXIT_DOWN: u8 = 3;

fn format_service(service: &ServiceHealth) -> String {
    let latency = service
        .latency_ms
        .map(|ms| format!("{ms}ms"))
        .unwrap_or_else(|| "-".to_string());
    let uptime = service
        .uptime_percent
        .map(|p| format!("{p:.2}%"))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<16} {:<12} {:>8} {:>8}",
        service.name,
        service.status.to_string(),
        latency,
        uptime
    )
}

/// Render the health panel.
pub fn render(health: &SystemHealth) -> Vec<String> {
    let mut lines = vec![format!(
        "overall: {} (checked {})",
        health.overall(),
        health.checked_at
    )];
    lines.extend(health.services.iter().map(format_service));
    lines
}

pub async fn run_health(console: &Console) -> Result<u8> {
    let health = console.system_health().await?;
    for line in render(&health) {
        println!("{line}");
    }
    let code = if health.overall() == ServiceStatus::Down {
        EXIT_DOWN
    } else {
        0
    };
    Ok(code)
}
