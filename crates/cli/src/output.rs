//! Output formatting for CLI responses

use anyhow::Error;
use colored::Colorize;
use serde_json::json;

use respira_firmware_update::{SlotStatus, UpdateReport, ValidationReport};

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format, with the cause chain
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Print the result of an update or rollback operation
pub fn print_update_report(operation: &str, report: &UpdateReport, json: bool) {
    if json {
        let output = json!({
            "success": true,
            "operation": operation,
            "report": report,
        });
        print_json(&output);
        return;
    }

    match report.outcome {
        respira_firmware_update::UpdateOutcome::Committed => {
            println!(
                "{} attempt {} installed digest {}",
                "Firmware update completed successfully.".green(),
                report.attempt_id,
                report
                    .installed_digest
                    .map(|d| d.to_hex())
                    .unwrap_or_else(|| "unknown".to_string()),
            );
        }
        respira_firmware_update::UpdateOutcome::RolledBack => {
            if operation == "rollback" {
                println!("{}", "Firmware rollback completed.".green());
            } else {
                println!(
                    "{} {}",
                    "Firmware update rolled back:".yellow(),
                    report.error.as_deref().unwrap_or("validation failed"),
                );
            }
        }
        respira_firmware_update::UpdateOutcome::Failed => {
            println!("{}", "Firmware operation failed.".red());
        }
    }
}

/// Print a validation report
pub fn print_validation_report(report: &ValidationReport, json: bool) {
    if json {
        let output = json!({
            "success": true,
            "operation": "validate",
            "report": report,
        });
        print_json(&output);
        return;
    }

    if report.digests_match {
        println!("Checksum match: Firmware integrity validated.");
    } else {
        println!("Checksum mismatch: Firmware may be corrupted.");
    }

    if report.is_valid() {
        println!("{}", "Firmware is valid.".green());
    } else {
        println!("{}", "Firmware is incomplete or corrupt.".red());
    }
}

/// Print per-slot status
pub fn print_slot_statuses(statuses: &[SlotStatus], json: bool) {
    if json {
        let output = json!({
            "success": true,
            "operation": "status",
            "slots": statuses,
        });
        print_json(&output);
        return;
    }

    println!("{}", "Firmware slots:".bold());
    for status in statuses {
        if status.present {
            println!(
                "  {} {:<10} {:>10} bytes  {}",
                "●".green(),
                status.slot,
                status
                    .size_bytes
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "?".to_string()),
                status
                    .digest
                    .map(|d| d.to_hex())
                    .unwrap_or_else(|| "?".to_string())
                    .dimmed(),
            );
        } else {
            println!("  {} {:<10} never written", "○".dimmed(), status.slot);
        }
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format output as JSON: {e}"),
    }
}
