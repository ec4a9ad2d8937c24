//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::application::services::provision::ProvisionReport;
use crate::domain::JiffyBox;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the account's boxes as a table.
    pub fn render_box_list(&self, boxes: &[JiffyBox]) {
        if boxes.is_empty() {
            self.ctx
                .info("No JiffyBoxes. Create one: jiffyi create -n <name> -p <planid> -d <distribution>");
            return;
        }
        println!(
            "  {}",
            format!(
                "{:>8}  {:<20} {:<10} {:<8} {:<16} {}",
                "ID", "NAME", "STATUS", "RUNNING", "ADDRESS", "PLAN"
            )
            .style(self.ctx.styles.header)
        );
        for b in boxes {
            let status = format!("{:<10}", b.status.to_string());
            println!(
                "  {:>8}  {:<20} {} {:<8} {:<16} {}",
                b.id,
                truncate(&b.name, 20),
                status.style(self.ctx.styles.status(&b.status, b.running)),
                running_display(b.running),
                b.public_address().unwrap_or("-"),
                plan_display(b),
            );
        }
    }

    /// Render a single box as key-value pairs.
    pub fn render_box(&self, b: &JiffyBox) {
        self.ctx.header(&format!("JiffyBox {}", b.id));
        self.ctx.kv("Name:", &b.name);
        self.ctx.kv(
            "Status:",
            &format!(
                "{}",
                b.status
                    .to_string()
                    .style(self.ctx.styles.status(&b.status, b.running))
            ),
        );
        self.ctx.kv("Running:", running_display(b.running));
        self.ctx.kv("Plan:", &plan_display(b));
        if let Some(distribution) = &b.distribution {
            self.ctx.kv("Distribution:", distribution);
        }
        self.ctx.kv("Public IPs:", &list_display(&b.ips.public));
        self.ctx.kv("Private IPs:", &list_display(&b.ips.private));
    }

    /// Render a plan or distribution listing.
    pub fn render_catalog(&self, title: &str, result: &serde_json::Value) {
        let rows = catalog_rows(result);
        if rows.is_empty() {
            self.ctx.info(&format!("No {title} available"));
            return;
        }
        self.ctx.header(title);
        for (key, label) in rows {
            println!("  {key:>12}  {label}");
        }
    }

    /// Confirm where the selected box's address was written.
    pub fn render_selection(&self, b: &JiffyBox, path: &Path) {
        self.ctx.success(&format!(
            "selected JiffyBox {} ({}), address written to {}",
            b.id,
            b.public_address().unwrap_or("-"),
            path.display()
        ));
    }

    pub fn render_done(&self, message: &str) {
        self.ctx.success(message);
    }

    /// Summarise a provisioning run.
    pub fn render_provision_report(&self, report: &ProvisionReport) {
        if report.executed.is_empty() {
            self.ctx
                .warn(&format!("no preset scripts ran on {}", report.address));
        } else {
            self.ctx.success(&format!(
                "provisioned {} with {}",
                report.address,
                report.executed.join(", ")
            ));
        }
        if !report.skipped.is_empty() {
            self.ctx
                .warn(&format!("skipped presets: {}", report.skipped.join(", ")));
        }
    }
}

#[must_use]
pub fn running_display(running: bool) -> &'static str {
    if running { "yes" } else { "no" }
}

fn plan_display(b: &JiffyBox) -> String {
    b.plan.as_ref().map_or_else(
        || "-".to_string(),
        |p| {
            if p.name.is_empty() {
                p.id.to_string()
            } else {
                format!("{} ({})", p.name, p.id)
            }
        },
    )
}

fn list_display(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// `(key, label)` rows of a catalog listing, numeric keys in numeric order.
///
/// The label is the entry's `name` when it has one, its compact JSON otherwise.
#[must_use]
pub fn catalog_rows(result: &serde_json::Value) -> Vec<(String, String)> {
    let label = |v: &serde_json::Value| {
        v.get("name")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| v.to_string(), str::to_string)
    };
    let mut rows: Vec<(String, String)> = match result {
        serde_json::Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), label(v))).collect(),
        serde_json::Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let key = v
                    .get("id")
                    .map_or_else(|| i.to_string(), |id| id.to_string().trim_matches('"').to_string());
                (key, label(v))
            })
            .collect(),
        _ => Vec::new(),
    };
    rows.sort_by(|(a, _), (b, _)| {
        match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.cmp(b),
        }
    });
    rows
}
